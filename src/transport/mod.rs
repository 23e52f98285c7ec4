//! Shared HTTP plumbing for both facades.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};
