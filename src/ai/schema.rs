//! Response-schema builders, in the provider's uppercase schema dialect.

use serde_json::json;

/// Builder for the object schemas attached to schema-constrained calls.
#[derive(Debug, Clone, Default)]
pub struct ResponseSchema {
    properties: Vec<(String, serde_json::Value)>,
    required: Vec<String>,
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string_field(mut self, name: impl Into<String>) -> Self {
        self.properties.push((name.into(), json!({"type": "STRING"})));
        self
    }

    pub fn string_array_field(mut self, name: impl Into<String>) -> Self {
        self.properties.push((
            name.into(),
            json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        ));
        self
    }

    pub fn require_all(mut self) -> Self {
        self.required = self.properties.iter().map(|(n, _)| n.clone()).collect();
        self
    }

    pub fn build(self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("OBJECT"));

        let mut properties = serde_json::Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }

        map.into()
    }
}

/// Four required fields: name, description, prevention, treatment.
pub fn pest_response_schema() -> serde_json::Value {
    ResponseSchema::new()
        .string_field("name")
        .string_field("description")
        .string_array_field("prevention")
        .string_array_field("treatment")
        .require_all()
        .build()
}

/// Four required fields: soil_type, ph_level_estimate, nutrient_deficiencies,
/// recommendations.
pub fn soil_response_schema() -> serde_json::Value {
    ResponseSchema::new()
        .string_field("soil_type")
        .string_field("ph_level_estimate")
        .string_array_field("nutrient_deficiencies")
        .string_array_field("recommendations")
        .require_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_basic() {
        let schema = ResponseSchema::new()
            .string_field("name")
            .string_array_field("tags")
            .build();

        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["name"]["type"], "STRING");
        assert_eq!(schema["properties"]["tags"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_pest_schema_requires_all_four_fields() {
        let schema = pest_response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        for field in ["name", "description", "prevention", "treatment"] {
            assert!(required.iter().any(|v| v == field));
            assert!(schema["properties"][field].is_object());
        }
    }

    #[test]
    fn test_soil_schema_uses_wire_field_names() {
        let schema = soil_response_schema();
        assert_eq!(schema["properties"]["ph_level_estimate"]["type"], "STRING");
        assert_eq!(
            schema["properties"]["nutrient_deficiencies"]["type"],
            "ARRAY"
        );
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
    }
}
