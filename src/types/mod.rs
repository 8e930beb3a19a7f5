// Types layer - All data structures
pub mod db;
pub mod dto;
pub mod internal;

/// Decode a JSON string-array column; malformed data reads as empty
pub fn parse_string_set(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Encode a string set for storage in a JSON text column
pub fn encode_string_set(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_set_roundtrip() {
        let values = vec!["user:update".to_string(), "report:view".to_string()];
        let encoded = encode_string_set(&values);
        assert_eq!(parse_string_set(&encoded), values);
    }

    #[test]
    fn test_parse_string_set_tolerates_garbage() {
        assert!(parse_string_set("not json").is_empty());
        assert!(parse_string_set("").is_empty());
    }
}
