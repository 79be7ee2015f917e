//! Custom assertions para tests.

use serde_json::Value;

/// Verifica el envelope de una respuesta exitosa.
pub fn assert_success_envelope(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");
    assert_eq!(json["success"], true, "Expected success=true in {}", json);
}

/// Verifica el envelope de una respuesta de error.
pub fn assert_error_envelope(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");
    assert_eq!(json["success"], false, "Expected success=false in {}", json);
    assert!(json["error"].is_string(), "Missing 'error' field");
    assert!(json["message"].is_string(), "Missing 'message' field");
}

/// Extrae los slugs de un array de problemas, en orden.
pub fn slugs(json: &Value) -> Vec<String> {
    json.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|p| p["titleSlug"].as_str().expect("Missing titleSlug").to_string())
        .collect()
}
