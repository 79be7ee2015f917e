use serde::Deserialize;

use problemset_core::Identifier;

/// Extractor para rutas `/problems/{id}` que aceptan id o slug.
#[derive(Debug, Deserialize)]
pub struct IdentifierPath {
    pub id: String,
}

impl IdentifierPath {
    /// Un segmento de solo digitos es un id, cualquier otro es un slug.
    pub fn identifier(&self) -> Result<Identifier, String> {
        self.id.parse::<Identifier>().map_err(|e| e.to_string())
    }
}

/// Extractor para rutas `/problems/{id}` que solo aceptan id numerico.
#[derive(Debug, Deserialize)]
pub struct IdPath {
    pub id: String,
}

impl IdPath {
    pub fn id(&self) -> Result<i64, String> {
        let id = self.id.trim();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err("ID must be a number".to_string());
        }
        id.parse::<i64>()
            .map_err(|_| "ID must be a number".to_string())
    }
}
