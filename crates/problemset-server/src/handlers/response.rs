use serde::Serialize;

use problemset_core::PageInfo;

/// Envelope comun de todas las respuestas exitosas.
///
/// Los campos opcionales se omiten del JSON cuando no aplican.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,

    /// Numero de elementos en `data` para listados no paginados
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            count: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Listado completo con su tamano.
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            count: Some(count),
            ..Self::ok(data)
        }
    }

    /// Una pagina con su metadata.
    pub fn page(data: Vec<T>, pagination: PageInfo) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// Respuesta sin datos, solo mensaje.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problemset_core::Pagination;

    #[test]
    fn test_list_envelope() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_page_envelope() {
        let info = PageInfo::new(Pagination::new(2, 10).unwrap(), 25);
        let json = serde_json::to_value(ApiResponse::page(vec!["a"], info)).unwrap();

        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_message_only_envelope() {
        let json = serde_json::to_value(ApiResponse::message("Problem deleted successfully")).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Problem deleted successfully");
        assert!(json.get("data").is_none());
    }
}
