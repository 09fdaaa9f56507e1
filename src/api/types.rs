use serde::Serialize;

/// Envelope shared by every JSON response.
///
/// Success: `{"success": true, "data": ..., "status": 200}`.
/// Failure: `{"status": 404, "success": false, "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            status: 200,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(ApiResponse::success("x")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": "x", "status": 200}));
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error(404, "No such zodiac sign exists"))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "No such zodiac sign exists", "status": 404})
        );
    }
}
