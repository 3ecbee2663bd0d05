//! Uniform response envelope: `{statusCode, message, data?}`

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body
    #[schema(example = 200)]
    pub status_code: u16,
    /// Human-readable outcome message
    #[schema(example = "ok")]
    pub message: String,
    /// Response payload (omitted on errors and bare acknowledgements)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 200 response with payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 response with payload
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Payload-less response (errors, deletes)
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success("Accounts fetched successfully", vec![1, 2, 3]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["message"], "Accounts fetched successfully");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let resp = ApiResponse::message(StatusCode::NOT_FOUND, "Are you lost?");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert!(json.get("data").is_none());
    }
}
