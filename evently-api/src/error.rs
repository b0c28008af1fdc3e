use serde_json::json;

/// Shown when the backend fails without telling us why
pub const FALLBACK_MESSAGE: &str = "Something went wrong, please try again";

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Rejected locally, the request never left the device
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    pub fn not_found(what: &str) -> Error {
        Error::NotFound(format!("{what} not found"))
    }

    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Network(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        match self {
            Error::Validation(msg) => json!({
                "message": msg,
                "type": "validation",
            }),
            Error::NotFound(msg) => json!({
                "message": msg,
                "type": "not-found",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::Server(msg) | Error::Network(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
        }
        .to_string()
        .into_bytes()
    }

    /// Recovers an error from a failed response.
    ///
    /// Never fails: a body that cannot be understood still yields an error
    /// matching the status code, with the fallback message if needed.
    pub fn parse(status: http::StatusCode, body: &[u8]) -> Error {
        use http::StatusCode;
        let data: Option<serde_json::Value> = serde_json::from_slice(body).ok();
        let field = |name: &str| {
            data.as_ref()
                .and_then(|d| d.get(name))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let message = field("message");
        match (field("type").as_deref(), status) {
            // untyped 400s fall through to `Server`
            (Some("validation"), _) => {
                Error::Validation(message.unwrap_or_else(|| String::from(FALLBACK_MESSAGE)))
            }
            (Some("not-found"), _) | (None, StatusCode::NOT_FOUND) => {
                Error::NotFound(message.unwrap_or_else(|| String::from("Not found")))
            }
            (Some("permission-denied"), _)
            | (None, StatusCode::UNAUTHORIZED)
            | (None, StatusCode::FORBIDDEN) => Error::PermissionDenied,
            _ => Error::Server(message.unwrap_or_else(|| String::from(FALLBACK_MESSAGE))),
        }
    }
}
