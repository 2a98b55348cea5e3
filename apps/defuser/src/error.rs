use serde::Deserialize;
use thiserror::Error;

use crate::errors::{Entity, ErrorCode};

/// RFC 7807 body returned by the solving service on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub status: u16,
    pub detail: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No {0} is loaded")]
    NotInitialized(Entity),
    #[error("Not found: {detail}")]
    NotFound { entity: Entity, detail: String },
    #[error("Network error: {detail}")]
    Transport {
        detail: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Server error ({status}): {detail}")]
    Server {
        status: u16,
        code: Option<String>,
        detail: String,
    },
    #[error("Invalid argument: {detail}")]
    InvalidArgument { code: ErrorCode, detail: String },
    #[error("Unexpected response: {detail}")]
    Decode { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Stable code for screens; never parse the display string.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotInitialized(Entity::Round) => ErrorCode::RoundNotInitialized,
            AppError::NotInitialized(Entity::Bomb) => ErrorCode::BombNotInitialized,
            AppError::NotInitialized(Entity::Module) => ErrorCode::ModuleNotInitialized,
            AppError::NotFound {
                entity: Entity::Round,
                ..
            } => ErrorCode::RoundNotFound,
            AppError::NotFound {
                entity: Entity::Bomb,
                ..
            } => ErrorCode::BombNotFound,
            AppError::NotFound {
                entity: Entity::Module,
                ..
            } => ErrorCode::ModuleNotFound,
            AppError::Transport { .. } => ErrorCode::Transport,
            AppError::Server { .. } => ErrorCode::Server,
            AppError::InvalidArgument { code, .. } => *code,
            AppError::Decode { .. } => ErrorCode::Decode,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// True for failures that originate from the remote service or the network.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::Transport { .. } | AppError::Server { .. } | AppError::Decode { .. }
        )
    }

    pub fn not_initialized(entity: Entity) -> Self {
        Self::NotInitialized(entity)
    }

    pub fn not_found(entity: Entity, detail: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            detail: detail.into(),
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code,
            detail: detail.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Build a server error from a non-success response body.
    ///
    /// Problem-details bodies contribute their `code` and `detail`; anything
    /// else is kept verbatim as the detail.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProblemDetails>(body) {
            Ok(problem) => Self::Server {
                status,
                code: problem.code,
                detail: problem.detail,
            },
            Err(_) => {
                let detail = body.trim();
                Self::Server {
                    status,
                    code: None,
                    detail: if detail.is_empty() {
                        format!("HTTP {status}")
                    } else {
                        detail.to_string()
                    },
                }
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return AppError::decode(format!("response body: {e}"));
        }
        AppError::Transport {
            detail: e.to_string(),
            source: Box::new(e),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::decode(format!("json: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_details_body_supplies_code_and_detail() {
        let body = r#"{"type":"https://example.test/errors/BOMB_EXPLODED","title":"Bomb Exploded","status":409,"detail":"Bomb 4 has exploded","code":"BOMB_EXPLODED","trace_id":"abc"}"#;
        let err = AppError::from_response_body(409, body);
        match err {
            AppError::Server {
                status,
                code,
                detail,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("BOMB_EXPLODED"));
                assert_eq!(detail, "Bomb 4 has exploded");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn plain_body_is_kept_as_detail() {
        let err = AppError::from_response_body(502, "  bad gateway \n");
        assert_eq!(err.to_string(), "Server error (502): bad gateway");
        assert_eq!(err.code(), ErrorCode::Server);
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = AppError::from_response_body(500, "");
        assert_eq!(err.to_string(), "Server error (500): HTTP 500");
    }

    #[test]
    fn codes_follow_entity() {
        assert_eq!(
            AppError::not_initialized(Entity::Round).code(),
            ErrorCode::RoundNotInitialized
        );
        assert_eq!(
            AppError::not_found(Entity::Module, "module 3").code(),
            ErrorCode::ModuleNotFound
        );
        assert!(!AppError::not_found(Entity::Bomb, "bomb 1").is_remote());
        assert!(AppError::decode("x").is_remote());
    }
}
