use crate::client::Operation;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub operation: Operation,
    pub stage: &'static str,
    pub detail: String,
    pub status: Option<u16>,
    pub raw_body: Option<String>,
    pub raw_body_json: Option<Value>,
}

impl ApiError {
    /// Backend error message, when the body is FastAPI-style `{"detail": "..."}`.
    pub fn backend_detail(&self) -> Option<&str> {
        self.raw_body_json.as_ref()?.get("detail")?.as_str()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} request failed (stage={}): {}",
            self.operation.as_str(),
            self.stage,
            self.detail
        )?;
        if let Some(detail) = self.backend_detail() {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_backend_detail() {
        let err = ApiError {
            operation: Operation::Analyze,
            stage: "http",
            detail: "status=500".to_string(),
            status: Some(500),
            raw_body: Some("{\"detail\":\"graph crashed\"}".to_string()),
            raw_body_json: Some(json!({"detail": "graph crashed"})),
        };
        assert_eq!(
            err.to_string(),
            "analyze request failed (stage=http): status=500 (graph crashed)"
        );
    }

    #[test]
    fn display_without_json_body() {
        let err = ApiError {
            operation: Operation::SaveProfile,
            stage: "send",
            detail: "connection refused".to_string(),
            status: None,
            raw_body: None,
            raw_body_json: None,
        };
        assert_eq!(
            err.to_string(),
            "save_profile request failed (stage=send): connection refused"
        );
    }
}
