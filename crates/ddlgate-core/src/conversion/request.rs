//! Incoming conversion requests

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::optimization::OptimizationType;

/// Body of a conversion request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    #[serde(default)]
    pub sql_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_type: Option<String>,
}

/// A request that passed shape checks and is ready for validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub sql_content: String,
    pub optimization: OptimizationType,
}

/// Decode and shape-check a JSON request body.
///
/// The optimization type must be spelled exactly as on the wire; a missing
/// or empty value falls back to `balanced`.
pub fn parse_request(body: &str) -> Result<Submission, RequestError> {
    let request: ConvertRequest = serde_json::from_str(body).map_err(RequestError::InvalidJson)?;

    if request.sql_content.trim().is_empty() {
        return Err(RequestError::EmptySqlContent);
    }

    let optimization = match request.optimization_type.as_deref() {
        None | Some("") => OptimizationType::default(),
        Some(value) => OptimizationType::ALL
            .into_iter()
            .find(|opt| opt.as_str() == value)
            .ok_or_else(|| RequestError::InvalidOptimizationType(value.to_string()))?,
    };

    Ok(Submission {
        sql_content: request.sql_content,
        optimization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetailCode;

    #[test]
    fn test_parse_valid_request() {
        let submission = parse_request(
            r#"{"sqlContent": "CREATE TABLE t (id INT);", "optimizationType": "read_heavy"}"#,
        )
        .unwrap();
        assert_eq!(submission.optimization, OptimizationType::ReadHeavy);
        assert_eq!(submission.sql_content, "CREATE TABLE t (id INT);");
    }

    #[test]
    fn test_default_optimization() {
        let submission = parse_request(r#"{"sqlContent": "x"}"#).unwrap();
        assert_eq!(submission.optimization, OptimizationType::Balanced);

        let submission = parse_request(r#"{"sqlContent": "x", "optimizationType": ""}"#).unwrap();
        assert_eq!(submission.optimization, OptimizationType::Balanced);
    }

    #[test]
    fn test_rejections() {
        let err = parse_request("{not json").unwrap_err();
        assert_eq!(err.code(), DetailCode::InvalidJson);

        let err = parse_request(r#"{"sqlContent": "   "}"#).unwrap_err();
        assert_eq!(err.code(), DetailCode::EmptySqlContent);

        let err = parse_request(r#"{}"#).unwrap_err();
        assert_eq!(err.code(), DetailCode::EmptySqlContent);

        let err =
            parse_request(r#"{"sqlContent": "x", "optimizationType": "Read_Heavy"}"#).unwrap_err();
        assert_eq!(err.code(), DetailCode::InvalidOptimizationType);
    }
}
