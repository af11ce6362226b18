use crate::core::{Matching, PreferenceTable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to compute the proposer-optimal stable matching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolveRequest {
    #[validate(custom(function = "validate_side"))]
    pub proposers: PreferenceTable,
    #[validate(custom(function = "validate_side"))]
    pub responders: PreferenceTable,
}

/// Request to check a proposed matching for blocking pairs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(custom(function = "validate_side"))]
    pub proposers: PreferenceTable,
    #[validate(custom(function = "validate_side"))]
    pub responders: PreferenceTable,
    pub matching: Matching,
}

/// Request to list stable matchings one exchange away from the solution
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnumerateRequest {
    #[validate(custom(function = "validate_side"))]
    pub proposers: PreferenceTable,
    #[validate(custom(function = "validate_side"))]
    pub responders: PreferenceTable,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn validate_side(table: &PreferenceTable) -> Result<(), ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::new("empty_side"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_side_fails_validation() {
        let req: SolveRequest =
            serde_json::from_str(r#"{"proposers": {}, "responders": {"S1": []}}"#).unwrap();
        assert!(req.validate().is_err());

        let req: SolveRequest =
            serde_json::from_str(r#"{"proposers": {"H1": ["S1"]}, "responders": {"S1": ["H1"]}}"#)
                .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_verify_request_parses_unmatched_entries() {
        let req: VerifyRequest = serde_json::from_str(
            r#"{
                "proposers": {"H1": ["S1"], "H2": ["S1"]},
                "responders": {"S1": ["H2", "H1"]},
                "matching": {"H1": null, "H2": "S1"}
            }"#,
        )
        .unwrap();
        assert_eq!(req.matching.partner_of("H2"), Some("S1"));
        assert_eq!(req.matching.partner_of("H1"), None);
    }
}
