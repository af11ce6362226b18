use crate::core::{BlockingPair, Matching};
use serde::{Deserialize, Serialize};

/// Response for the solve endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub matching: Matching,
    pub proposals: usize,
    #[serde(rename = "unmatchedProposers")]
    pub unmatched_proposers: Vec<String>,
}

/// Response for the verify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub stable: bool,
    #[serde(rename = "blockingPairs")]
    pub blocking_pairs: Vec<BlockingPair>,
}

/// Response for the enumerate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerateResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub matchings: Vec<Matching>,
    pub count: usize,
    pub truncated: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
