// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Market, MarketFileError, MatchingLimits};
pub use requests::{EnumerateRequest, SolveRequest, VerifyRequest};
pub use responses::{EnumerateResponse, ErrorResponse, HealthResponse, SolveResponse, VerifyResponse};
