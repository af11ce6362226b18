use actix_web::{error::BlockingError, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{enumerate_stable_up_to, DeferredAcceptance, MalformedPreferenceError, PreferenceTable, StabilityCheck};
use crate::models::{
    EnumerateRequest, EnumerateResponse, ErrorResponse, HealthResponse, MatchingLimits, SolveRequest,
    SolveResponse, VerifyRequest, VerifyResponse,
};

/// Application state shared across all handlers
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub limits: MatchingLimits,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matchings/solve", web::post().to(solve))
        .route("/matchings/verify", web::post().to(verify))
        .route("/matchings/enumerate", web::post().to(enumerate));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn malformed(request_id: &str, err: MalformedPreferenceError) -> HttpResponse {
    tracing::info!(request_id = %request_id, "Rejecting malformed preferences: {}", err);
    HttpResponse::UnprocessableEntity().json(ErrorResponse {
        error: "Malformed preferences".to_string(),
        message: err.to_string(),
        status_code: 422,
    })
}

fn worker_failed(request_id: &str, err: BlockingError) -> HttpResponse {
    tracing::error!(request_id = %request_id, "Matching worker failed: {}", err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Internal error".to_string(),
        message: "The matching computation did not complete".to_string(),
        status_code: 500,
    })
}

/// Reject markets larger than the configured limit
fn check_size(limits: &MatchingLimits, proposers: &PreferenceTable, responders: &PreferenceTable) -> Option<HttpResponse> {
    if limits.admits(proposers.len(), responders.len()) {
        return None;
    }

    tracing::info!(
        "Market of {}x{} exceeds limit of {} agents per side",
        proposers.len(),
        responders.len(),
        limits.max_agents_per_side
    );
    Some(HttpResponse::PayloadTooLarge().json(ErrorResponse {
        error: "Market too large".to_string(),
        message: format!(
            "At most {} agents per side are accepted",
            limits.max_agents_per_side
        ),
        status_code: 413,
    }))
}

/// Solve endpoint
///
/// POST /api/v1/matchings/solve
///
/// Request body:
/// ```json
/// {
///   "proposers": { "H1": ["S1", "S2"], "H2": ["S2", "S1"] },
///   "responders": { "S1": ["H2", "H1"], "S2": ["H1", "H2"] }
/// }
/// ```
async fn solve(
    state: web::Data<AppState>,
    req: web::Json<SolveRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if let Some(rejection) = check_size(&state.limits, &req.proposers, &req.responders) {
        return rejection;
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("solve", request_id = %request_id);
    let SolveRequest { proposers, responders } = req.into_inner();

    // Deferred acceptance is CPU bound; keep it off the async worker
    let result = web::block(move || {
        let _entered = span.enter();
        let outcome = DeferredAcceptance::new(&proposers, &responders)?.run()?;
        tracing::info!(
            "Solved {}x{} market with {} proposals",
            proposers.len(),
            responders.len(),
            outcome.proposals
        );
        Ok::<_, MalformedPreferenceError>(outcome)
    })
    .await;

    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => return malformed(&request_id, e),
        Err(e) => return worker_failed(&request_id, e),
    };

    let unmatched_proposers: Vec<String> = outcome
        .matching
        .unmatched_proposers()
        .map(str::to_string)
        .collect();

    HttpResponse::Ok().json(SolveResponse {
        request_id,
        matching: outcome.matching,
        proposals: outcome.proposals,
        unmatched_proposers,
    })
}

/// Verify endpoint
///
/// POST /api/v1/matchings/verify
///
/// Request body:
/// ```json
/// {
///   "proposers": { "H1": ["S1"] },
///   "responders": { "S1": ["H1"] },
///   "matching": { "H1": "S1" }
/// }
/// ```
async fn verify(
    state: web::Data<AppState>,
    req: web::Json<VerifyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if let Some(rejection) = check_size(&state.limits, &req.proposers, &req.responders) {
        return rejection;
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("verify", request_id = %request_id);
    let VerifyRequest { proposers, responders, matching } = req.into_inner();

    let result = web::block(move || {
        let _entered = span.enter();
        let pairs = StabilityCheck::new(&proposers, &responders)?.blocking_pairs(&matching)?;
        tracing::info!(
            "Verified matching of {} proposers: {} blocking pairs",
            matching.len(),
            pairs.len()
        );
        Ok::<_, MalformedPreferenceError>(pairs)
    })
    .await;

    let blocking_pairs = match result {
        Ok(Ok(pairs)) => pairs,
        Ok(Err(e)) => return malformed(&request_id, e),
        Err(e) => return worker_failed(&request_id, e),
    };

    HttpResponse::Ok().json(VerifyResponse {
        request_id,
        stable: blocking_pairs.is_empty(),
        blocking_pairs,
    })
}

/// Enumerate endpoint
///
/// POST /api/v1/matchings/enumerate
///
/// Same body as solve, plus an optional `limit` capped by the configured
/// `max_enumerated`.
async fn enumerate(
    state: web::Data<AppState>,
    req: web::Json<EnumerateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if let Some(rejection) = check_size(&state.limits, &req.proposers, &req.responders) {
        return rejection;
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("enumerate", request_id = %request_id);
    let EnumerateRequest { proposers, responders, limit } = req.into_inner();

    let ceiling = state.limits.max_enumerated.max(1);
    let limit = limit.unwrap_or(ceiling).clamp(1, ceiling);

    // One past the limit tells us whether the output was cut short
    let result = web::block(move || {
        let _entered = span.enter();
        enumerate_stable_up_to(&proposers, &responders, limit.saturating_add(1))
    })
    .await;

    let mut matchings = match result {
        Ok(Ok(matchings)) => matchings,
        Ok(Err(e)) => return malformed(&request_id, e),
        Err(e) => return worker_failed(&request_id, e),
    };

    let truncated = matchings.len() > limit;
    matchings.truncate(limit);

    tracing::info!(
        request_id = %request_id,
        "Returning {} stable matchings{}",
        matchings.len(),
        if truncated { " (truncated)" } else { "" }
    );

    HttpResponse::Ok().json(EnumerateResponse {
        request_id,
        count: matchings.len(),
        matchings,
        truncated,
    })
}
