use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;

use cvm_common::api::{
    CandidateMatch, CvMatchingRequest, JobMatch, JobMatchingRequest, MatchingResponse,
};

use crate::SharedState;
use crate::error::ApiError;

pub async fn job_matching(
    State(state): State<SharedState>,
    payload: Result<Json<JobMatchingRequest>, JsonRejection>,
) -> Result<Json<MatchingResponse<Vec<CandidateMatch>>>, ApiError> {
    let Json(request) = payload?;

    let outcome = state
        .engine
        .match_candidates_for_job(request.into_requirement())
        .await?;
    let response = MatchingResponse::from_candidates(&outcome);
    info!(
        results = response.data.len(),
        no_results = response.no_results,
        "job matching finished"
    );

    Ok(Json(response))
}

pub async fn cv_matching(
    State(state): State<SharedState>,
    payload: Result<Json<CvMatchingRequest>, JsonRejection>,
) -> Result<Json<MatchingResponse<Option<JobMatch>>>, ApiError> {
    let Json(request) = payload?;

    let outcome = state
        .engine
        .match_job_for_candidate(&request.full_content)
        .await?;
    let response = MatchingResponse::from_jobs(&outcome);
    info!(no_results = response.no_results, "cv matching finished");

    Ok(Json(response))
}
