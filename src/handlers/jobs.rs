// handlers/jobs.rs - /jobs handlers

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::job::{self, Job};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schemas::{job_search, job_update, read_json, NewJob};

/// Job ids are integers; anything else cannot name a job
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| job::not_found(raw).into())
}

/// POST /jobs
pub async fn job_post(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Job> {
    let new_job = NewJob::from_body(read_json(body)?)?;
    let job = Job::create(&state.pool, new_job).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn jobs_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Job>> {
    let filters = job_search(query.as_deref())?;
    let jobs = Job::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id
pub async fn job_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let job = Job::get(&state.pool, parse_id(&id)?).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id
pub async fn job_patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let id = parse_id(&id)?;
    let data = job_update(read_json(body)?)?;
    let job = Job::update(&state.pool, id, &data).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id
pub async fn job_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<i32> {
    let id = parse_id(&id)?;
    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success("deleted", id))
}
