// handlers/companies.rs - /companies handlers
//
// Reads are public; writes sit behind the admin guard in the router.

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Company, CompanyDetail};
use crate::middleware::{ApiResponse, ApiResult};
use crate::schemas::{company_search, company_update, read_json, NewCompany};

/// POST /companies
pub async fn company_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let new_company = NewCompany::from_body(read_json(body)?)?;
    let company = Company::create(&state.pool, new_company).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies?minEmployees=&maxEmployees=&nameLike=
pub async fn companies_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Company>> {
    let filters = company_search(query.as_deref())?;
    let companies = Company::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle, including the company's jobs
pub async fn company_get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle
pub async fn company_patch(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let data = company_update(read_json(body)?)?;
    let company = Company::update(&state.pool, &handle, &data).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle
pub async fn company_delete(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<String> {
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success("deleted", handle))
}
