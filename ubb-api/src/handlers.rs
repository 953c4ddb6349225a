//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use ubb_core::constants::CALLER_HEADER;
use ubb_core::types::{EthAddress, Faculty, SpecializationView};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Reads the caller address a mutating request acts as.
fn caller(headers: &HeaderMap) -> Result<EthAddress> {
    let value = headers
        .get(CALLER_HEADER)
        .ok_or_else(|| ApiError::bad_request(format!("Missing {CALLER_HEADER} header")))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::bad_request(format!("Invalid {CALLER_HEADER} header")))?;
    Ok(EthAddress::from_hex(value)?)
}

/// Re-reads a student after a status change.
async fn student_by_cnp(state: &AppState, national_id: &str) -> Result<StudentDto> {
    state
        .registry
        .verify_by_national_id(national_id)
        .await?
        .map(StudentDto::from)
        .ok_or_else(|| ApiError::internal("Student vanished after update"))
}

/// GET /api/v1/owner
pub async fn get_owner(State(state): State<Arc<AppState>>) -> Json<OwnerResponse> {
    Json(OwnerResponse {
        owner: state.registry.owner().to_hex_string(),
    })
}

/// POST /api/v1/faculties
pub async fn add_faculty(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddFacultyRequest>,
) -> Result<(StatusCode, Json<FacultyDto>)> {
    let caller = caller(&headers)?;

    state
        .registry
        .add_faculty(&caller, &req.name, &req.symbol)
        .await?;

    info!(symbol = %req.symbol, "Faculty added");
    Ok((
        StatusCode::CREATED,
        Json(FacultyDto::from(Faculty::new(req.name, req.symbol))),
    ))
}

/// GET /api/v1/faculties/:symbol
pub async fn get_faculty(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<FacultyDto>> {
    let faculty = state
        .registry
        .get_faculty(&symbol)
        .await?
        .ok_or_else(|| ApiError::not_found("Unknown Faculty"))?;

    Ok(Json(faculty.into()))
}

/// POST /api/v1/specializations
pub async fn add_specialization(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddSpecializationRequest>,
) -> Result<(StatusCode, Json<SpecializationDto>)> {
    let caller = caller(&headers)?;

    state
        .registry
        .add_specialization(&caller, &req.name, req.duration_years, &req.faculty_symbol)
        .await?;

    info!(name = %req.name, faculty = %req.faculty_symbol, "Specialization added");

    let view = state
        .registry
        .get_specialization(&req.name)
        .await?
        .ok_or_else(|| ApiError::internal("Specialization vanished after insert"))?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /api/v1/specializations/:name
pub async fn get_specialization(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SpecializationDto>> {
    let view: SpecializationView = state
        .registry
        .get_specialization(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Unknown Specialisation"))?;

    Ok(Json(view.into()))
}

/// POST /api/v1/students
pub async fn add_student(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<StudentDto>)> {
    let caller = caller(&headers)?;
    let address = EthAddress::from_hex(&req.address)?;

    state
        .registry
        .add_student(&caller, &address, &req.name, &req.national_id, &req.specialization)
        .await?;

    info!(%address, specialization = %req.specialization, "Student registered");
    Ok((StatusCode::CREATED, Json(student_by_cnp(&state, &req.national_id).await?)))
}

/// GET /api/v1/students/address/:address
pub async fn verify_by_address(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<StudentDto>> {
    let address = EthAddress::from_hex(&address)?;

    let student = state
        .registry
        .verify_by_address(&address)
        .await?
        .ok_or_else(|| ApiError::not_found("Non-Existing Student"))?;

    Ok(Json(student.into()))
}

/// GET /api/v1/students/cnp/:national_id
pub async fn verify_by_national_id(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> Result<Json<StudentDto>> {
    let student = state
        .registry
        .verify_by_national_id(&national_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Non-Existing Student"))?;

    Ok(Json(student.into()))
}

/// POST /api/v1/students/:national_id/finish
pub async fn mark_finished(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(national_id): Path<String>,
) -> Result<Json<StudentDto>> {
    let caller = caller(&headers)?;

    state.registry.mark_finished(&caller, &national_id).await?;

    info!(national_id = %national_id, "Student marked finished");
    Ok(Json(student_by_cnp(&state, &national_id).await?))
}

/// POST /api/v1/students/:national_id/suspend
pub async fn mark_suspended(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(national_id): Path<String>,
) -> Result<Json<StudentDto>> {
    let caller = caller(&headers)?;

    state.registry.mark_suspended(&caller, &national_id).await?;

    info!(national_id = %national_id, "Student marked suspended");
    Ok(Json(student_by_cnp(&state, &national_id).await?))
}

/// GET /api/v1/registry/stats
pub async fn get_registry_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>> {
    let stats = state.registry.stats().await?;
    Ok(Json(stats.into()))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.uptime_seconds(),
    })
}
