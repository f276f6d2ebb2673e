use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::helpers::{optional_text, parse_body, reject_unknown_fields, Params};
use crate::api::types::AppState;
use crate::store::{current_timestamp, AttendanceRecord, AttendanceStatus, Teacher};
use crate::summary::{parse_limit, recent_first};

pub const ATTENDANCE_APPLIED: &str = "Fingerprint verified and attendance applied.";
pub const ATTENDANCE_FIELDS_REQUIRED: &str =
    "teacherId, deviceId, and fingerprintToken are required.";
pub const TEACHER_NOT_FOUND: &str = "Teacher not found.";
pub const FINGERPRINT_REJECTED: &str =
    "Fingerprint verification failed. Use valid token format: VALID_<TEACHER_ID>";

const TOKEN_PREFIX: &str = "VALID_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintCheckIn {
    pub teacher_id: String,
    pub device_id: String,
    pub fingerprint_token: String,
}

impl FingerprintCheckIn {
    pub const FIELDS: [&'static str; 3] = ["teacherId", "deviceId", "fingerprintToken"];

    pub fn from_params(params: &Params) -> Result<Self, ApiError> {
        reject_unknown_fields(params, &Self::FIELDS)?;

        let teacher_id = optional_text(params, "teacherId")?;
        let device_id = optional_text(params, "deviceId")?;
        let fingerprint_token = optional_text(params, "fingerprintToken")?;
        let (Some(teacher_id), Some(device_id), Some(fingerprint_token)) =
            (teacher_id, device_id, fingerprint_token)
        else {
            return Err(ApiError::validation(ATTENDANCE_FIELDS_REQUIRED));
        };

        Ok(Self {
            teacher_id,
            device_id,
            fingerprint_token,
        })
    }
}

/// Token a scanner must present for `teacher_id`. Stand-in for a real
/// biometric match.
pub fn expected_token(teacher_id: &str) -> String {
    format!("{TOKEN_PREFIX}{teacher_id}")
}

/// Exact, case-sensitive comparison; no trimming or normalisation.
pub fn verify_fingerprint(teacher: &Teacher, token: &str) -> Result<(), ApiError> {
    if token == expected_token(&teacher.id) {
        Ok(())
    } else {
        Err(ApiError::Authentication(FINGERPRINT_REJECTED.to_string()))
    }
}

async fn handle_attendance_live(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit = parse_limit(query.get("limit").map(String::as_str));
    let store = state.store.read().await;
    Json(json!({
        "logs": recent_first(store.attendance(), limit),
        "total": store.attendance().len(),
    }))
}

async fn handle_attendance_fingerprint(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = FingerprintCheckIn::from_params(&parse_body(&body)?)?;

    let mut store = state.store.write().await;
    let Some(teacher) = store.find_teacher(&input.teacher_id) else {
        warn!(teacher_id = %input.teacher_id, device_id = %input.device_id, "unknown teacher");
        return Err(ApiError::NotFound(TEACHER_NOT_FOUND.to_string()));
    };
    if let Err(e) = verify_fingerprint(teacher, &input.fingerprint_token) {
        warn!(teacher_id = %teacher.id, device_id = %input.device_id, "fingerprint rejected");
        return Err(e);
    }
    let (teacher_id, teacher_name) = (teacher.id.clone(), teacher.name.clone());

    let attendance = AttendanceRecord {
        id: store.next_attendance_id(),
        teacher_id,
        teacher_name,
        device_id: input.device_id,
        status: AttendanceStatus::Present,
        verified_at: current_timestamp(),
    };
    store.append_attendance(attendance.clone());
    info!(
        attendance_id = %attendance.id,
        teacher_id = %attendance.teacher_id,
        device_id = %attendance.device_id,
        "attendance applied"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": ATTENDANCE_APPLIED, "attendance": attendance })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/attendance/live", get(handle_attendance_live))
        .route("/api/attendance/fingerprint", post(handle_attendance_fingerprint))
}
