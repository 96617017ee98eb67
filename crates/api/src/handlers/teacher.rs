use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use afterhours_core::{
    errors::ConnectError,
    models::teacher::{
        parse_timezone, CreateTeacherRequest, CreateTeacherResponse, GetTeacherResponse,
        ListTeachersResponse, ReplaceAvailabilityRequest, ReplaceAvailabilityResponse,
        TeacherAvailability, TeacherSummary, WindowSpec,
    },
};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_teacher(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<Json<CreateTeacherResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError(ConnectError::Validation(
            "Teacher name must not be empty".to_string(),
        )));
    }

    let timezone = parse_timezone(&payload.timezone)?;
    let weekly_windows = payload
        .windows
        .iter()
        .map(WindowSpec::to_window)
        .collect::<Result<Vec<_>, _>>()?;

    let teacher = TeacherAvailability {
        teacher_id: Uuid::new_v4(),
        name: name.to_string(),
        email: payload.email.clone(),
        timezone,
        weekly_windows,
    };

    let id = state.directory.insert(teacher).await?;

    Ok(Json(CreateTeacherResponse {
        id,
        name: name.to_string(),
        timezone: timezone.name().to_string(),
    }))
}

#[axum::debug_handler]
pub async fn get_teacher(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetTeacherResponse>, AppError> {
    let teacher = state
        .directory
        .get(id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Teacher with ID {id} not found")))?;

    Ok(Json(GetTeacherResponse::from(&teacher)))
}

#[axum::debug_handler]
pub async fn list_teachers(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListTeachersResponse>, AppError> {
    let teachers = state.directory.list().await?;

    Ok(Json(ListTeachersResponse {
        teachers: teachers
            .iter()
            .map(|teacher| TeacherSummary {
                id: teacher.teacher_id,
                name: teacher.name.clone(),
                timezone: teacher.timezone.name().to_string(),
            })
            .collect(),
    }))
}

#[axum::debug_handler]
pub async fn replace_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceAvailabilityRequest>,
) -> Result<Json<ReplaceAvailabilityResponse>, AppError> {
    let windows = payload
        .windows
        .iter()
        .map(WindowSpec::to_window)
        .collect::<Result<Vec<_>, _>>()?;

    state.directory.replace_windows(id, windows.clone()).await?;

    Ok(Json(ReplaceAvailabilityResponse {
        teacher_id: id,
        windows: windows.iter().map(WindowSpec::from).collect(),
    }))
}
