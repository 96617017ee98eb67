use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use afterhours_core::{
    errors::ConnectError,
    models::ticket::{
        parse_utc_instant, GetTicketResponse, ListTicketsResponse, Requester,
        RespondTicketRequest, SubmitTicketRequest, SubmitTicketResponse, TicketMetrics,
        TicketStatus,
    },
};

use crate::{middleware::error_handling::AppError, ApiState};

const DEFAULT_LIST_LIMIT: i64 = 100;

#[axum::debug_handler]
pub async fn submit_ticket(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SubmitTicketRequest>,
) -> Result<Json<SubmitTicketResponse>, AppError> {
    let submitted_at = match &payload.submitted_at {
        Some(raw) => Some(parse_utc_instant(raw)?),
        None => None,
    };

    let effective = submitted_at.unwrap_or_else(Utc::now);
    if !state.window.is_open_at(effective) {
        return Err(AppError(ConnectError::Validation(
            "Questions can only be submitted during the after-hours window".to_string(),
        )));
    }

    let requester = Requester {
        name: payload.name.clone(),
        email: payload.email.clone(),
        submitter_id: payload.submitter_id.clone(),
    };

    let receipt = state
        .scheduler
        .submit_ticket(payload.teacher_id, requester, &payload.question, submitted_at)
        .await?;

    Ok(Json(receipt))
}

#[axum::debug_handler]
pub async fn get_ticket(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetTicketResponse>, AppError> {
    let ticket = state
        .tickets
        .get(id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Ticket with ID {id} not found")))?;

    Ok(Json(GetTicketResponse::from(ticket)))
}

/// Query parameters for listing a submitter's own tickets
#[derive(Debug, Deserialize)]
pub struct MyTicketsQuery {
    pub submitter_id: String,
    pub limit: Option<i64>,
}

#[axum::debug_handler]
pub async fn list_my_tickets(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<MyTicketsQuery>,
) -> Result<Json<ListTicketsResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let tickets = state
        .tickets
        .list_for_submitter(&query.submitter_id, limit)
        .await?;

    Ok(Json(ListTicketsResponse {
        tickets: tickets.into_iter().map(GetTicketResponse::from).collect(),
    }))
}

/// Query parameters for listing a teacher's tickets
#[derive(Debug, Deserialize)]
pub struct TeacherTicketsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[axum::debug_handler]
pub async fn list_teacher_tickets(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<TeacherTicketsQuery>,
) -> Result<Json<ListTicketsResponse>, AppError> {
    state
        .directory
        .get(teacher_id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Teacher with ID {teacher_id} not found")))?;

    let status = match &query.status {
        Some(raw) => Some(TicketStatus::parse(raw)?),
        None => None,
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let tickets = state
        .tickets
        .list_for_teacher(teacher_id, status, limit)
        .await?;

    Ok(Json(ListTicketsResponse {
        tickets: tickets.into_iter().map(GetTicketResponse::from).collect(),
    }))
}

#[axum::debug_handler]
pub async fn respond_ticket(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondTicketRequest>,
) -> Result<Json<GetTicketResponse>, AppError> {
    let response = payload.response.trim();
    if response.is_empty() {
        return Err(AppError(ConnectError::Validation(
            "Response text must not be empty".to_string(),
        )));
    }

    let ticket = state
        .tickets
        .get(id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Ticket with ID {id} not found")))?;
    if !ticket.status.is_open() {
        return Err(AppError(ConnectError::Validation(format!(
            "Ticket {id} has already been answered or cancelled"
        ))));
    }

    let updated = state
        .tickets
        .record_response(id, response, Utc::now())
        .await?;

    Ok(Json(GetTicketResponse::from(updated)))
}

#[axum::debug_handler]
pub async fn cancel_ticket(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetTicketResponse>, AppError> {
    let ticket = state
        .tickets
        .get(id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Ticket with ID {id} not found")))?;
    if !ticket.status.is_open() {
        return Err(AppError(ConnectError::Validation(format!(
            "Ticket {id} has already been answered or cancelled"
        ))));
    }

    let updated = state
        .tickets
        .set_status(id, TicketStatus::Cancelled)
        .await?;

    Ok(Json(GetTicketResponse::from(updated)))
}

/// Query parameters for the teacher metrics endpoint
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// Trailing window in days (default: 30)
    pub days: Option<i64>,
}

#[axum::debug_handler]
pub async fn teacher_metrics(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<TicketMetrics>, AppError> {
    state
        .directory
        .get(teacher_id)
        .await?
        .ok_or_else(|| ConnectError::NotFound(format!("Teacher with ID {teacher_id} not found")))?;

    let days = query.days.unwrap_or(30);
    let metrics = state
        .tickets
        .summary_metrics(Some(teacher_id), days)
        .await?;

    Ok(Json(metrics))
}
