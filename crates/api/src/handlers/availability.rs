//! # Availability Handlers
//!
//! This module contains the handler for the next-slot query: given a
//! teacher and a starting instant, report the next open meeting slot.
//!
//! ## Slot Matching
//!
//! The search itself lives in the core crate (`slots::next_open_slot`);
//! this handler is responsible for the wire contract around it:
//!
//! 1. Parse the optional `from` instant. ISO-8601 with an offset or `Z`
//!    is accepted; an offset-less value is treated as already UTC; when
//!    absent the current instant is used.
//! 2. Resolve the teacher (404 if unknown) and run the search through the
//!    scheduler so booked slots are honored.
//! 3. Return the match in both UTC and the teacher's local time, or a
//!    null slot when the horizon is exhausted — an empty result is a
//!    normal outcome, not an error.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use afterhours_core::models::ticket::{parse_utc_instant, NextSlotResponse};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the next-slot endpoint
#[derive(Debug, Deserialize)]
pub struct NextSlotQuery {
    /// Search from this instant; defaults to now
    pub from: Option<String>,

    /// Override the configured search horizon
    pub search_days: Option<u32>,
}

#[axum::debug_handler]
pub async fn next_slot(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<NextSlotQuery>,
) -> Result<Json<NextSlotResponse>, AppError> {
    let from = match &query.from {
        Some(raw) => parse_utc_instant(raw)?,
        None => Utc::now(),
    };

    let slot = state
        .scheduler
        .find_next_slot(teacher_id, from, query.search_days)
        .await?;

    let response = match slot {
        Some(slot) => NextSlotResponse {
            slot_utc: Some(slot.utc),
            slot_local: Some(slot.local.to_rfc3339()),
        },
        None => NextSlotResponse {
            slot_utc: None,
            slot_local: None,
        },
    };

    Ok(Json(response))
}
