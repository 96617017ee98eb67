use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ConnectError, ConnectResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Queued,
    Scheduled,
    Answered,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Queued => "QUEUED",
            TicketStatus::Scheduled => "SCHEDULED",
            TicketStatus::Answered => "ANSWERED",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> ConnectResult<Self> {
        match value.trim() {
            "QUEUED" => Ok(TicketStatus::Queued),
            "SCHEDULED" => Ok(TicketStatus::Scheduled),
            "ANSWERED" => Ok(TicketStatus::Answered),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            other => Err(ConnectError::Validation(format!(
                "Unknown ticket status: {other:?}"
            ))),
        }
    }

    /// A ticket is open until the teacher answers it or it is cancelled.
    pub fn is_open(&self) -> bool {
        matches!(self, TicketStatus::Queued | TicketStatus::Scheduled)
    }
}

/// Identifying info of the submitter, denormalized at creation time and
/// never re-resolved against the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub name: String,
    pub email: Option<String>,
    pub submitter_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub requester: Requester,
    pub question: String,
    pub submitted_at: DateTime<Utc>,
    pub status: TicketStatus,
    pub scheduled_slot: Option<DateTime<Utc>>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Parse an instant supplied as text. Accepts ISO-8601 with an explicit
/// offset or `Z` marker; an offset-less value is treated as already UTC.
pub fn parse_utc_instant(value: &str) -> ConnectResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ConnectError::Validation(format!("Invalid instant: {value:?}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTicketRequest {
    pub teacher_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub submitter_id: String,
    pub question: String,
    /// Optional override of the submission instant; defaults to now.
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTicketResponse {
    pub ticket_id: Uuid,
    pub teacher: String,
    pub status: TicketStatus,
    pub scheduled_slot_utc: Option<DateTime<Utc>>,
    pub scheduled_local: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTicketResponse {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
    pub submitter_id: String,
    pub question: String,
    pub submitted_at: DateTime<Utc>,
    pub status: TicketStatus,
    pub scheduled_slot_utc: Option<DateTime<Utc>>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<Ticket> for GetTicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            teacher_id: ticket.teacher_id,
            submitter_name: ticket.requester.name,
            submitter_email: ticket.requester.email,
            submitter_id: ticket.requester.submitter_id,
            question: ticket.question,
            submitted_at: ticket.submitted_at,
            status: ticket.status,
            scheduled_slot_utc: ticket.scheduled_slot,
            response: ticket.response,
            responded_at: ticket.responded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<GetTicketResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondTicketRequest {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextSlotResponse {
    pub slot_utc: Option<DateTime<Utc>>,
    pub slot_local: Option<String>,
}

/// Aggregated ticket counts over a trailing window of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketMetrics {
    pub total: i64,
    pub queued: i64,
    pub scheduled: i64,
    pub answered: i64,
    pub cancelled: i64,
    pub avg_response_hours: Option<f64>,
}
