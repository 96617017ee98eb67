use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use afterhours_core::errors::{ConnectError, ConnectResult};
use afterhours_core::models::teacher::{parse_timezone, TeacherAvailability, WeeklyWindow};
use afterhours_core::models::ticket::{Requester, Ticket, TicketStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityWindow {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub weekday: i16,
    pub start_hm: String,
    pub end_hm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTicket {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
    pub submitter_id: String,
    pub question: String,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    pub scheduled_slot_utc: Option<DateTime<Utc>>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTicketMetrics {
    pub total: i64,
    pub queued: i64,
    pub scheduled: i64,
    pub answered: i64,
    pub cancelled: i64,
    pub avg_response_hours: Option<f64>,
}

impl DbTeacher {
    /// Build the typed availability record the scheduler works with. Row
    /// text (timezone name, `HH:MM` boundaries) is parsed here, once, at
    /// the storage boundary.
    pub fn into_availability(
        self,
        windows: Vec<DbAvailabilityWindow>,
    ) -> ConnectResult<TeacherAvailability> {
        let timezone = parse_timezone(&self.timezone)?;
        let weekly_windows = windows
            .into_iter()
            .map(DbAvailabilityWindow::into_window)
            .collect::<ConnectResult<Vec<_>>>()?;
        Ok(TeacherAvailability {
            teacher_id: self.id,
            name: self.name,
            email: self.email,
            timezone,
            weekly_windows,
        })
    }
}

impl DbAvailabilityWindow {
    pub fn into_window(self) -> ConnectResult<WeeklyWindow> {
        let weekday = u8::try_from(self.weekday).map_err(|_| {
            ConnectError::Validation(format!("Invalid stored weekday: {}", self.weekday))
        })?;
        WeeklyWindow::parse(weekday, &self.start_hm, &self.end_hm)
    }
}

impl DbTicket {
    pub fn into_ticket(self) -> ConnectResult<Ticket> {
        let status = TicketStatus::parse(&self.status)?;
        Ok(Ticket {
            id: self.id,
            teacher_id: self.teacher_id,
            requester: Requester {
                name: self.submitter_name,
                email: self.submitter_email,
                submitter_id: self.submitter_id,
            },
            question: self.question,
            submitted_at: self.submitted_at,
            status,
            scheduled_slot: self.scheduled_slot_utc,
            response: self.response,
            responded_at: self.responded_at,
        })
    }
}
