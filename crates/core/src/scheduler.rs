//! The booking service: composes the teacher directory, the ticket store
//! and the slot search, and serializes bookings per teacher so that two
//! concurrent submissions can never claim the same slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{ConnectError, ConnectResult};
use crate::models::ticket::{Requester, SubmitTicketResponse, Ticket, TicketStatus};
use crate::slots::{next_open_slot, DEFAULT_SEARCH_DAYS};
use crate::store::{TeacherDirectory, TicketStore};

/// A matched meeting start, in both the wire (UTC) and display
/// (teacher-local) representations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextSlot {
    pub utc: DateTime<Utc>,
    pub local: DateTime<Tz>,
}

impl NextSlot {
    fn from_local(local: DateTime<Tz>) -> Self {
        Self {
            utc: local.with_timezone(&Utc),
            local,
        }
    }
}

pub struct AvailabilityScheduler {
    directory: Arc<dyn TeacherDirectory>,
    tickets: Arc<dyn TicketStore>,
    search_days: u32,
    teacher_locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AvailabilityScheduler {
    pub fn new(directory: Arc<dyn TeacherDirectory>, tickets: Arc<dyn TicketStore>) -> Self {
        Self {
            directory,
            tickets,
            search_days: DEFAULT_SEARCH_DAYS,
            teacher_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn with_search_days(mut self, search_days: u32) -> Self {
        self.search_days = search_days;
        self
    }

    /// Find the next open slot for the teacher at or after `from`.
    ///
    /// `Ok(None)` means the horizon was exhausted — a normal scheduling
    /// outcome, distinct from the `NotFound` error for an unknown teacher.
    pub async fn find_next_slot(
        &self,
        teacher_id: Uuid,
        from: DateTime<Utc>,
        search_days: Option<u32>,
    ) -> ConnectResult<Option<NextSlot>> {
        let teacher = self
            .directory
            .get(teacher_id)
            .await?
            .ok_or_else(|| ConnectError::NotFound(format!("Teacher with ID {teacher_id} not found")))?;

        if teacher.weekly_windows.is_empty() {
            return Ok(None);
        }

        let booked = self.tickets.list_scheduled(teacher_id).await?;
        let search_days = search_days.unwrap_or(self.search_days);
        Ok(next_open_slot(&teacher, &booked, from, search_days).map(NextSlot::from_local))
    }

    /// Create a ticket, booking the next open slot if one exists within
    /// the horizon. Status and slot are decided once, here; the ticket is
    /// immediately visible to subsequent searches.
    pub async fn submit_ticket(
        &self,
        teacher_id: Uuid,
        requester: Requester,
        question: &str,
        submitted_at: Option<DateTime<Utc>>,
    ) -> ConnectResult<SubmitTicketResponse> {
        let teacher = self
            .directory
            .get(teacher_id)
            .await?
            .ok_or_else(|| ConnectError::NotFound(format!("Teacher with ID {teacher_id} not found")))?;

        let question = question.trim();
        if question.is_empty() {
            return Err(ConnectError::Validation(
                "Question text must not be empty".to_string(),
            ));
        }

        let submitted_at = submitted_at.unwrap_or_else(Utc::now);

        // Slot search and insert must be observed as one atomic step per
        // teacher; bookings for different teachers proceed in parallel.
        let lock = self.lock_for(teacher_id);
        let _guard = lock.lock().await;

        let slot = if teacher.weekly_windows.is_empty() {
            None
        } else {
            let booked = self.tickets.list_scheduled(teacher_id).await?;
            next_open_slot(&teacher, &booked, submitted_at, self.search_days)
        };

        let (status, scheduled_slot) = match slot {
            Some(local) => (TicketStatus::Scheduled, Some(local.with_timezone(&Utc))),
            None => (TicketStatus::Queued, None),
        };

        let ticket = Ticket {
            id: Uuid::new_v4(),
            teacher_id,
            requester,
            question: question.to_string(),
            submitted_at,
            status,
            scheduled_slot,
            response: None,
            responded_at: None,
        };

        let ticket_id = self.tickets.insert(ticket).await?;

        Ok(SubmitTicketResponse {
            ticket_id,
            teacher: teacher.name,
            status,
            scheduled_slot_utc: scheduled_slot,
            scheduled_local: slot.map(|local| local.to_rfc3339()),
        })
    }

    fn lock_for(&self, teacher_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .teacher_locks
            .lock()
            .expect("teacher lock map poisoned");
        locks.entry(teacher_id).or_default().clone()
    }
}
