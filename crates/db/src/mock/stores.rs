//! In-memory store implementations. Handler and router tests inject these
//! instead of a Postgres pool; behavior mirrors the `stores` module.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use afterhours_core::errors::{ConnectError, ConnectResult};
use afterhours_core::models::teacher::{TeacherAvailability, WeeklyWindow};
use afterhours_core::models::ticket::{Ticket, TicketMetrics, TicketStatus};
use afterhours_core::store::{TeacherDirectory, TicketStore};

#[derive(Default)]
pub struct MemoryTeacherDirectory {
    teachers: RwLock<HashMap<Uuid, TeacherAvailability>>,
}

impl MemoryTeacherDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeacherDirectory for MemoryTeacherDirectory {
    async fn insert(&self, teacher: TeacherAvailability) -> ConnectResult<Uuid> {
        let id = teacher.teacher_id;
        self.teachers.write().await.insert(id, teacher);
        Ok(id)
    }

    async fn get(&self, teacher_id: Uuid) -> ConnectResult<Option<TeacherAvailability>> {
        Ok(self.teachers.read().await.get(&teacher_id).cloned())
    }

    async fn list(&self) -> ConnectResult<Vec<TeacherAvailability>> {
        let mut teachers: Vec<TeacherAvailability> =
            self.teachers.read().await.values().cloned().collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teachers)
    }

    async fn replace_windows(
        &self,
        teacher_id: Uuid,
        windows: Vec<WeeklyWindow>,
    ) -> ConnectResult<()> {
        match self.teachers.write().await.get_mut(&teacher_id) {
            Some(teacher) => {
                teacher.weekly_windows = windows;
                Ok(())
            }
            None => Err(ConnectError::NotFound(format!(
                "Teacher with ID {teacher_id} not found"
            ))),
        }
    }
}

#[derive(Default)]
pub struct MemoryTicketStore {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: Ticket) -> ConnectResult<Uuid> {
        let id = ticket.id;
        self.tickets.write().await.insert(id, ticket);
        Ok(id)
    }

    async fn get(&self, ticket_id: Uuid) -> ConnectResult<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&ticket_id).cloned())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<TicketStatus>,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|ticket| ticket.teacher_id == teacher_id)
            .filter(|ticket| status.map_or(true, |s| ticket.status == s))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        tickets.truncate(limit.max(0) as usize);
        Ok(tickets)
    }

    async fn list_for_submitter(
        &self,
        submitter_id: &str,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|ticket| ticket.requester.submitter_id == submitter_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        tickets.truncate(limit.max(0) as usize);
        Ok(tickets)
    }

    async fn list_scheduled(&self, teacher_id: Uuid) -> ConnectResult<Vec<DateTime<Utc>>> {
        let mut starts: Vec<DateTime<Utc>> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|ticket| {
                ticket.teacher_id == teacher_id && ticket.status == TicketStatus::Scheduled
            })
            .filter_map(|ticket| ticket.scheduled_slot)
            .collect();
        starts.sort();
        Ok(starts)
    }

    async fn record_response(
        &self,
        ticket_id: Uuid,
        response: &str,
        responded_at: DateTime<Utc>,
    ) -> ConnectResult<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets.get_mut(&ticket_id).ok_or_else(|| {
            ConnectError::NotFound(format!("Ticket with ID {ticket_id} not found"))
        })?;
        ticket.response = Some(response.to_string());
        ticket.responded_at = Some(responded_at);
        ticket.status = TicketStatus::Answered;
        Ok(ticket.clone())
    }

    async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> ConnectResult<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets.get_mut(&ticket_id).ok_or_else(|| {
            ConnectError::NotFound(format!("Ticket with ID {ticket_id} not found"))
        })?;
        ticket.status = status;
        Ok(ticket.clone())
    }

    async fn summary_metrics(
        &self,
        teacher_id: Option<Uuid>,
        days: i64,
    ) -> ConnectResult<TicketMetrics> {
        let cutoff = Utc::now() - Duration::days(days);
        let tickets = self.tickets.read().await;
        let relevant: Vec<&Ticket> = tickets
            .values()
            .filter(|ticket| teacher_id.map_or(true, |id| ticket.teacher_id == id))
            .filter(|ticket| ticket.submitted_at >= cutoff)
            .collect();

        let count =
            |status: TicketStatus| relevant.iter().filter(|t| t.status == status).count() as i64;

        let response_hours: Vec<f64> = relevant
            .iter()
            .filter_map(|ticket| {
                let responded_at = ticket.responded_at?;
                Some((responded_at - ticket.submitted_at).num_seconds() as f64 / 3600.0)
            })
            .collect();
        let avg_response_hours = if response_hours.is_empty() {
            None
        } else {
            Some(response_hours.iter().sum::<f64>() / response_hours.len() as f64)
        };

        Ok(TicketMetrics {
            total: relevant.len() as i64,
            queued: count(TicketStatus::Queued),
            scheduled: count(TicketStatus::Scheduled),
            answered: count(TicketStatus::Answered),
            cancelled: count(TicketStatus::Cancelled),
            avg_response_hours,
        })
    }
}
