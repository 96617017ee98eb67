//! Postgres-backed implementations of the core store traits. These are
//! thin adapters over the repository functions; all row-to-domain
//! conversion happens in [`crate::models`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use afterhours_core::errors::{ConnectError, ConnectResult};
use afterhours_core::models::teacher::{TeacherAvailability, WeeklyWindow};
use afterhours_core::models::ticket::{Ticket, TicketMetrics, TicketStatus};
use afterhours_core::store::{TeacherDirectory, TicketStore};

use crate::repositories::{teacher, ticket};
use crate::DbPool;

pub struct PgTeacherDirectory {
    pool: DbPool,
}

impl PgTeacherDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherDirectory for PgTeacherDirectory {
    async fn insert(&self, record: TeacherAvailability) -> ConnectResult<Uuid> {
        let row = teacher::create_teacher(
            &self.pool,
            record.teacher_id,
            &record.name,
            record.email.as_deref(),
            record.timezone.name(),
        )
        .await?;
        for window in &record.weekly_windows {
            teacher::create_window(&self.pool, row.id, window).await?;
        }
        Ok(row.id)
    }

    async fn get(&self, teacher_id: Uuid) -> ConnectResult<Option<TeacherAvailability>> {
        let Some(row) = teacher::get_teacher_by_id(&self.pool, teacher_id).await? else {
            return Ok(None);
        };
        let windows = teacher::get_windows_by_teacher_id(&self.pool, teacher_id).await?;
        Ok(Some(row.into_availability(windows)?))
    }

    async fn list(&self) -> ConnectResult<Vec<TeacherAvailability>> {
        let rows = teacher::list_teachers(&self.pool).await?;
        let mut teachers = Vec::with_capacity(rows.len());
        for row in rows {
            let windows = teacher::get_windows_by_teacher_id(&self.pool, row.id).await?;
            teachers.push(row.into_availability(windows)?);
        }
        Ok(teachers)
    }

    async fn replace_windows(
        &self,
        teacher_id: Uuid,
        windows: Vec<WeeklyWindow>,
    ) -> ConnectResult<()> {
        if teacher::get_teacher_by_id(&self.pool, teacher_id).await?.is_none() {
            return Err(ConnectError::NotFound(format!(
                "Teacher with ID {teacher_id} not found"
            )));
        }
        teacher::delete_windows_by_teacher_id(&self.pool, teacher_id).await?;
        for window in &windows {
            teacher::create_window(&self.pool, teacher_id, window).await?;
        }
        Ok(())
    }
}

pub struct PgTicketStore {
    pool: DbPool,
}

impl PgTicketStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert(&self, record: Ticket) -> ConnectResult<Uuid> {
        let row = ticket::insert_ticket(&self.pool, &record).await?;
        Ok(row.id)
    }

    async fn get(&self, ticket_id: Uuid) -> ConnectResult<Option<Ticket>> {
        match ticket::get_ticket_by_id(&self.pool, ticket_id).await? {
            Some(row) => Ok(Some(row.into_ticket()?)),
            None => Ok(None),
        }
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<TicketStatus>,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>> {
        let rows = ticket::list_tickets_by_teacher(
            &self.pool,
            teacher_id,
            status.map(|s| s.as_str()),
            limit,
        )
        .await?;
        rows.into_iter().map(|row| row.into_ticket()).collect()
    }

    async fn list_for_submitter(
        &self,
        submitter_id: &str,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>> {
        let rows = ticket::list_tickets_by_submitter(&self.pool, submitter_id, limit).await?;
        rows.into_iter().map(|row| row.into_ticket()).collect()
    }

    async fn list_scheduled(&self, teacher_id: Uuid) -> ConnectResult<Vec<DateTime<Utc>>> {
        Ok(ticket::list_scheduled_starts(&self.pool, teacher_id).await?)
    }

    async fn record_response(
        &self,
        ticket_id: Uuid,
        response: &str,
        responded_at: DateTime<Utc>,
    ) -> ConnectResult<Ticket> {
        ticket::record_response(&self.pool, ticket_id, response, responded_at)
            .await?
            .ok_or_else(|| ConnectError::NotFound(format!("Ticket with ID {ticket_id} not found")))?
            .into_ticket()
    }

    async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> ConnectResult<Ticket> {
        ticket::update_ticket_status(&self.pool, ticket_id, status.as_str())
            .await?
            .ok_or_else(|| ConnectError::NotFound(format!("Ticket with ID {ticket_id} not found")))?
            .into_ticket()
    }

    async fn summary_metrics(
        &self,
        teacher_id: Option<Uuid>,
        days: i64,
    ) -> ConnectResult<TicketMetrics> {
        let row = ticket::summary_metrics(&self.pool, teacher_id, days).await?;
        Ok(TicketMetrics {
            total: row.total,
            queued: row.queued,
            scheduled: row.scheduled,
            answered: row.answered,
            cancelled: row.cancelled,
            avg_response_hours: row.avg_response_hours,
        })
    }
}
