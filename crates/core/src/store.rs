//! Store abstractions the scheduler and API are written against.
//!
//! Persistence is injected: the scheduler never reaches for a connection
//! pool or any other ambient state container. The database crate provides
//! Postgres implementations; its mock module provides in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::ConnectResult;
use crate::models::teacher::{TeacherAvailability, WeeklyWindow};
use crate::models::ticket::{Ticket, TicketMetrics, TicketStatus};

/// Name/timezone/availability lookup for teachers.
#[async_trait]
pub trait TeacherDirectory: Send + Sync {
    /// Persist a new teacher record; returns the teacher id.
    async fn insert(&self, teacher: TeacherAvailability) -> ConnectResult<Uuid>;

    async fn get(&self, teacher_id: Uuid) -> ConnectResult<Option<TeacherAvailability>>;

    async fn list(&self) -> ConnectResult<Vec<TeacherAvailability>>;

    /// Replace the teacher's weekly windows wholesale.
    async fn replace_windows(
        &self,
        teacher_id: Uuid,
        windows: Vec<WeeklyWindow>,
    ) -> ConnectResult<()>;
}

/// Persistence for submitted tickets and their resolution state.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket; returns the ticket id.
    async fn insert(&self, ticket: Ticket) -> ConnectResult<Uuid>;

    async fn get(&self, ticket_id: Uuid) -> ConnectResult<Option<Ticket>>;

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<TicketStatus>,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>>;

    async fn list_for_submitter(
        &self,
        submitter_id: &str,
        limit: i64,
    ) -> ConnectResult<Vec<Ticket>>;

    /// UTC start instants of every `Scheduled` ticket for the teacher.
    /// This is what the slot search treats as taken.
    async fn list_scheduled(&self, teacher_id: Uuid) -> ConnectResult<Vec<DateTime<Utc>>>;

    /// Record the teacher's answer and mark the ticket `Answered`.
    async fn record_response(
        &self,
        ticket_id: Uuid,
        response: &str,
        responded_at: DateTime<Utc>,
    ) -> ConnectResult<Ticket>;

    async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> ConnectResult<Ticket>;

    /// Aggregate counts over the trailing `days`, optionally per teacher.
    async fn summary_metrics(
        &self,
        teacher_id: Option<Uuid>,
        days: i64,
    ) -> ConnectResult<TicketMetrics>;
}
