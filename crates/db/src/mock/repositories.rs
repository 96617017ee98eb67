use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use afterhours_core::errors::ConnectResult;
use afterhours_core::models::teacher::{TeacherAvailability, WeeklyWindow};
use afterhours_core::models::ticket::{Ticket, TicketMetrics, TicketStatus};
use afterhours_core::store::{TeacherDirectory, TicketStore};

// Mock stores for failure-path testing
mock! {
    pub TeacherDirectoryRepo {}

    #[async_trait]
    impl TeacherDirectory for TeacherDirectoryRepo {
        async fn insert(&self, teacher: TeacherAvailability) -> ConnectResult<Uuid>;

        async fn get(&self, teacher_id: Uuid) -> ConnectResult<Option<TeacherAvailability>>;

        async fn list(&self) -> ConnectResult<Vec<TeacherAvailability>>;

        async fn replace_windows(
            &self,
            teacher_id: Uuid,
            windows: Vec<WeeklyWindow>,
        ) -> ConnectResult<()>;
    }
}

mock! {
    pub TicketStoreRepo {}

    #[async_trait]
    impl TicketStore for TicketStoreRepo {
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

        async fn list_scheduled(&self, teacher_id: Uuid) -> ConnectResult<Vec<DateTime<Utc>>>;

        async fn record_response(
            &self,
            ticket_id: Uuid,
            response: &str,
            responded_at: DateTime<Utc>,
        ) -> ConnectResult<Ticket>;

        async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> ConnectResult<Ticket>;

        async fn summary_metrics(
            &self,
            teacher_id: Option<Uuid>,
            days: i64,
        ) -> ConnectResult<TicketMetrics>;
    }
}
