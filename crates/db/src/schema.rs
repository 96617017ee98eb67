use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            timezone VARCHAR(64) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create availability_windows table; boundaries are HH:MM wall-clock
    // text interpreted in the teacher's timezone
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability_windows (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            weekday SMALLINT NOT NULL,
            start_hm VARCHAR(5) NOT NULL,
            end_hm VARCHAR(5) NOT NULL,
            CONSTRAINT valid_weekday CHECK (weekday BETWEEN 0 AND 6),
            CONSTRAINT valid_window CHECK (start_hm < end_hm)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tickets table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            submitter_name VARCHAR(255) NOT NULL,
            submitter_email VARCHAR(255) NULL,
            submitter_id VARCHAR(255) NOT NULL,
            question TEXT NOT NULL,
            submitted_at TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL,
            scheduled_slot_utc TIMESTAMP WITH TIME ZONE NULL,
            response TEXT NULL,
            responded_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_availability_windows_teacher_id ON availability_windows(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_tickets_teacher_id ON tickets(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_tickets_submitter_id ON tickets(submitter_id);
        CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
        CREATE INDEX IF NOT EXISTS idx_tickets_scheduled_slot ON tickets(scheduled_slot_utc);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
