use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use afterhours_core::models::ticket::Ticket;

use crate::models::{DbTicket, DbTicketMetrics};

const TICKET_COLUMNS: &str = "id, teacher_id, submitter_name, submitter_email, submitter_id, \
     question, submitted_at, status, scheduled_slot_utc, response, responded_at, created_at";

pub async fn insert_ticket(pool: &Pool<Postgres>, ticket: &Ticket) -> Result<DbTicket> {
    let now = Utc::now();

    tracing::debug!(
        "Inserting ticket: id={}, teacher={}, status={}",
        ticket.id,
        ticket.teacher_id,
        ticket.status.as_str()
    );

    let row = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        INSERT INTO tickets (id, teacher_id, submitter_name, submitter_email, submitter_id,
            question, submitted_at, status, scheduled_slot_utc, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(ticket.id)
    .bind(ticket.teacher_id)
    .bind(&ticket.requester.name)
    .bind(ticket.requester.email.as_deref())
    .bind(&ticket.requester.submitter_id)
    .bind(&ticket.question)
    .bind(ticket.submitted_at)
    .bind(ticket.status.as_str())
    .bind(ticket.scheduled_slot)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_ticket_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTicket>> {
    let ticket = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS}
        FROM tickets
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(ticket)
}

pub async fn list_tickets_by_teacher(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
    status: Option<&str>,
    limit: i64,
) -> Result<Vec<DbTicket>> {
    let tickets = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS}
        FROM tickets
        WHERE teacher_id = $1
          AND ($2::varchar IS NULL OR status = $2)
        ORDER BY submitted_at DESC
        LIMIT $3
        "#
    ))
    .bind(teacher_id)
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(tickets)
}

pub async fn list_tickets_by_submitter(
    pool: &Pool<Postgres>,
    submitter_id: &str,
    limit: i64,
) -> Result<Vec<DbTicket>> {
    let tickets = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS}
        FROM tickets
        WHERE submitter_id = $1
        ORDER BY submitted_at DESC
        LIMIT $2
        "#
    ))
    .bind(submitter_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(tickets)
}

/// UTC start instants of every SCHEDULED ticket for the teacher. These are
/// the slots the search must treat as taken.
pub async fn list_scheduled_starts(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
) -> Result<Vec<DateTime<Utc>>> {
    let starts = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT scheduled_slot_utc
        FROM tickets
        WHERE teacher_id = $1
          AND status = 'SCHEDULED'
          AND scheduled_slot_utc IS NOT NULL
        ORDER BY scheduled_slot_utc ASC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(starts)
}

pub async fn record_response(
    pool: &Pool<Postgres>,
    id: Uuid,
    response: &str,
    responded_at: DateTime<Utc>,
) -> Result<Option<DbTicket>> {
    let ticket = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        UPDATE tickets
        SET status = 'ANSWERED', response = $2, responded_at = $3
        WHERE id = $1
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(response)
    .bind(responded_at)
    .fetch_optional(pool)
    .await?;

    Ok(ticket)
}

pub async fn update_ticket_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<Option<DbTicket>> {
    let ticket = sqlx::query_as::<_, DbTicket>(&format!(
        r#"
        UPDATE tickets
        SET status = $2
        WHERE id = $1
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(ticket)
}

pub async fn summary_metrics(
    pool: &Pool<Postgres>,
    teacher_id: Option<Uuid>,
    days: i64,
) -> Result<DbTicketMetrics> {
    let cutoff = Utc::now() - Duration::days(days);

    let metrics = sqlx::query_as::<_, DbTicketMetrics>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE status = 'QUEUED') AS queued,
            COUNT(*) FILTER (WHERE status = 'SCHEDULED') AS scheduled,
            COUNT(*) FILTER (WHERE status = 'ANSWERED') AS answered,
            COUNT(*) FILTER (WHERE status = 'CANCELLED') AS cancelled,
            AVG(EXTRACT(EPOCH FROM (responded_at - submitted_at))::float8 / 3600.0)
                FILTER (WHERE responded_at IS NOT NULL) AS avg_response_hours
        FROM tickets
        WHERE ($1::uuid IS NULL OR teacher_id = $1)
          AND submitted_at >= $2
        "#,
    )
    .bind(teacher_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(metrics)
}
