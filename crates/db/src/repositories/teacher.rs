use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use afterhours_core::models::teacher::WeeklyWindow;

use crate::models::{DbAvailabilityWindow, DbTeacher};

pub async fn create_teacher(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    email: Option<&str>,
    timezone: &str,
) -> Result<DbTeacher> {
    let now = Utc::now();

    tracing::debug!(
        "Creating teacher: id={}, name={}, timezone={}",
        id,
        name,
        timezone
    );

    let teacher = sqlx::query_as::<_, DbTeacher>(
        r#"
        INSERT INTO teachers (id, name, email, timezone, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, timezone, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(timezone)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(teacher)
}

pub async fn get_teacher_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTeacher>> {
    tracing::debug!("Getting teacher by id: {}", id);

    let teacher = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, email, timezone, created_at
        FROM teachers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(teacher)
}

pub async fn list_teachers(pool: &Pool<Postgres>) -> Result<Vec<DbTeacher>> {
    let teachers = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, email, timezone, created_at
        FROM teachers
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(teachers)
}

pub async fn get_windows_by_teacher_id(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
) -> Result<Vec<DbAvailabilityWindow>> {
    let windows = sqlx::query_as::<_, DbAvailabilityWindow>(
        r#"
        SELECT id, teacher_id, weekday, start_hm, end_hm
        FROM availability_windows
        WHERE teacher_id = $1
        ORDER BY weekday ASC, start_hm ASC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(windows)
}

pub async fn create_window(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
    window: &WeeklyWindow,
) -> Result<DbAvailabilityWindow> {
    let id = Uuid::new_v4();

    let window = sqlx::query_as::<_, DbAvailabilityWindow>(
        r#"
        INSERT INTO availability_windows (id, teacher_id, weekday, start_hm, end_hm)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, teacher_id, weekday, start_hm, end_hm
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .bind(i16::from(window.weekday))
    .bind(window.start.format("%H:%M").to_string())
    .bind(window.end.format("%H:%M").to_string())
    .fetch_one(pool)
    .await?;

    Ok(window)
}

pub async fn delete_windows_by_teacher_id(pool: &Pool<Postgres>, teacher_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM availability_windows
        WHERE teacher_id = $1
        "#,
    )
    .bind(teacher_id)
    .execute(pool)
    .await?;

    Ok(())
}
