use axum::extract::{Path, State};
use axum::Json;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use afterhours_api::handlers::teacher::{
    create_teacher, get_teacher, list_teachers, replace_availability,
};
use afterhours_core::errors::ConnectError;
use afterhours_core::models::teacher::{
    CreateTeacherRequest, ReplaceAvailabilityRequest, WindowSpec,
};

use crate::test_utils::{window, TestContext};

fn create_request(timezone: &str, windows: Vec<WindowSpec>) -> CreateTeacherRequest {
    CreateTeacherRequest {
        name: "Dr. Smith".to_string(),
        email: Some("smith@school.edu".to_string()),
        timezone: timezone.to_string(),
        windows,
    }
}

fn spec(weekday: u8, start: &str, end: &str) -> WindowSpec {
    WindowSpec {
        weekday,
        start: start.to_string(),
        end: end.to_string(),
    }
}

#[tokio::test]
async fn create_and_get_roundtrips_windows() {
    let ctx = TestContext::new();

    let created = create_teacher(
        State(ctx.state.clone()),
        Json(create_request(
            "America/New_York",
            vec![spec(0, "09:00", "12:00"), spec(3, "13:00", "16:00")],
        )),
    )
    .await
    .expect("created")
    .0;
    assert_eq!(created.name, "Dr. Smith");
    assert_eq!(created.timezone, "America/New_York");

    let fetched = get_teacher(State(ctx.state.clone()), Path(created.id))
        .await
        .expect("fetched")
        .0;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email.as_deref(), Some("smith@school.edu"));
    assert_eq!(
        fetched.windows,
        vec![spec(0, "09:00", "12:00"), spec(3, "13:00", "16:00")]
    );
}

#[tokio::test]
async fn create_rejects_unknown_timezones() {
    let ctx = TestContext::new();
    let result = create_teacher(
        State(ctx.state.clone()),
        Json(create_request("Eastern Standard Time", vec![])),
    )
    .await;
    assert!(matches!(result.unwrap_err().0, ConnectError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_inverted_windows() {
    let ctx = TestContext::new();
    let result = create_teacher(
        State(ctx.state.clone()),
        Json(create_request(
            "America/New_York",
            vec![spec(0, "17:00", "09:00")],
        )),
    )
    .await;
    assert!(matches!(result.unwrap_err().0, ConnectError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_blank_names() {
    let ctx = TestContext::new();
    let mut request = create_request("America/New_York", vec![]);
    request.name = "  ".to_string();
    let result = create_teacher(State(ctx.state.clone()), Json(request)).await;
    assert!(matches!(result.unwrap_err().0, ConnectError::Validation(_)));
}

#[tokio::test]
async fn get_unknown_teacher_is_not_found() {
    let ctx = TestContext::new();
    let result = get_teacher(State(ctx.state.clone()), Path(Uuid::new_v4())).await;
    assert!(matches!(result.unwrap_err().0, ConnectError::NotFound(_)));
}

#[tokio::test]
async fn list_returns_seeded_teachers() {
    let ctx = TestContext::new();
    ctx.seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;
    ctx.seed_teacher("Mr. Lee", vec![]).await;

    let listed = list_teachers(State(ctx.state.clone()))
        .await
        .expect("listed")
        .0;
    assert_eq!(listed.teachers.len(), 2);
    assert_eq!(listed.teachers[0].name, "Mr. Lee");
    assert_eq!(listed.teachers[1].name, "Ms. Parker");
}

#[tokio::test]
async fn replace_availability_swaps_the_weekly_schedule() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let replaced = replace_availability(
        State(ctx.state.clone()),
        Path(teacher_id),
        Json(ReplaceAvailabilityRequest {
            windows: vec![spec(5, "10:00", "12:00")],
        }),
    )
    .await
    .expect("replaced")
    .0;
    assert_eq!(replaced.windows, vec![spec(5, "10:00", "12:00")]);

    let fetched = get_teacher(State(ctx.state.clone()), Path(teacher_id))
        .await
        .expect("fetched")
        .0;
    assert_eq!(fetched.windows, vec![spec(5, "10:00", "12:00")]);
}

#[tokio::test]
async fn replace_availability_for_unknown_teacher_is_not_found() {
    let ctx = TestContext::new();
    let result = replace_availability(
        State(ctx.state.clone()),
        Path(Uuid::new_v4()),
        Json(ReplaceAvailabilityRequest { windows: vec![] }),
    )
    .await;
    assert!(matches!(result.unwrap_err().0, ConnectError::NotFound(_)));
}
