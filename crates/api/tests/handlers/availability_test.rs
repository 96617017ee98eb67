use std::sync::Arc;

use axum::extract::{Path, Query, State};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use afterhours_api::config::AfterHoursWindow;
use afterhours_api::handlers::availability::{next_slot, NextSlotQuery};
use afterhours_api::ApiState;
use afterhours_core::errors::ConnectError;
use afterhours_db::mock::repositories::{MockTeacherDirectoryRepo, MockTicketStoreRepo};

use crate::test_utils::{ny, ny_utc, window, TestContext};

#[rstest]
#[case("2024-01-08T08:30:00-05:00")]
#[case("2024-01-08T13:30:00Z")]
// Offset-less instants are treated as already UTC.
#[case("2024-01-08T13:30:00")]
#[tokio::test]
async fn next_slot_accepts_iso_instants(#[case] from: &str) {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let query = NextSlotQuery {
        from: Some(from.to_string()),
        search_days: None,
    };
    let response = next_slot(State(ctx.state.clone()), Path(teacher_id), Query(query))
        .await
        .expect("response")
        .0;

    assert_eq!(response.slot_utc, Some(ny_utc(2024, 1, 8, 9, 0)));
    assert_eq!(
        response.slot_local.as_deref(),
        Some(ny(2024, 1, 8, 9, 0).to_rfc3339().as_str())
    );
}

#[tokio::test]
async fn next_slot_rejects_malformed_instants() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let query = NextSlotQuery {
        from: Some("next Tuesday".to_string()),
        search_days: None,
    };
    let result = next_slot(State(ctx.state.clone()), Path(teacher_id), Query(query)).await;

    assert!(matches!(
        result.unwrap_err().0,
        ConnectError::Validation(_)
    ));
}

#[tokio::test]
async fn next_slot_for_unknown_teacher_is_not_found() {
    let ctx = TestContext::new();
    let query = NextSlotQuery {
        from: None,
        search_days: None,
    };
    let result = next_slot(State(ctx.state.clone()), Path(Uuid::new_v4()), Query(query)).await;

    assert!(matches!(result.unwrap_err().0, ConnectError::NotFound(_)));
}

#[tokio::test]
async fn next_slot_without_windows_is_a_null_slot_not_an_error() {
    let ctx = TestContext::new();
    let teacher_id = ctx.seed_teacher("Mr. Patel", vec![]).await;

    let query = NextSlotQuery {
        from: None,
        search_days: None,
    };
    let response = next_slot(State(ctx.state.clone()), Path(teacher_id), Query(query))
        .await
        .expect("response")
        .0;

    assert_eq!(response.slot_utc, None);
    assert_eq!(response.slot_local, None);
}

#[tokio::test]
async fn next_slot_honors_the_horizon_override() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;
    // Tuesday: the next Monday window is six days away.
    let from = Some("2024-01-09T09:00:00-05:00".to_string());

    let short = next_slot(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(NextSlotQuery {
            from: from.clone(),
            search_days: Some(3),
        }),
    )
    .await
    .expect("response")
    .0;
    assert_eq!(short.slot_utc, None);

    let long = next_slot(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(NextSlotQuery {
            from,
            search_days: Some(6),
        }),
    )
    .await
    .expect("response")
    .0;
    assert_eq!(long.slot_utc, Some(ny_utc(2024, 1, 15, 9, 0)));
}

#[tokio::test]
async fn next_slot_surfaces_store_failures_as_database_errors() {
    let mut directory = MockTeacherDirectoryRepo::new();
    directory
        .expect_get()
        .returning(|_| Err(ConnectError::Database(eyre::eyre!("connection refused"))));
    let tickets = MockTicketStoreRepo::new();

    let state = Arc::new(ApiState::new(
        Arc::new(directory),
        Arc::new(tickets),
        14,
        AfterHoursWindow::disabled(),
    ));

    let query = NextSlotQuery {
        from: None,
        search_days: None,
    };
    let result = next_slot(State(state), Path(Uuid::new_v4()), Query(query)).await;

    assert!(matches!(result.unwrap_err().0, ConnectError::Database(_)));
}
