use axum::extract::{Path, Query, State};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use afterhours_api::config::AfterHoursWindow;
use afterhours_api::handlers::ticket::{
    cancel_ticket, get_ticket, list_my_tickets, list_teacher_tickets, respond_ticket,
    submit_ticket, teacher_metrics, MetricsQuery, MyTicketsQuery, TeacherTicketsQuery,
};
use afterhours_core::errors::ConnectError;
use afterhours_core::models::teacher::parse_hm;
use afterhours_core::models::ticket::{
    RespondTicketRequest, SubmitTicketRequest, TicketStatus,
};
use axum::Json;

use crate::test_utils::{ny_utc, window, TestContext};

fn submit_request(teacher_id: Uuid, submitted_at: Option<&str>) -> SubmitTicketRequest {
    SubmitTicketRequest {
        teacher_id,
        name: "Jordan Alvarez".to_string(),
        email: Some("jordan@example.com".to_string()),
        submitter_id: "S-42".to_string(),
        question: "Could you explain problem #4?".to_string(),
        submitted_at: submitted_at.map(str::to_string),
    }
}

#[tokio::test]
async fn submit_schedules_into_the_first_open_window() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let receipt = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
    )
    .await
    .expect("receipt")
    .0;

    assert_eq!(receipt.status, TicketStatus::Scheduled);
    assert_eq!(receipt.teacher, "Ms. Parker");
    assert_eq!(receipt.scheduled_slot_utc, Some(ny_utc(2024, 1, 8, 9, 0)));

    // A second submission must not land on the booked slot.
    let second = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
    )
    .await
    .expect("receipt")
    .0;
    assert_eq!(second.scheduled_slot_utc, Some(ny_utc(2024, 1, 15, 9, 0)));
}

#[tokio::test]
async fn submit_for_unknown_teacher_is_not_found() {
    let ctx = TestContext::new();
    let result = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(Uuid::new_v4(), None)),
    )
    .await;
    assert!(matches!(result.unwrap_err().0, ConnectError::NotFound(_)));
}

#[tokio::test]
async fn submit_with_blank_question_is_rejected() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let mut request = submit_request(teacher_id, None);
    request.question = "   ".to_string();
    let result = submit_ticket(State(ctx.state.clone()), Json(request)).await;
    assert!(matches!(result.unwrap_err().0, ConnectError::Validation(_)));
}

#[tokio::test]
async fn submission_window_gate_rejects_daytime_questions() {
    let window_config = AfterHoursWindow {
        enabled: true,
        start: parse_hm("17:00").unwrap(),
        end: parse_hm("21:00").unwrap(),
        timezone: chrono_tz::America::Chicago,
    };
    let ctx = TestContext::with_window(window_config);
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    // Noon in Chicago is outside the 17:00-21:00 window.
    let rejected = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T12:00:00-06:00"))),
    )
    .await;
    assert!(matches!(
        rejected.unwrap_err().0,
        ConnectError::Validation(_)
    ));

    // Six in the evening is inside it.
    let accepted = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T18:00:00-06:00"))),
    )
    .await
    .expect("receipt")
    .0;
    assert_eq!(accepted.status, TicketStatus::Scheduled);
}

#[tokio::test]
async fn get_ticket_roundtrips_the_submission() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let receipt = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
    )
    .await
    .expect("receipt")
    .0;

    let ticket = get_ticket(State(ctx.state.clone()), Path(receipt.ticket_id))
        .await
        .expect("ticket")
        .0;

    assert_eq!(ticket.id, receipt.ticket_id);
    assert_eq!(ticket.teacher_id, teacher_id);
    assert_eq!(ticket.submitter_id, "S-42");
    assert_eq!(ticket.question, "Could you explain problem #4?");
    assert_eq!(ticket.status, TicketStatus::Scheduled);
    assert_eq!(ticket.submitted_at, ny_utc(2024, 1, 8, 8, 30));
}

#[tokio::test]
async fn get_missing_ticket_is_not_found() {
    let ctx = TestContext::new();
    let result = get_ticket(State(ctx.state.clone()), Path(Uuid::new_v4())).await;
    assert!(matches!(result.unwrap_err().0, ConnectError::NotFound(_)));
}

#[tokio::test]
async fn respond_marks_the_ticket_answered_exactly_once() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;
    let receipt = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, None)),
    )
    .await
    .expect("receipt")
    .0;

    let answered = respond_ticket(
        State(ctx.state.clone()),
        Path(receipt.ticket_id),
        Json(RespondTicketRequest {
            response: "See you Monday at 9.".to_string(),
        }),
    )
    .await
    .expect("answered")
    .0;
    assert_eq!(answered.status, TicketStatus::Answered);
    assert_eq!(answered.response.as_deref(), Some("See you Monday at 9."));
    assert!(answered.responded_at.is_some());

    // A second response is a workflow violation, not an overwrite.
    let again = respond_ticket(
        State(ctx.state.clone()),
        Path(receipt.ticket_id),
        Json(RespondTicketRequest {
            response: "Actually, Tuesday.".to_string(),
        }),
    )
    .await;
    assert!(matches!(again.unwrap_err().0, ConnectError::Validation(_)));
}

#[tokio::test]
async fn cancelling_frees_the_booked_slot() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;
    let receipt = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
    )
    .await
    .expect("receipt")
    .0;

    let cancelled = cancel_ticket(State(ctx.state.clone()), Path(receipt.ticket_id))
        .await
        .expect("cancelled")
        .0;
    assert_eq!(cancelled.status, TicketStatus::Cancelled);

    // The freed slot is offered to the next submission.
    let next = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
    )
    .await
    .expect("receipt")
    .0;
    assert_eq!(next.scheduled_slot_utc, Some(ny_utc(2024, 1, 8, 9, 0)));
}

#[tokio::test]
async fn teacher_listing_filters_by_status() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    for _ in 0..2 {
        submit_ticket(
            State(ctx.state.clone()),
            Json(submit_request(teacher_id, Some("2024-01-08T08:30:00-05:00"))),
        )
        .await
        .expect("receipt");
    }

    let all = list_teacher_tickets(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(TeacherTicketsQuery {
            status: None,
            limit: None,
        }),
    )
    .await
    .expect("list")
    .0;
    assert_eq!(all.tickets.len(), 2);

    let scheduled = list_teacher_tickets(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(TeacherTicketsQuery {
            status: Some("SCHEDULED".to_string()),
            limit: None,
        }),
    )
    .await
    .expect("list")
    .0;
    assert_eq!(scheduled.tickets.len(), 2);

    let answered = list_teacher_tickets(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(TeacherTicketsQuery {
            status: Some("ANSWERED".to_string()),
            limit: None,
        }),
    )
    .await
    .expect("list")
    .0;
    assert_eq!(answered.tickets.len(), 0);

    let bad_status = list_teacher_tickets(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(TeacherTicketsQuery {
            status: Some("open".to_string()),
            limit: None,
        }),
    )
    .await;
    assert!(matches!(
        bad_status.unwrap_err().0,
        ConnectError::Validation(_)
    ));
}

#[tokio::test]
async fn submitters_see_only_their_own_tickets() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, None)),
    )
    .await
    .expect("receipt");
    let mut other = submit_request(teacher_id, None);
    other.submitter_id = "P-7".to_string();
    submit_ticket(State(ctx.state.clone()), Json(other))
        .await
        .expect("receipt");

    let mine = list_my_tickets(
        State(ctx.state.clone()),
        Query(MyTicketsQuery {
            submitter_id: "P-7".to_string(),
            limit: None,
        }),
    )
    .await
    .expect("list")
    .0;
    assert_eq!(mine.tickets.len(), 1);
    assert_eq!(mine.tickets[0].submitter_id, "P-7");
}

#[tokio::test]
async fn metrics_reflect_the_ticket_lifecycle() {
    let ctx = TestContext::new();
    let teacher_id = ctx
        .seed_teacher("Ms. Parker", vec![window(0, "09:00", "17:00")])
        .await;

    let first = submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, None)),
    )
    .await
    .expect("receipt")
    .0;
    submit_ticket(
        State(ctx.state.clone()),
        Json(submit_request(teacher_id, None)),
    )
    .await
    .expect("receipt");
    respond_ticket(
        State(ctx.state.clone()),
        Path(first.ticket_id),
        Json(RespondTicketRequest {
            response: "Answered.".to_string(),
        }),
    )
    .await
    .expect("answered");

    let metrics = teacher_metrics(
        State(ctx.state.clone()),
        Path(teacher_id),
        Query(MetricsQuery { days: None }),
    )
    .await
    .expect("metrics")
    .0;

    assert_eq!(metrics.total, 2);
    assert_eq!(metrics.answered, 1);
    assert_eq!(metrics.scheduled, 1);
    assert!(metrics.avg_response_hours.is_some());

    let unknown = teacher_metrics(
        State(ctx.state.clone()),
        Path(Uuid::new_v4()),
        Query(MetricsQuery { days: None }),
    )
    .await;
    assert!(matches!(unknown.unwrap_err().0, ConnectError::NotFound(_)));
}
