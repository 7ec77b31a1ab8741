//! Tests for the destroy/apply polling loop.

#![allow(clippy::expect_used)]

use std::time::Duration;

use refresh_cli::application::services::polling::{read_status, run_operation};
use refresh_cli::domain::{FlowOutcome, Operation, RefreshTimings};
use refresh_common::WorkspaceStatus;

use crate::mocks::{Call, RecordingLogger, RecordingPacer, ScriptedControl, context, secs};

#[tokio::test]
async fn test_destroy_polls_until_inactive() {
    let control = ScriptedControl::new(["PENDING", "PENDING", "INACTIVE"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();

    let outcome = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Destroy)
        .await
        .expect("flow");

    assert_eq!(outcome, FlowOutcome::Succeeded);
    // one settle, one interval per non-terminal read, then the grace pause
    assert_eq!(pacer.pauses(), secs(&[5, 60, 60, 60]));
    assert_eq!(
        logger.count_containing("Waiting for workspace resources to be destroyed"),
        2
    );
    assert_eq!(
        logger.infos()[1],
        "Waiting for workspace resources to be destroyed. Next status check in 1 minute .. \
         Current workspace status: PENDING"
    );
    assert_eq!(
        control.calls(),
        vec![Call::Destroy, Call::Status, Call::Status, Call::Status]
    );
}

#[tokio::test]
async fn test_apply_success_has_no_grace_pause() {
    let control = ScriptedControl::new(["ACTIVE"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();

    let outcome = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Apply)
        .await
        .expect("flow");

    assert_eq!(outcome, FlowOutcome::Succeeded);
    assert_eq!(pacer.pauses(), secs(&[5]));
    assert_eq!(
        logger.infos(),
        vec![
            "Provisioning workspace resources",
            "Resources provisioned successfully."
        ]
    );
}

#[tokio::test]
async fn test_apply_waits_ten_minutes_between_polls() {
    let control = ScriptedControl::new(["INPROGRESS", "INPROGRESS", "ACTIVE"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();

    run_operation(&context(&control, &logger, &pacer, &timings), Operation::Apply)
        .await
        .expect("flow");

    assert_eq!(pacer.pauses(), secs(&[5, 600, 600]));
    assert_eq!(logger.count_containing("Next status check in 10 minutes"), 2);
}

#[tokio::test]
async fn test_cancelled_apply_is_reported_with_activity_id() {
    let control = ScriptedControl::new(["INPROGRESS", "CANCELLED"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();

    let outcome = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Apply)
        .await
        .expect("flow");

    assert_eq!(
        outcome,
        FlowOutcome::Failed {
            status: WorkspaceStatus::Cancelled,
            activity_id: Some("apply-1".to_string()),
        }
    );
    assert_eq!(
        logger.errors(),
        vec!["Apply operation CANCELLED", "Apply activity ID: apply-1"]
    );
    assert_eq!(pacer.pauses(), secs(&[5, 600]));
}

#[tokio::test]
async fn test_configured_intervals_are_used() {
    let control = ScriptedControl::new(["PENDING", "INACTIVE"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings {
        settle: Duration::from_secs(1),
        destroy_interval: Duration::from_secs(15),
        destroy_grace: Duration::ZERO,
        ..RefreshTimings::default()
    };

    run_operation(&context(&control, &logger, &pacer, &timings), Operation::Destroy)
        .await
        .expect("flow");

    assert_eq!(pacer.pauses(), secs(&[1, 15]));
    assert_eq!(logger.count_containing("Next status check in 15 seconds"), 1);
}

#[tokio::test]
async fn test_poll_timeout_stops_waiting() {
    let control = ScriptedControl::new(["INPROGRESS"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings {
        apply_interval: Duration::from_secs(60),
        poll_timeout: Some(Duration::from_secs(120)),
        ..RefreshTimings::default()
    };

    let outcome = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Apply)
        .await
        .expect("flow");

    assert_eq!(
        outcome,
        FlowOutcome::TimedOut {
            status: WorkspaceStatus::from("INPROGRESS"),
            activity_id: Some("apply-1".to_string()),
        }
    );
    assert_eq!(pacer.pauses(), secs(&[5, 60, 60]));
    assert_eq!(control.count(&Call::Status), 3);
    assert_eq!(logger.count_containing("still not finished after 2 minutes"), 1);
}

#[tokio::test]
async fn test_poll_timeout_shorter_than_interval_is_not_overshot() {
    let control = ScriptedControl::new(["INPROGRESS"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings {
        poll_timeout: Some(Duration::from_secs(300)),
        ..RefreshTimings::default()
    };

    let outcome = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Apply)
        .await
        .expect("flow");

    assert!(matches!(outcome, FlowOutcome::TimedOut { .. }));
    // settle, then a single pause cut down from 600s to the 300s limit
    assert_eq!(pacer.pauses(), secs(&[5, 300]));
    assert_eq!(logger.count_containing("Next status check in 5 minutes"), 1);
    assert_eq!(logger.count_containing("still not finished after 5 minutes"), 1);
}

#[tokio::test]
async fn test_status_error_while_polling_propagates() {
    let control = ScriptedControl::failing_status();
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();

    let err = run_operation(&context(&control, &logger, &pacer, &timings), Operation::Destroy)
        .await
        .expect_err("must fail");

    assert_eq!(
        err.to_string(),
        "Error getting workspace status: connection refused"
    );
    assert_eq!(control.calls(), vec![Call::Destroy, Call::Status]);
}

#[tokio::test]
async fn test_read_status_does_not_mutate() {
    let control = ScriptedControl::new(["ACTIVE"]);
    let logger = RecordingLogger::default();
    let pacer = RecordingPacer::default();
    let timings = RefreshTimings::default();
    let ctx = context(&control, &logger, &pacer, &timings);

    let first = read_status(&ctx).await.expect("status");
    let second = read_status(&ctx).await.expect("status");

    assert_eq!(first, second);
    assert_eq!(control.mutations(), 0);
    assert!(pacer.pauses().is_empty());
}
