//! Tests for registration domain values.

use crate::registration::domain::{
    RegistrationOutcome, RegistrationRecord, RegistrationState, RetryPolicy,
};
use crate::service_registry::domain::TargetId;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn retry_policy_always_allows_one_attempt() {
    let policy = RetryPolicy::new(0, Duration::from_secs(1));
    assert_eq!(policy.max_attempts(), 1);
    assert_eq!(policy.lock_timeout(), RetryPolicy::DEFAULT_LOCK_TIMEOUT);
}

#[rstest]
#[case(RegistrationOutcome::Registered, true)]
#[case(RegistrationOutcome::AlreadyRegistered, true)]
#[case(RegistrationOutcome::Exhausted { attempts: 3 }, false)]
#[case(RegistrationOutcome::LockUnavailable, false)]
fn outcome_reports_registration(#[case] outcome: RegistrationOutcome, #[case] expected: bool) {
    assert_eq!(outcome.is_registered(), expected);
}

#[rstest]
fn state_renders_snake_case() {
    assert_eq!(
        RegistrationState::FailedPendingRetry.to_string(),
        "failed_pending_retry"
    );
}

#[rstest]
fn record_serializes_with_named_fields() {
    let record = RegistrationRecord::new("s3", TargetId::new("abc").expect("valid id"));
    let json = serde_json::to_value(&record).expect("record should serialize");
    assert_eq!(json["service_name"], "s3");
    assert_eq!(json["assigned_id"], "abc");
}
