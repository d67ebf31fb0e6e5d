use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn backoff_doubles_from_twice_the_base() {
    assert_eq!(exponential_backoff(1, 2000), Duration::from_millis(4000));
    assert_eq!(exponential_backoff(2, 2000), Duration::from_millis(8000));
    assert_eq!(exponential_backoff(3, 2000), Duration::from_millis(16000));
}

#[test]
fn backoff_saturates() {
    assert_eq!(
        exponential_backoff(200, 2000),
        Duration::from_millis(u64::MAX)
    );
}

#[test]
fn rate_limits_are_retried_until_budget_is_spent() {
    let mut state = RetryPolicy::default().start();

    let delays = (0..3)
        .map(|_| state.on_error(BackendError::rate_limited()).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(delays, vec![
        Duration::from_secs(4),
        Duration::from_secs(8),
        Duration::from_secs(16),
    ]);
    assert_eq!(state.attempt(), 3);

    let error = state.on_error(BackendError::rate_limited()).unwrap_err();
    assert_eq!(error, Error::RateLimited { retries: 3 });
    assert_eq!(state.attempt(), 3);
}

#[test]
fn other_errors_are_terminal() {
    let mut state = RetryPolicy::default().start();

    let error = state
        .on_error(BackendError::new(Some(500), "Internal error"))
        .unwrap_err();

    assert_matches!(error, Error::Backend { status: Some(500), .. });
    assert_eq!(state.attempt(), 0);
}

#[test]
fn policy_from_config() {
    let config = RetryConfig {
        max_retries: 5,
        base_backoff_ms: 100,
    };

    let mut state = RetryPolicy::from(&config).start();
    assert_eq!(
        state.on_error(BackendError::rate_limited()).unwrap(),
        Duration::from_millis(200)
    );
}

#[test]
fn zero_retries_fails_immediately() {
    let policy = RetryPolicy {
        max_retries: 0,
        ..Default::default()
    };

    let error = policy.start().on_error(BackendError::rate_limited()).unwrap_err();
    assert_eq!(error, Error::RateLimited { retries: 0 });
}
