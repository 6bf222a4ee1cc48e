//! Configuration loading from files and environment variables.

mod support;

use std::io::Write;

use antiban::config::{
    ENV_GLOBAL_INTERVAL, ENV_RECIPIENT_BROADCAST_INTERVAL, ENV_RECIPIENT_INTERVAL,
};
use antiban::{SchedulerConfig, SchedulerError};
use chrono::TimeDelta;
use tempfile::NamedTempFile;

fn clear_env() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        (ENV_GLOBAL_INTERVAL, None),
        (ENV_RECIPIENT_INTERVAL, None),
        (ENV_RECIPIENT_BROADCAST_INTERVAL, None),
    ]
}

#[test]
fn test_from_file_reads_intervals() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[intervals]\nglobal_secs = 3\nrecipient_secs = 30\nrecipient_broadcast_secs = 600"
    )
    .unwrap();

    let config = SchedulerConfig::from_file(file.path()).unwrap();
    assert_eq!(config, SchedulerConfig::from_secs(3, 30, 600));
}

#[test]
fn test_from_file_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchedulerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SchedulerError::Configuration(_)));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_from_file_rejects_negative_like_values() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[intervals]\nrecipient_secs = -5").unwrap();

    assert!(SchedulerConfig::from_file(file.path()).is_err());
}

#[test]
fn test_env_overrides_unset_keeps_values() {
    support::with_scoped_env(&clear_env(), || {
        let base = SchedulerConfig::from_secs(1, 2, 3);
        assert_eq!(base.with_env_overrides().unwrap(), base);
    });
}

#[test]
fn test_env_overrides_unset_keep_sub_second_config() {
    support::with_scoped_env(&clear_env(), || {
        let base = SchedulerConfig {
            global_interval: TimeDelta::milliseconds(500),
            recipient_interval: TimeDelta::milliseconds(1500),
            recipient_broadcast_interval: TimeDelta::hours(1),
        };
        assert_eq!(base.with_env_overrides().unwrap(), base);
    });
}

#[test]
fn test_env_override_leaves_other_sub_second_intervals() {
    let mut env = clear_env();
    env[1] = (ENV_RECIPIENT_INTERVAL, Some("90"));

    support::with_scoped_env(&env, || {
        let base = SchedulerConfig {
            global_interval: TimeDelta::milliseconds(500),
            ..SchedulerConfig::default()
        };
        let config = base.with_env_overrides().unwrap();
        assert_eq!(config.global_interval, TimeDelta::milliseconds(500));
        assert_eq!(config.recipient_interval, TimeDelta::seconds(90));
    });
}

#[test]
fn test_env_overrides_replace_individual_intervals() {
    let mut env = clear_env();
    env[0] = (ENV_GLOBAL_INTERVAL, Some("4"));
    env[2] = (ENV_RECIPIENT_BROADCAST_INTERVAL, Some(" 7200 "));

    support::with_scoped_env(&env, || {
        let config = SchedulerConfig::default().with_env_overrides().unwrap();
        assert_eq!(config.global_interval, TimeDelta::seconds(4));
        assert_eq!(config.recipient_interval, TimeDelta::minutes(1));
        assert_eq!(config.recipient_broadcast_interval, TimeDelta::hours(2));
    });
}

#[test]
fn test_env_overrides_reject_garbage() {
    let mut env = clear_env();
    env[1] = (ENV_RECIPIENT_INTERVAL, Some("one minute"));

    support::with_scoped_env(&env, || {
        let err = SchedulerConfig::default().with_env_overrides().unwrap_err();
        assert!(err.to_string().contains(ENV_RECIPIENT_INTERVAL));
    });
}

#[test]
fn test_env_overrides_reject_zero() {
    let mut env = clear_env();
    env[0] = (ENV_GLOBAL_INTERVAL, Some("0"));

    support::with_scoped_env(&env, || {
        assert!(SchedulerConfig::default().with_env_overrides().is_err());
    });
}
