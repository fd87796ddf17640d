use netsecure_portal::{AppConfig, ConfigError, config::Env};
use serial_test::serial;
use std::{env, panic, path::PathBuf, time::Duration};

const CONFIG_VARS: [&str; 6] = [
    "APP_ENV",
    "NETSECURE_API_URL",
    "VITE_API_URL",
    "VUE_APP_BACKEND_URL",
    "NETSECURE_SESSION_FILE",
    "NETSECURE_HTTP_TIMEOUT_SECS",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with every config variable cleared, then applies `vars`, and
/// restores the original environment afterwards (even on panic).
fn run_with_env<T, R>(vars: &[(&'static str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&'static str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(&[], AppConfig::load).expect("local config should load");

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8081");
    assert_eq!(config.session_file, PathBuf::from(".netsecure/session.json"));
    assert_eq!(config.request_timeout, None);
}

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(&[("APP_ENV", "production")], AppConfig::load);
    assert_eq!(result.unwrap_err(), ConfigError::MissingApiUrl);
}

#[test]
#[serial]
fn test_app_config_production_with_url() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("NETSECURE_API_URL", "https://api.netsecure.example/"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_base_url, "https://api.netsecure.example");
}

#[test]
#[serial]
fn test_app_config_honours_front_end_variables() {
    let config = run_with_env(&[("VITE_API_URL", "http://10.0.0.5:8081")], AppConfig::load).unwrap();
    assert_eq!(config.api_base_url, "http://10.0.0.5:8081");

    let config = run_with_env(
        &[("VUE_APP_BACKEND_URL", "http://legacy.local:9000//")],
        AppConfig::load,
    )
    .unwrap();
    assert_eq!(config.api_base_url, "http://legacy.local:9000");
}

#[test]
#[serial]
fn test_app_config_url_priority() {
    let config = run_with_env(
        &[
            ("NETSECURE_API_URL", "  "),
            ("VITE_API_URL", "http://vite.local"),
            ("VUE_APP_BACKEND_URL", "http://vue.local"),
        ],
        AppConfig::load,
    )
    .unwrap();
    // A blank variable does not shadow the next one in line.
    assert_eq!(config.api_base_url, "http://vite.local");

    let config = run_with_env(
        &[
            ("NETSECURE_API_URL", "http://primary.local/"),
            ("VITE_API_URL", "http://vite.local"),
        ],
        AppConfig::load,
    )
    .unwrap();
    assert_eq!(config.api_base_url, "http://primary.local");
}

#[test]
#[serial]
fn test_app_config_session_file_and_timeout() {
    let config = run_with_env(
        &[
            ("NETSECURE_SESSION_FILE", "/tmp/netsecure/alt.json"),
            ("NETSECURE_HTTP_TIMEOUT_SECS", "15"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.session_file, PathBuf::from("/tmp/netsecure/alt.json"));
    assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
}

#[test]
#[serial]
fn test_app_config_rejects_bad_timeout() {
    let result = run_with_env(&[("NETSECURE_HTTP_TIMEOUT_SECS", "soon")], AppConfig::load);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::InvalidValue {
            var: "NETSECURE_HTTP_TIMEOUT_SECS",
            value: "soon".to_string(),
        }
    );
}

#[test]
fn test_builder_overrides_normalize_url() {
    let config = AppConfig::default()
        .with_api_base_url(" http://127.0.0.1:3000/ ")
        .with_session_file("session.json")
        .with_request_timeout(Duration::from_secs(2));

    assert_eq!(config.api_base_url, "http://127.0.0.1:3000");
    assert_eq!(config.session_file, PathBuf::from("session.json"));
    assert_eq!(config.request_timeout, Some(Duration::from_secs(2)));
}
