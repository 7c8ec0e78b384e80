use product_api::{
    AppConfig,
    config::{DEV_API_TOKEN, Env},
};
use serial_test::serial;
use std::{env, panic};

const CONFIG_VARS: [&str; 5] = ["APP_ENV", "MONGO_URL", "DATABASE_NAME", "API_TOKEN", "BIND_ADDR"];

// --- Setup/Teardown Utilities ---

/// Runs `test` with the config variables set as given (None = unset), then restores
/// whatever was in the environment before.
fn run_with_env<T, R>(vars: &[(&str, Option<&str>)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(String, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            if let Some(value) = value {
                env::set_var(key, value);
            }
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(&key, val),
                None => env::remove_var(&key),
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
fn test_app_config_defaults_when_unset() {
    let config = run_with_env(&[], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.mongo_url, "mongodb://localhost:27017");
    assert_eq!(config.database_name, "lightsail_db");
    assert_eq!(config.api_token, DEV_API_TOKEN);
    assert_eq!(config.bind_addr, "0.0.0.0:8000");
    assert!(config.uses_dev_token());
}

#[test]
#[serial]
fn test_app_config_reads_environment() {
    let config = run_with_env(
        &[
            ("APP_ENV", Some("production")),
            ("MONGO_URL", Some("mongodb://db.internal:27017")),
            ("DATABASE_NAME", Some("catalog")),
            ("API_TOKEN", Some("prod-secret")),
            ("BIND_ADDR", Some("127.0.0.1:9000")),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.mongo_url, "mongodb://db.internal:27017");
    assert_eq!(config.database_name, "catalog");
    assert_eq!(config.api_token, "prod-secret");
    assert_eq!(config.bind_addr, "127.0.0.1:9000");
    assert!(!config.uses_dev_token());
}

#[test]
#[serial]
fn test_production_without_token_still_starts_with_dev_default() {
    let config = run_with_env(&[("APP_ENV", Some("production"))], AppConfig::load);

    assert_eq!(config.env, Env::Production);
    assert!(config.uses_dev_token());
}

#[test]
#[serial]
fn test_unknown_app_env_falls_back_to_local() {
    let config = run_with_env(&[("APP_ENV", Some("staging"))], AppConfig::load);

    assert_eq!(config.env, Env::Local);
}
