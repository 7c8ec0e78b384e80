use std::env;

/// Development fallback for `API_TOKEN`. Production deployments are expected to override it.
pub const DEV_API_TOKEN: &str = "token-secreto-para-demonstracao";

/// AppConfig
///
/// Holds the application's configuration. Loaded once at startup and never mutated,
/// then shared with handlers and the token gate through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // MongoDB connection string.
    pub mongo_url: String,
    // Database that holds the `products` collection.
    pub database_name: String,
    // Shared secret required on every mutating request.
    pub api_token: String,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Runtime environment marker. Selects the log format.
    pub env: Env,
}

/// Env
///
/// Runtime context. `Local` logs human-readable output, `Production` logs JSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Development defaults, used directly by tests.
    fn default() -> Self {
        Self {
            mongo_url: "mongodb://localhost:27017".to_string(),
            database_name: "lightsail_db".to_string(),
            api_token: DEV_API_TOKEN.to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment. A missing variable falls back to its
    /// development default, so the service always starts; in production the use of the
    /// development token is logged as a warning once tracing is up (see `uses_dev_token`).
    pub fn load() -> Self {
        let defaults = Self::default();

        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        Self {
            mongo_url: env::var("MONGO_URL").unwrap_or(defaults.mongo_url),
            database_name: env::var("DATABASE_NAME").unwrap_or(defaults.database_name),
            api_token: env::var("API_TOKEN").unwrap_or(defaults.api_token),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            env,
        }
    }

    /// True when the shared secret is still the hardcoded development value.
    pub fn uses_dev_token(&self) -> bool {
        self.api_token == DEV_API_TOKEN
    }
}
