use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::store::DEFAULT_TABLE;

/// Course feedback form server.
#[derive(Debug, Clone, Parser)]
#[command(name = "course-feedback", version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3002)]
    pub port: u16,

    /// Directory served for static assets (feedback.js)
    #[arg(long = "public", env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// PostgREST / Supabase project URL; selects the REST backend when set
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// API key sent as `apikey` and bearer token to the REST backend
    #[arg(long, env = "SUPABASE_KEY", default_value = "", hide_env_values = true)]
    pub supabase_key: String,

    /// Remote libsql (Turso) database URL
    #[arg(long, env = "TURSO_URL")]
    pub turso_url: Option<String>,

    #[arg(long, env = "TURSO_TOKEN", default_value = "", hide_env_values = true)]
    pub turso_token: String,

    /// Local libsql database file, used when no remote backend is configured
    #[arg(long, env = "DB_PATH", default_value = "course-feedback.db")]
    pub db_path: String,

    /// Table holding feedback rows
    #[arg(long, env = "FEEDBACK_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Timeout for calls to the REST backend, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

/// Which store the server should talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendChoice<'a> {
    Rest { url: &'a str, key: &'a str },
    Turso { url: &'a str, token: &'a str },
    Local { path: &'a str },
}

impl Config {
    /// REST wins over Turso, Turso over the local file.
    pub fn backend(&self) -> BackendChoice<'_> {
        if let Some(url) = self.supabase_url.as_deref().filter(|u| !u.is_empty()) {
            BackendChoice::Rest { url, key: &self.supabase_key }
        } else if let Some(url) = self.turso_url.as_deref().filter(|u| !u.is_empty()) {
            BackendChoice::Turso { url, token: &self.turso_token }
        } else {
            BackendChoice::Local { path: &self.db_path }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
