// src/config.rs

use std::env;
use std::net::SocketAddr;
use dotenvy::dotenv;

/// Nominal length of a round when `QUIZ_DURATION_SECS` is not set.
pub const DEFAULT_QUIZ_DURATION_SECS: i64 = 120;

/// Upper bound for `QUIZ_DURATION_SECS` (one day).
pub const MAX_QUIZ_DURATION_SECS: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub questions_dir: String,
    pub static_dir: String,
    pub quiz_duration_secs: i64,
    /// When set, a disqualified team cannot overwrite its `-1` with a later submit.
    pub disqualification_terminal: bool,
    /// When set, teams may still submit after the admin stopped the round.
    pub accept_late_submissions: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("Ignoring invalid BIND_ADDR '{}'", v);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let questions_dir = env::var("QUESTIONS_DIR")
            .unwrap_or_else(|_| "questions".to_string());

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "public".to_string());

        let quiz_duration_secs = env::var("QUIZ_DURATION_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|secs| (1..=MAX_QUIZ_DURATION_SECS).contains(secs))
            .unwrap_or(DEFAULT_QUIZ_DURATION_SECS);

        let disqualification_terminal = env_flag("DISQUALIFICATION_TERMINAL", false);
        let accept_late_submissions = env_flag("ACCEPT_LATE_SUBMISSIONS", true);

        Self {
            database_url,
            rust_log,
            bind_addr,
            questions_dir,
            static_dir,
            quiz_duration_secs,
            disqualification_terminal,
            accept_late_submissions,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            tracing::warn!("Unrecognised value '{}' for {}, using {}", raw, name, default);
            default
        }),
        Err(_) => default,
    }
}

/// Parses the boolean spellings accepted in the environment.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
