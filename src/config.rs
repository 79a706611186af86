use dotenvy::dotenv;
use std::env;

use crate::error::ProxyError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "https://cloud.appwrite.io/v1/domains/suggestions";

/// Process-wide settings, loaded once at startup and handed to the router.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub upstream_url: String,
    pub project_id: Option<String>,
    pub fallback_cookies: Option<String>,
}

/// Credentials attached to every outbound upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub project_id: &'a str,
    pub fallback_cookie: &'a str,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load .env file if present
        Config {
            bind_addr: get_env_or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            upstream_url: get_env_or_default("DOMAINS_UPSTREAM_URL", DEFAULT_UPSTREAM_URL),
            project_id: get_env("APPWRITE_PROJECT_ID"),
            fallback_cookies: get_env("APPWRITE_FALLBACK_COOKIES"),
        }
    }

    /// Missing credentials are not fatal at startup; every request fails
    /// until both are configured.
    pub fn credentials(&self) -> Result<Credentials<'_>, ProxyError> {
        match (self.project_id.as_deref(), self.fallback_cookies.as_deref()) {
            (Some(project_id), Some(fallback_cookie)) => Ok(Credentials {
                project_id,
                fallback_cookie,
            }),
            (project_id, cookies) => {
                log::error!(
                    "Missing environment variables: has_project_id={}, has_cookies={}",
                    project_id.is_some(),
                    cookies.is_some()
                );
                Err(ProxyError::Configuration(
                    "Server configuration error: Missing API credentials".to_string(),
                ))
            }
        }
    }
}

fn get_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env(key).unwrap_or_else(|| default.to_string())
}
