//! Build-time client configuration.

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 20, 50];
pub const TOAST_DURATION_MS: u32 = 2500;

pub const TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "authUser";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined in front of every REST path, e.g. `/api` or `https://host/api`.
    pub api_base: String,
    pub toast_duration_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            toast_duration_ms: TOAST_DURATION_MS,
        }
    }
}

impl ClientConfig {
    /// Reads `TASKDESK_API_BASE` captured at compile time, falling back to `/api`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_base = option_env!("TASKDESK_API_BASE").unwrap_or(DEFAULT_API_BASE);
        Self::default().with_api_base(api_base)
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Joins the API base and a path that starts with `/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::default().with_api_base("http://localhost:4000/api/");
        assert_eq!(config.url("/tasks"), "http://localhost:4000/api/tasks");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url("/auth/login"), "/api/auth/login");
        assert_eq!(config.toast_duration_ms, 2500);
    }
}
