use crate::{ConfigError, FromEnv, env_or_default};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4200";

/// Single browser origin permitted to call the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let allowed_origin = env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let allowed_origin = allowed_origin.trim().trim_end_matches('/').to_string();

        if !(allowed_origin.starts_with("http://") || allowed_origin.starts_with("https://")) {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: format!("'{}' is not an http(s) origin", allowed_origin),
            });
        }

        Ok(Self { allowed_origin })
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}
