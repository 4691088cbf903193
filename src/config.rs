use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_GATEWAY_TIMEOUT_SECS, DEFAULT_MAGIC_LINK_TTL_SECS};

/// Application configuration loaded from environment variables
///
/// Built once at startup and handed to each service; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Secret used to sign magic-link tokens
    pub secret_key: String,
    pub magic_link_ttl_secs: u64,
    pub paystack_secret_key: String,
    pub paystack_public_key: String,
    /// Reject unsigned or badly signed webhook events
    pub verify_webhook_signatures: bool,
    pub resend_api_key: String,
    pub from_email: String,
    pub app_url: String,
    pub api_url: String,
    pub frontend_url: String,
    pub gateway_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{name} must be set"))
        };

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path = required("DATABASE_PATH")?;

        let allowed_origins = parse_origins(&required("ALLOWED_ORIGINS")?);
        if allowed_origins.is_empty() {
            return Err("ALLOWED_ORIGINS must list at least one origin".to_string());
        }

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let secret_key = required("SECRET_KEY")?;

        let magic_link_ttl_secs = match lookup("MAGIC_LINK_EXPIRY") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(|secs| u64::try_from(secs).ok())
                .ok_or("Invalid MAGIC_LINK_EXPIRY")?,
            None => DEFAULT_MAGIC_LINK_TTL_SECS,
        };

        let gateway_timeout_secs = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| "Invalid GATEWAY_TIMEOUT_SECS")?,
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
        };

        let verify_webhook_signatures = match lookup("PAYSTACK_VERIFY_WEBHOOKS") {
            Some(v) => parse_bool(&v).ok_or("Invalid PAYSTACK_VERIFY_WEBHOOKS")?,
            None => false,
        };

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            secret_key,
            magic_link_ttl_secs,
            paystack_secret_key: required("PAYSTACK_SECRET_KEY")?,
            paystack_public_key: required("PAYSTACK_PUBLIC_KEY")?,
            verify_webhook_signatures,
            resend_api_key: required("RESEND_API_KEY")?,
            from_email: required("FROM_EMAIL")?,
            app_url: trim_url(required("APP_URL")?),
            api_url: trim_url(required("API_URL")?),
            frontend_url: trim_url(required("FRONTEND_URL")?),
            gateway_timeout_secs,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_PATH", "./data/holidayhours.db"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://holidyhours.com"),
            ("SECRET_KEY", "test-secret"),
            ("PAYSTACK_SECRET_KEY", "sk_test_x"),
            ("PAYSTACK_PUBLIC_KEY", "pk_test_x"),
            ("RESEND_API_KEY", "re_x"),
            ("FROM_EMAIL", "hours@example.com"),
            ("APP_URL", "http://localhost:3000"),
            ("API_URL", "http://localhost:5000"),
            ("FRONTEND_URL", "http://localhost:3000/"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, String> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_loads_with_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.server_port, 5000);
        assert_eq!(config.magic_link_ttl_secs, DEFAULT_MAGIC_LINK_TTL_SECS);
        assert_eq!(config.gateway_timeout_secs, DEFAULT_GATEWAY_TIMEOUT_SECS);
        assert!(!config.verify_webhook_signatures);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://holidyhours.com"]
        );
        assert_eq!(config.frontend_url, "http://localhost:3000");
    }

    #[test]
    fn test_missing_required_value_fails() {
        let mut vars = base_vars();
        vars.remove("SECRET_KEY");

        let err = load(&vars).unwrap_err();
        assert!(err.contains("SECRET_KEY"));
    }

    #[test]
    fn test_blank_required_value_fails() {
        let mut vars = base_vars();
        vars.insert("RESEND_API_KEY", "   ");

        assert!(load(&vars).unwrap_err().contains("RESEND_API_KEY"));
    }

    #[test]
    fn test_invalid_numbers_fail() {
        let mut vars = base_vars();
        vars.insert("MAGIC_LINK_EXPIRY", "a day");
        assert!(load(&vars).is_err());

        let mut vars = base_vars();
        vars.insert("SERVER_PORT", "99999");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_empty_origin_list_fails() {
        let mut vars = base_vars();
        vars.insert("ALLOWED_ORIGINS", " , ");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_magic_link_expiry_bounds() {
        let mut vars = base_vars();
        vars.insert("MAGIC_LINK_EXPIRY", "3600");
        assert_eq!(load(&vars).unwrap().magic_link_ttl_secs, 3600);

        for bad in ["0", "-5", "9223372036854775808", "18446744073709551615"] {
            vars.insert("MAGIC_LINK_EXPIRY", bad);
            assert!(load(&vars).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_webhook_flag() {
        let mut vars = base_vars();
        vars.insert("PAYSTACK_VERIFY_WEBHOOKS", "true");
        assert!(load(&vars).unwrap().verify_webhook_signatures);

        vars.insert("PAYSTACK_VERIFY_WEBHOOKS", "maybe");
        assert!(load(&vars).is_err());
    }
}
