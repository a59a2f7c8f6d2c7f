use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth_secret: String,
    pub token_ttl_hours: i64,
    pub release_check_interval_seconds: u64,
    pub upload_delay_ms: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            auth_secret: env::var("AUTH_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("Invalid TOKEN_TTL_HOURS"),
            release_check_interval_seconds: env::var("RELEASE_CHECK_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid RELEASE_CHECK_INTERVAL_SECONDS"),
            upload_delay_ms: env::var("UPLOAD_DELAY_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .expect("Invalid UPLOAD_DELAY_MS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
