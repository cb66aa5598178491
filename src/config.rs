use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub session_duration_hours: i64,
    pub cors_origin: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window_minutes: u64,
    pub login_rate_limit_max: u32,
    pub login_rate_limit_window_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://clinicdesk.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        // Empty hash disables admin login but the public surface still works
        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH").unwrap_or_default();

        let session_duration_hours = env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty());
        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty());

        let rate_limit_max = env::var("RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);

        let rate_limit_window_minutes = env::var("RATE_LIMIT_WINDOW_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);

        let login_rate_limit_max = env::var("LOGIN_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let login_rate_limit_window_minutes = env::var("LOGIN_RATE_LIMIT_WINDOW_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            admin_username,
            admin_password_hash,
            session_duration_hours,
            cors_origin,
            telegram_bot_token,
            telegram_chat_id,
            rate_limit_max,
            rate_limit_window_minutes,
            login_rate_limit_max,
            login_rate_limit_window_minutes,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
}
