use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from_address: String,
}

impl EmailConfig {
    pub fn init() -> Result<Self> {
        let smtp_user =
            std::env::var("SMTP_USERNAME").context("Missing environment variable: SMTP_USERNAME")?;
        let smtp_pass =
            std::env::var("SMTP_PASSWORD").context("Missing environment variable: SMTP_PASSWORD")?;
        let smtp_server =
            std::env::var("SMTP_HOST").context("Missing environment variable: SMTP_HOST")?;
        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .context("SMTP_PORT must be a valid u16 integer")?;
        let from_address = std::env::var("SMTP_FROM").unwrap_or_else(|_| smtp_user.clone());

        Ok(Self {
            smtp_server,
            smtp_port,
            smtp_user,
            smtp_pass,
            from_address,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
}

impl RazorpayConfig {
    pub fn init() -> Result<Self> {
        let key_id = std::env::var("RAZORPAY_KEY_ID")
            .context("Missing environment variable: RAZORPAY_KEY_ID")?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET")
            .context("Missing environment variable: RAZORPAY_KEY_SECRET")?;
        let base_url = std::env::var("RAZORPAY_BASE_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());

        Ok(Self {
            key_id,
            key_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub redis_url: String,
    pub app_base_url: String,
    pub otel_endpoint: String,
    pub email_config: EmailConfig,
    pub razorpay: RazorpayConfig,
    pub admin_seed: Option<AdminSeed>,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string());

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let email_config = EmailConfig::init().context("failed email config")?;
        let razorpay = RazorpayConfig::init().context("failed razorpay config")?;

        let admin_seed = match (
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            redis_url,
            app_base_url,
            otel_endpoint,
            email_config,
            razorpay,
            admin_seed,
        })
    }
}
