use std::env;

const DEV_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub api_version: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub default_account_id: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let environment = env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);
        let api_version = env::var("API_VERSION").unwrap_or_else(|_| "v1".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);
        let default_account_id = match env::var("DEFAULT_ACCOUNT_ID") {
            Ok(raw) => {
                let id = raw.trim().parse::<i64>()?;
                anyhow::ensure!(id > 0, "DEFAULT_ACCOUNT_ID must be a positive integer");
                id
            }
            Err(_) => 1,
        };
        let cors_origins = cors_origins_for(environment, env::var("CORS_ORIGINS").ok());

        Ok(Self {
            port,
            database_url,
            host,
            environment,
            api_version,
            db_max_connections,
            cors_origins,
            default_account_id,
        })
    }
}

// Production only trusts the configured list; development allows the local frontends.
fn cors_origins_for(environment: Environment, configured: Option<String>) -> Vec<String> {
    match environment {
        Environment::Production => configured
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        Environment::Development => DEV_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
    }
}
