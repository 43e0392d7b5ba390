use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
}

/// Development-only user created at startup when the SEED_* variables are set.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub seed_user: Option<SeedUser>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "learnlog".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let seed_user = match (
            std::env::var("SEED_USERNAME").ok(),
            std::env::var("SEED_EMAIL").ok(),
            std::env::var("SEED_PASSWORD").ok(),
        ) {
            (Some(username), Some(email), Some(password)) => Some(SeedUser {
                username,
                email,
                password,
            }),
            _ => None,
        };
        Ok(Self {
            database_url,
            session,
            seed_user,
        })
    }
}
