use std::{env, net::SocketAddr};

use axum::http::HeaderValue;

use crate::error::AppError;

const DEFAULT_AUTH_URL: &str =
    "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub auth_url: String,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tripnext.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let auth_url =
            env::var("AUTH_SESSION_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse::<HeaderValue>()
            .map_err(|err| AppError::Config(format!("invalid CORS_ORIGIN: {err}")))?;

        Ok(Self {
            database_url,
            listen_addr,
            auth_url,
            cors_origin,
        })
    }
}
