use std::env;

use crate::member::PagingStrategy;

/// Runtime configuration, resolved once at startup and passed explicitly
/// into construction. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// When set, the member store is PostgreSQL; otherwise the in-memory
    /// store is used.
    pub database_url: Option<String>,
    pub paging: PagingStrategy,
    pub default_page_size: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            env::var("ROSTERD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let database_url = env::var("DATABASE_URL").ok();

        let paging = match env::var("ROSTERD_PAGING_STRATEGY").as_deref() {
            Ok("server_side") => PagingStrategy::ServerSide,
            _ => PagingStrategy::FullFetch,
        };

        let default_page_size = env::var("ROSTERD_DEFAULT_PAGE_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|&size| size > 0)
            .unwrap_or(10);

        Self {
            bind_addr,
            database_url,
            paging,
            default_page_size,
        }
    }
}
