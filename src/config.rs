use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,

    // PostgreSQL
    pub database_url: String,
    pub db_max_connections: u32,

    // Catalog
    pub max_page_size: i64,
    pub default_page_size: i64,

    // Response cache
    pub catalog_cache_ttl_secs: u64,
    pub epg_now_cache_ttl_secs: u64,
    pub cache_sweep_interval_secs: u64,

    // EPG
    pub epg_default_hours: i64,
    pub epg_retention_days: i64,

    // Stream proxy
    pub stream_proxy_timeout_ms: u64,

    // Maintenance
    pub max_history_per_user: i64,

    // Misc
    pub admin_key: String,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),

            // PostgreSQL
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/telestream".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),

            // Catalog
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(50),

            // Response cache
            catalog_cache_ttl_secs: env::var("CATALOG_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300), // 5 minutes
            epg_now_cache_ttl_secs: env::var("EPG_NOW_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            cache_sweep_interval_secs: env::var("CACHE_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),

            // EPG
            epg_default_hours: env::var("EPG_DEFAULT_HOURS")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .unwrap_or(6),
            epg_retention_days: env::var("EPG_RETENTION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),

            // Stream proxy
            stream_proxy_timeout_ms: env::var("STREAM_PROXY_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000), // 30 seconds

            // Maintenance
            max_history_per_user: env::var("MAX_HISTORY_PER_USER")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),

            // Misc - Use VLC user agent to avoid IPTV origin blocks
            admin_key: env::var("ADMIN_KEY").unwrap_or_else(|_| "admin123".to_string()),
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
