use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub qr: QrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Cache connection. Reserved for queue-position caching; nothing in the
/// request path reads it yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// HMAC algorithm name: HS256, HS384 or HS512.
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthConfig {
    #[serde(default)]
    pub google_client_id: Option<String>,
    #[serde(default)]
    pub google_client_secret: Option<String>,
    #[serde(default)]
    pub facebook_app_id: Option<String>,
    #[serde(default)]
    pub facebook_app_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub upload_path: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            upload_path: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    pub base_url: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            base_url: "https://yourapp.com/point".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("failed to parse {config_path}: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build entirely from environment variables.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    redis: RedisConfig {
                        url: get_env("REDIS_URL")
                            .unwrap_or_else(|| RedisConfig::default().url),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        algorithm: get_env("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
                        // 8 days, matching the issued token lifetime.
                        access_token_expire_minutes: get_env_parse(
                            "ACCESS_TOKEN_EXPIRE_MINUTES",
                            60 * 24 * 8i64,
                        ),
                    },
                    cors: CorsConfig {
                        allowed_origins: get_env("ALLOWED_ORIGINS")
                            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                            .unwrap_or_else(|| CorsConfig::default().allowed_origins),
                    },
                    oauth: OAuthConfig {
                        google_client_id: get_env("GOOGLE_CLIENT_ID"),
                        google_client_secret: get_env("GOOGLE_CLIENT_SECRET"),
                        facebook_app_id: get_env("FACEBOOK_APP_ID"),
                        facebook_app_secret: get_env("FACEBOOK_APP_SECRET"),
                    },
                    uploads: UploadConfig {
                        max_file_size: get_env_parse("MAX_FILE_SIZE", 10 * 1024 * 1024usize),
                        upload_path: get_env("UPLOAD_PATH").unwrap_or_else(|| "uploads".to_string()),
                    },
                    pagination: PaginationConfig {
                        default_page_size: get_env_parse("DEFAULT_PAGE_SIZE", 20u64),
                        max_page_size: get_env_parse("MAX_PAGE_SIZE", 100u64),
                    },
                    qr: QrConfig {
                        base_url: get_env("QR_CODE_BASE_URL")
                            .unwrap_or_else(|| QrConfig::default().base_url),
                    },
                }
            }
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment variables win even when a config file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("REDIS_URL") {
            config.redis.url = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHM") {
            config.jwt.algorithm = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expire_minutes = n;
        }
        if let Ok(v) = env::var("ALLOWED_ORIGINS") {
            config.cors.allowed_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            config.oauth.google_client_id = Some(v);
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            config.oauth.google_client_secret = Some(v);
        }
        if let Ok(v) = env::var("FACEBOOK_APP_ID") {
            config.oauth.facebook_app_id = Some(v);
        }
        if let Ok(v) = env::var("FACEBOOK_APP_SECRET") {
            config.oauth.facebook_app_secret = Some(v);
        }
        if let Ok(v) = env::var("MAX_FILE_SIZE")
            && let Ok(n) = v.parse()
        {
            config.uploads.max_file_size = n;
        }
        if let Ok(v) = env::var("UPLOAD_PATH") {
            config.uploads.upload_path = v;
        }
        if let Ok(v) = env::var("DEFAULT_PAGE_SIZE")
            && let Ok(n) = v.parse()
        {
            config.pagination.default_page_size = n;
        }
        if let Ok(v) = env::var("MAX_PAGE_SIZE")
            && let Ok(n) = v.parse()
        {
            config.pagination.max_page_size = n;
        }
        if let Ok(v) = env::var("QR_CODE_BASE_URL") {
            config.qr.base_url = v;
        }

        Ok(config)
    }
}
