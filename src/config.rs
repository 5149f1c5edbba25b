use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub wechat: WechatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WechatConfig {
    pub app_id: String,
    pub app_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// 对象存储上传端点，如 https://bucket.cos.example.com
    pub endpoint: String,
    pub access_token: String,
    /// 对外访问域名；为空时直接用 endpoint 拼接
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: get_env("DATABASE_URL")
                            .unwrap_or_else(|| "sqlite://data/wishes.db?mode=rwc".to_string()),
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        token_expires_in: get_env_parse("JWT_EXPIRES_IN", 604_800i64),
                    },
                    wechat: WechatConfig {
                        app_id: get_env("WECHAT_APPID").unwrap_or_default(),
                        app_secret: get_env("WECHAT_SECRET").unwrap_or_default(),
                    },
                    storage: StorageConfig {
                        endpoint: get_env("STORAGE_ENDPOINT").unwrap_or_default(),
                        access_token: get_env("STORAGE_ACCESS_TOKEN").unwrap_or_default(),
                        public_base_url: get_env("STORAGE_PUBLIC_BASE_URL"),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(p) = v.parse() {
                config.server.port = p;
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(mc) = v.parse() {
                config.database.max_connections = mc;
            }
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.jwt.token_expires_in = n;
            }
        }
        if let Ok(v) = env::var("WECHAT_APPID") {
            config.wechat.app_id = v;
        }
        if let Ok(v) = env::var("WECHAT_SECRET") {
            config.wechat.app_secret = v;
        }
        if let Ok(v) = env::var("STORAGE_ENDPOINT") {
            config.storage.endpoint = v;
        }
        if let Ok(v) = env::var("STORAGE_ACCESS_TOKEN") {
            config.storage.access_token = v;
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_BASE_URL") {
            config.storage.public_base_url = Some(v);
        }

        Ok(config)
    }
}
