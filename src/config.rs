use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,

    // JWT
    pub jwt_secret_key: Option<String>,
    pub jwt_algorithm: String,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            app_name: env::var("APP_NAME").unwrap_or("Gym Gate API".into()),
            app_version: env::var("APP_VERSION").unwrap_or("1.0.0".into()),
            environment: env::var("ENVIRONMENT").unwrap_or("development".into()),
            host: env::var("HOST").unwrap_or("0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or("3333".into())
                .parse()
                .unwrap_or(3333),

            jwt_secret_key: env::var("JWT_SECRET_KEY").ok().filter(|s| !s.is_empty()),
            jwt_algorithm: env::var("JWT_ALGORITHM").unwrap_or("HS256".into()),

            cors_origins: env::var("CORS_ORIGINS").unwrap_or("*".into()),

            log_level: env::var("LOG_LEVEL").unwrap_or("info".into()),
            log_format: env::var("LOG_FORMAT").unwrap_or("json".into()),
        }
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Gym Gate API".into(),
            app_version: "1.0.0".into(),
            environment: "development".into(),
            host: "0.0.0.0".into(),
            port: 3333,
            jwt_secret_key: None,
            jwt_algorithm: "HS256".into(),
            cors_origins: "*".into(),
            log_level: "info".into(),
            log_format: "json".into(),
        }
    }
}
