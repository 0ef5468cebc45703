use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub api_prefix: String,

    // Files
    pub output_dir: String,
    pub log_dir: String,
    pub max_upload_bytes: usize,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_import_per_min: u32,
}

/// Optional setting; absent or unparseable values use `default`.
fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5),
            api_prefix: var_or("API_PREFIX", "/api".to_string()),

            output_dir: var_or("OUTPUT_DIR", "output_files".to_string()),
            log_dir: var_or("LOG_DIR", "logs".to_string()),
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),

            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", 1000),
            rate_import_per_min: var_or("RATE_IMPORT_PER_MIN", 30),
        }
    }

    /// Public path under which generated workbooks are served.
    pub fn download_base(&self) -> String {
        format!("{}/payroll/download", self.api_prefix.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_optional_values_fall_back() {
        // SAFETY: the variable is unique to this test.
        unsafe { env::set_var("PAYROLL_TEST_RATE", "lots") };
        assert_eq!(var_or("PAYROLL_TEST_RATE", 30u32), 30);
        unsafe { env::set_var("PAYROLL_TEST_RATE", " 45 ") };
        assert_eq!(var_or("PAYROLL_TEST_RATE", 30u32), 45);
        assert_eq!(var_or("PAYROLL_TEST_UNSET", 5u32), 5);
    }

    #[test]
    fn download_base_follows_prefix() {
        let config = Config {
            server_addr: String::new(),
            database_url: String::new(),
            db_max_connections: 5,
            jwt_secret: String::new(),
            api_prefix: "/api/".into(),
            output_dir: "out".into(),
            log_dir: "logs".into(),
            max_upload_bytes: 1,
            rate_protected_per_min: 1,
            rate_import_per_min: 1,
        };
        assert_eq!(config.download_base(), "/api/payroll/download");
    }
}
