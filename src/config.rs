//! Service configuration from environment variables

use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EXPAND_PAGES: u32 = 7;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pages read after each TOC entry when the request omits `expand_pages`.
    pub default_expand_pages: u32,
    /// Request body cap applied to the multipart upload.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_expand_pages: DEFAULT_EXPAND_PAGES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `PARSE_PDF_*` environment variables, falling
    /// back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("PARSE_PDF_HOST").unwrap_or(defaults.host),
            port: env_parsed("PARSE_PDF_PORT", defaults.port),
            default_expand_pages: env_parsed("PARSE_PDF_EXPAND_PAGES", defaults.default_expand_pages),
            max_upload_bytes: env_parsed("PARSE_PDF_MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("ignoring unparsable {key}={raw:?}, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_service() {
        let config = ServerConfig::default();
        assert_eq!(config.default_expand_pages, 7);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
