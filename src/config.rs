use thiserror::Error;

/// Shortest accepted HS256 signing key, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Longest accepted token lifetime (365 days).
pub const MAX_EXPIRATION_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub edge: EdgeConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub expiration_seconds: u64,
    /// HS256 signing key. Never logged.
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiration_seconds", &self.expiration_seconds)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdgeConfig {
    /// When set, the edge filter also rejects tokens revoked in the token store.
    /// Off by default: downstream services trust signature and expiry alone.
    pub check_revocation: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(defaults.data_dir);

        let secret = std::env::var("JWT_SECRET").unwrap_or_default();

        let expiration_seconds = match std::env::var("JWT_EXPIRATION_SECONDS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "JWT_EXPIRATION_SECONDS must be a positive integer, got {raw:?}"
                ))
            })?,
            Err(_) => 3600,
        };

        let check_revocation = std::env::var("EDGE_REVOCATION_CHECK")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            edge: EdgeConfig { check_revocation },
            jwt: JwtConfig {
                expiration_seconds,
                secret,
            },
            server: ServerConfig {
                bind_address,
                data_dir,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "JWT_SECRET must be set".to_string(),
            ));
        }

        if self.jwt.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::ValidationError(format!(
                "JWT_SECRET must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        if self.jwt.expiration_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "JWT_EXPIRATION_SECONDS must be greater than 0".to_string(),
            ));
        }

        if self.jwt.expiration_seconds > MAX_EXPIRATION_SECONDS {
            return Err(ConfigError::ValidationError(format!(
                "JWT_EXPIRATION_SECONDS must be at most {MAX_EXPIRATION_SECONDS}"
            )));
        }

        if !self.edge.check_revocation {
            tracing::info!(
                "Edge filter is stateless: revoked tokens stay accepted downstream until they expire"
            );
        }

        Ok(())
    }
}
