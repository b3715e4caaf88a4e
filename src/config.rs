use crate::error::{AppError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub read_buffer_size: usize,
    pub parallel_threshold: usize,
    pub chunk_size: usize,
    pub max_sample_size: usize,
    pub max_generate_size: u64,
    pub log_level: String,
}

fn default_read_buffer_size() -> usize {
    64 * 1024 // 64KB
}
fn default_parallel_threshold() -> usize {
    8 * 1024 * 1024 // 8MB
}
fn default_chunk_size() -> usize {
    1024 * 1024 // 1MB
}
fn default_max_sample_size() -> usize {
    128 * 1024 * 1024 // 128MB
}
fn default_max_generate_size() -> u64 {
    1024 * 1024 * 1024 // 1GB
}
fn default_log_level() -> String {
    "warn".to_string()
}

fn env_or<T: std::str::FromStr>(key: &str, default: fn() -> T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = Self {
            read_buffer_size: env_or("SAMPLER_READ_BUFFER_SIZE", default_read_buffer_size),
            parallel_threshold: env_or("SAMPLER_PARALLEL_THRESHOLD", default_parallel_threshold),
            chunk_size: env_or("SAMPLER_CHUNK_SIZE", default_chunk_size),
            max_sample_size: env_or("SAMPLER_MAX_SAMPLE_SIZE", default_max_sample_size),
            max_generate_size: env_or("SAMPLER_MAX_GENERATE_SIZE", default_max_generate_size),
            log_level: env_or("SAMPLER_LOG_LEVEL", default_log_level),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_size == 0 {
            return Err(AppError::InvalidArgument(
                "read buffer size must be positive".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(AppError::InvalidArgument(
                "chunk size must be positive".to_string(),
            ));
        }
        self.max_level()?;
        Ok(())
    }

    pub fn max_level(&self) -> Result<tracing::Level> {
        self.log_level.parse().map_err(|_| {
            AppError::InvalidArgument(format!("unknown log level: {}", self.log_level))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            parallel_threshold: default_parallel_threshold(),
            chunk_size: default_chunk_size(),
            max_sample_size: default_max_sample_size(),
            max_generate_size: default_max_generate_size(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_level().unwrap(), tracing::Level::WARN);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = Config {
            chunk_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_read_buffer_is_rejected() {
        let config = Config {
            read_buffer_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert!(config.max_level().is_err());
    }
}
