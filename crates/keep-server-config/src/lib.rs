// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Keep server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`KEEP_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use keep_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub smtp: Option<SmtpConfig>,
	pub scim: ScimConfig,
	pub billing: BillingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`KEEP_SERVER_*`)
/// 2. Config file (`/etc/keep/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let billing = layer.billing.unwrap_or_default().finalize();

	let smtp = layer.smtp.and_then(|l| l.finalize());

	let scim_token = keep_common_secret::load_secret_env("KEEP_SERVER_SCIM_TOKEN")
		.map_err(|e| ConfigError::Secret(e.to_string()))?;
	let scim = layer.scim.unwrap_or_default().finalize(scim_token);

	validate_config(&scim)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		smtp_configured = smtp.is_some(),
		scim_enabled = scim.enabled,
		self_hosted = billing.self_hosted,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		logging,
		smtp,
		scim,
		billing,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(scim: &ScimConfig) -> Result<(), ConfigError> {
	if scim.enabled && scim.token.is_none() {
		return Err(ConfigError::Validation(
			"SCIM is enabled but KEEP_SERVER_SCIM_TOKEN is not set. Identity providers \
			 cannot authenticate without a bearer token; set the token or disable SCIM."
				.to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use keep_common_secret::SecretString;

	#[test]
	fn test_scim_enabled_without_token_is_rejected() {
		let scim = ScimConfig {
			enabled: true,
			token: None,
		};
		let result = validate_config(&scim);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("KEEP_SERVER_SCIM_TOKEN"));
	}

	#[test]
	fn test_scim_enabled_with_token_ok() {
		let scim = ScimConfig {
			enabled: true,
			token: Some(SecretString::new("token".to_string())),
		};
		assert!(validate_config(&scim).is_ok());
	}

	#[test]
	fn test_scim_disabled_without_token_ok() {
		assert!(validate_config(&ScimConfig::default()).is_ok());
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
				base_url: "http://localhost:9000".to_string(),
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}
}
