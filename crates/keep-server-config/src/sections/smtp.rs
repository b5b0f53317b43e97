// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP configuration.
//!
//! The section is optional: when no host is configured, the server runs with
//! mail dispatch disabled (sponsorship offers fail with a clear error).

use keep_common_secret::SecretString;
use serde::Deserialize;

/// SMTP configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: String,
	pub from_name: String,
	pub use_tls: bool,
}

/// SMTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(skip)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub from_address: Option<String>,
	#[serde(default)]
	pub from_name: Option<String>,
	#[serde(default)]
	pub use_tls: Option<bool>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: SmtpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
		if other.use_tls.is_some() {
			self.use_tls = other.use_tls;
		}
	}

	/// Resolve the section; `None` when no host is configured.
	pub fn finalize(self) -> Option<SmtpConfig> {
		let host = self.host?;
		Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(587),
			username: self.username,
			password: self.password,
			from_address: self
				.from_address
				.unwrap_or_else(|| "noreply@keep.local".to_string()),
			from_name: self.from_name.unwrap_or_else(|| "Keep".to_string()),
			use_tls: self.use_tls.unwrap_or(true),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_host_means_disabled() {
		assert!(SmtpConfigLayer::default().finalize().is_none());
	}

	#[test]
	fn test_minimal_section_gets_defaults() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.port, 587);
		assert!(config.use_tls);
		assert_eq!(config.from_name, "Keep");
	}

	#[test]
	fn test_password_never_in_debug() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			password: Some(SecretString::new("swordfish".to_string())),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		let debug = format!("{config:?}");
		assert!(!debug.contains("swordfish"));
	}
}
