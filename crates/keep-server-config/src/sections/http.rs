// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP listener configuration.

use serde::Deserialize;

/// HTTP configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	/// External base URL, used to build `Location` headers.
	pub base_url: String,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8087,
			base_url: "http://localhost:8087".to_string(),
		}
	}
}

/// HTTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub base_url: Option<String>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		let defaults = HttpConfig::default();
		HttpConfig {
			host: self.host.unwrap_or(defaults.host),
			port: self.port.unwrap_or(defaults.port),
			base_url: self.base_url.unwrap_or(defaults.base_url),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = HttpConfigLayer::default().finalize();
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 8087);
	}

	#[test]
	fn test_merge_prefers_other() {
		let mut base = HttpConfigLayer {
			host: Some("0.0.0.0".to_string()),
			port: Some(80),
			base_url: None,
		};
		base.merge(HttpConfigLayer {
			host: None,
			port: Some(8443),
			base_url: Some("https://keep.example.com".to_string()),
		});
		let config = base.finalize();
		assert_eq!(config.host, "0.0.0.0");
		assert_eq!(config.port, 8443);
		assert_eq!(config.base_url, "https://keep.example.com");
	}
}
