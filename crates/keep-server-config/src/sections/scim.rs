// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM (System for Cross-domain Identity Management) configuration.

use keep_common_secret::SecretString;
use serde::Deserialize;

/// SCIM configuration (runtime, fully resolved).
#[derive(Debug, Clone, Default)]
pub struct ScimConfig {
	pub enabled: bool,
	/// Bearer token identity providers must present. Loaded from
	/// `KEEP_SERVER_SCIM_TOKEN`, never from the config file.
	pub token: Option<SecretString>,
}

/// SCIM configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScimConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
}

impl ScimConfigLayer {
	pub fn merge(&mut self, other: ScimConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
	}

	pub fn finalize(self, token: Option<SecretString>) -> ScimConfig {
		ScimConfig {
			enabled: self.enabled.unwrap_or(false),
			token,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scim_disabled_by_default() {
		let config = ScimConfigLayer::default().finalize(None);
		assert!(!config.enabled);
		assert!(config.token.is_none());
	}

	#[test]
	fn test_scim_enabled() {
		let layer = ScimConfigLayer {
			enabled: Some(true),
		};
		let config = layer.finalize(Some(SecretString::new("test-token".to_string())));
		assert!(config.enabled);
		assert!(config.token.is_some());
	}
}
