// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Billing configuration.

use serde::Deserialize;

/// Billing configuration (runtime, fully resolved).
#[derive(Debug, Clone, Default)]
pub struct BillingConfig {
	/// Self-hosted deployments have no payment gateway; seat autoscaling is
	/// refused outright.
	pub self_hosted: bool,
}

/// Billing configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfigLayer {
	#[serde(default)]
	pub self_hosted: Option<bool>,
}

impl BillingConfigLayer {
	pub fn merge(&mut self, other: BillingConfigLayer) {
		if other.self_hosted.is_some() {
			self.self_hosted = other.self_hosted;
		}
	}

	pub fn finalize(self) -> BillingConfig {
		BillingConfig {
			self_hosted: self.self_hosted.unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cloud_by_default() {
		assert!(!BillingConfigLayer::default().finalize().self_hosted);
	}

	#[test]
	fn test_self_hosted() {
		let layer = BillingConfigLayer {
			self_hosted: Some(true),
		};
		assert!(layer.finalize().self_hosted);
	}
}
