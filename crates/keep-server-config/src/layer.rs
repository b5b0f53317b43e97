// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mergeable configuration layer covering every section.

use serde::Deserialize;

use crate::sections::{
	BillingConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer, ScimConfigLayer,
	SmtpConfigLayer,
};

/// One source's partial view of the configuration. Sources are merged in
/// precedence order; later layers win field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub smtp: Option<SmtpConfigLayer>,
	#[serde(default)]
	pub scim: Option<ScimConfigLayer>,
	#[serde(default)]
	pub billing: Option<BillingConfigLayer>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.smtp, other.smtp, SmtpConfigLayer::merge);
		merge_section(&mut self.scim, other.scim, ScimConfigLayer::merge);
		merge_section(&mut self.billing, other.billing, BillingConfigLayer::merge);
	}
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (target.as_mut(), other) {
		(Some(existing), Some(incoming)) => merge(existing, incoming),
		(None, Some(incoming)) => *target = Some(incoming),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = ServerConfigLayer::default();
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(base.http.unwrap().port, Some(9000));
	}

	#[test]
	fn test_merge_overrides_field_by_field() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: Some("0.0.0.0".to_string()),
				port: Some(80),
				base_url: None,
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: None,
				port: Some(8443),
				base_url: None,
			}),
			..Default::default()
		});
		let http = base.http.unwrap();
		assert_eq!(http.host, Some("0.0.0.0".to_string()));
		assert_eq!(http.port, Some(8443));
	}
}
