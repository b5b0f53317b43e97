// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Version reporting for the `version` subcommand.

/// Human-readable version line.
pub fn format_version_info() -> String {
	format!(
		"keep-server {} ({} profile)",
		env!("CARGO_PKG_VERSION"),
		if cfg!(debug_assertions) {
			"debug"
		} else {
			"release"
		}
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_line_contains_package_version() {
		assert!(format_version_info().contains(env!("CARGO_PKG_VERSION")));
	}
}
