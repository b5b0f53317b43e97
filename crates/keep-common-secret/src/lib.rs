// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper type for the Keep server.
//!
//! [`SecretString`] holds sensitive values (SCIM tokens, SMTP passwords) so
//! that they are:
//!
//! - Never logged: `Debug` and `Display` both render `[REDACTED]`
//! - Zeroized in memory on drop
//! - Only readable through an explicit [`SecretString::expose`] call
//!
//! With the `serde` feature (default), a `SecretString` deserializes from a
//! plain string but always serializes as `[REDACTED]` — config structs that
//! embed secrets can be dumped for debugging without leaking.

use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents are hidden from `Debug`/`Display` and zeroized on
/// drop.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wrap a sensitive value.
	pub fn new(value: String) -> Self {
		Self(Zeroizing::new(value))
	}

	/// Read the secret. Call sites should keep the borrow short-lived and
	/// never pass the result to a formatter.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consume the wrapper and return the inner value.
	///
	/// The returned `String` is no longer zeroized; use only where an API
	/// requires an owned plain string (e.g. SMTP credentials).
	pub fn into_inner(self) -> String {
		self.0.to_string()
	}

	/// True if the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str("[REDACTED]")
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Ok(SecretString::new(value))
	}
}

/// Errors from environment secret loading.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
	/// The variable is set but not valid UTF-8.
	#[error("environment variable {0} is not valid UTF-8")]
	NotUnicode(String),
}

/// Load a secret from an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or empty, so callers can
/// treat "not configured" uniformly.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretError> {
	match std::env::var(name) {
		Ok(value) if value.is_empty() => Ok(None),
		Ok(value) => Ok(Some(SecretString::new(value))),
		Err(std::env::VarError::NotPresent) => Ok(None),
		Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::NotUnicode(name.to_string())),
	}
}
