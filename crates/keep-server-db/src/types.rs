// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ID newtypes for the Keep domain.
//!
//! Type-safe wrappers around UUIDs prevent accidentally passing a group id
//! where an organization id is expected. All IDs serialize transparently as
//! UUID strings and are stored as TEXT in SQLite.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl std::str::FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}
	};
}

define_id_type!(OrgId, "Unique identifier for an organization.");
define_id_type!(GroupId, "Unique identifier for a group.");
define_id_type!(OrgUserId, "Unique identifier for an organization membership.");
define_id_type!(SponsorshipId, "Unique identifier for an organization sponsorship.");
define_id_type!(UserId, "Unique identifier for a platform user account.");

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::HashSet;

	#[test]
	fn display_round_trips_through_from_str() {
		let id = GroupId::generate();
		let parsed: GroupId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
	}

	#[test]
	fn serde_is_transparent() {
		let id = OrgId::generate();
		let json = serde_json::to_string(&id).unwrap();
		assert_eq!(json, format!("\"{id}\""));
	}

	proptest! {
		#[test]
		fn generated_ids_are_unique(count in 1..500usize) {
			let mut seen = HashSet::new();
			for _ in 0..count {
				prop_assert!(seen.insert(OrgUserId::generate().to_string()));
			}
		}
	}
}
