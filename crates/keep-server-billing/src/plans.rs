// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static subscription plan catalog.
//!
//! Plans are compiled in; the gateway only ever sees their price ids. Lookup
//! is a linear scan keyed by [`PlanType`].

use keep_server_db::PlanType;

/// A subscription plan and its seat rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
	pub plan_type: PlanType,
	pub name: &'static str,
	/// Seats included in the base price.
	pub base_seats: i64,
	/// Whether seats beyond `base_seats` can be purchased.
	pub has_additional_seats_option: bool,
	/// Cap on purchased additional seats. `None` = unlimited.
	pub max_additional_seats: Option<i64>,
	/// Whether the subscription may grow seats automatically on invite.
	pub allow_seat_autoscale: bool,
	/// Whether organizations on this plan can use groups.
	pub use_groups: bool,
}

/// Every plan Keep sells, one entry per [`PlanType`].
pub const PLANS: &[Plan] = &[
	Plan {
		plan_type: PlanType::Free,
		name: "Free",
		base_seats: 2,
		has_additional_seats_option: false,
		max_additional_seats: Some(0),
		allow_seat_autoscale: false,
		use_groups: false,
	},
	Plan {
		plan_type: PlanType::FamiliesAnnually,
		name: "Families (Annually)",
		base_seats: 6,
		has_additional_seats_option: false,
		max_additional_seats: Some(0),
		allow_seat_autoscale: false,
		use_groups: false,
	},
	Plan {
		plan_type: PlanType::TeamsMonthly,
		name: "Teams (Monthly)",
		base_seats: 0,
		has_additional_seats_option: true,
		max_additional_seats: None,
		allow_seat_autoscale: true,
		use_groups: true,
	},
	Plan {
		plan_type: PlanType::TeamsAnnually,
		name: "Teams (Annually)",
		base_seats: 0,
		has_additional_seats_option: true,
		max_additional_seats: None,
		allow_seat_autoscale: true,
		use_groups: true,
	},
	Plan {
		plan_type: PlanType::EnterpriseMonthly,
		name: "Enterprise (Monthly)",
		base_seats: 0,
		has_additional_seats_option: true,
		max_additional_seats: None,
		allow_seat_autoscale: true,
		use_groups: true,
	},
	Plan {
		plan_type: PlanType::EnterpriseAnnually,
		name: "Enterprise (Annually)",
		base_seats: 0,
		has_additional_seats_option: true,
		max_additional_seats: None,
		allow_seat_autoscale: true,
		use_groups: true,
	},
];

/// Find the plan for a given type.
pub fn find_plan(plan_type: PlanType) -> Option<&'static Plan> {
	PLANS.iter().find(|p| p.plan_type == plan_type)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_plan_type_has_a_catalog_entry() {
		for plan_type in [
			PlanType::Free,
			PlanType::FamiliesAnnually,
			PlanType::TeamsMonthly,
			PlanType::TeamsAnnually,
			PlanType::EnterpriseMonthly,
			PlanType::EnterpriseAnnually,
		] {
			assert!(find_plan(plan_type).is_some(), "missing plan {plan_type}");
		}
	}

	#[test]
	fn free_and_families_are_fixed_size() {
		for plan_type in [PlanType::Free, PlanType::FamiliesAnnually] {
			let plan = find_plan(plan_type).unwrap();
			assert!(!plan.has_additional_seats_option);
			assert!(!plan.allow_seat_autoscale);
		}
	}

	#[test]
	fn paid_team_plans_allow_groups_and_autoscale() {
		for plan_type in [PlanType::TeamsAnnually, PlanType::EnterpriseAnnually] {
			let plan = find_plan(plan_type).unwrap();
			assert!(plan.use_groups);
			assert!(plan.allow_seat_autoscale);
			assert!(plan.has_additional_seats_option);
		}
	}
}
