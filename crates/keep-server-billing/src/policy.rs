// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription access policies.
//!
//! Pure validation over an [`Organization`] snapshot: no I/O, every failure
//! carries the message shown to the customer. Commands run these checks
//! before touching the database or the gateway.

use keep_server_db::Organization;

use crate::plans::find_plan;

/// Outcome of a policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicyResult {
	Success,
	Fail(String),
}

impl AccessPolicyResult {
	pub fn fail(reason: impl Into<String>) -> Self {
		AccessPolicyResult::Fail(reason.into())
	}

	pub fn is_permitted(&self) -> bool {
		matches!(self, AccessPolicyResult::Success)
	}

	/// The failure reason, if any.
	pub fn reason(&self) -> Option<&str> {
		match self {
			AccessPolicyResult::Success => None,
			AccessPolicyResult::Fail(reason) => Some(reason),
		}
	}
}

/// Seat-management policy checks.
#[derive(Debug, Clone)]
pub struct SubscriptionAccessPolicies {
	/// Self-hosted deployments have no gateway to bill autoscaled seats to.
	self_hosted: bool,
}

impl SubscriptionAccessPolicies {
	pub fn new(self_hosted: bool) -> Self {
		Self { self_hosted }
	}

	/// May the organization automatically grow by `seats_to_add` seats?
	pub fn can_scale(&self, organization: &Organization, seats_to_add: i64) -> AccessPolicyResult {
		if seats_to_add < 1 {
			return AccessPolicyResult::Success;
		}

		if self.self_hosted {
			return AccessPolicyResult::fail("Cannot autoscale on self-hosted instance.");
		}

		if let (Some(seats), Some(max_autoscale_seats)) =
			(organization.seats, organization.max_autoscale_seats)
		{
			if max_autoscale_seats < seats + seats_to_add {
				return AccessPolicyResult::fail(
					"Cannot invite new users. Seat limit has been reached.",
				);
			}
		}

		AccessPolicyResult::Success
	}

	/// May the subscription's seat count change by `seat_adjustment`, given
	/// `current_user_count` occupied seats?
	pub fn can_adjust_seats(
		&self,
		organization: &Organization,
		seat_adjustment: i64,
		current_user_count: i64,
	) -> AccessPolicyResult {
		let Some(seats) = organization.seats else {
			return AccessPolicyResult::fail(
				"Organization has no seat limit, no need to adjust seats",
			);
		};

		if organization
			.gateway_customer_id
			.as_deref()
			.is_none_or(|id| id.trim().is_empty())
		{
			return AccessPolicyResult::fail("No payment method found.");
		}

		if organization
			.gateway_subscription_id
			.as_deref()
			.is_none_or(|id| id.trim().is_empty())
		{
			return AccessPolicyResult::fail("No subscription found.");
		}

		let Some(plan) = find_plan(organization.plan_type) else {
			return AccessPolicyResult::fail("Existing plan not found.");
		};

		if !plan.has_additional_seats_option {
			return AccessPolicyResult::fail("Plan does not allow additional seats.");
		}

		let new_seat_total = seats + seat_adjustment;
		if plan.base_seats > new_seat_total {
			return AccessPolicyResult::fail(format!(
				"Plan has a minimum of {} seats.",
				plan.base_seats
			));
		}

		if new_seat_total <= 0 {
			return AccessPolicyResult::fail("You must have at least 1 seat.");
		}

		let additional_seats = new_seat_total - plan.base_seats;
		if let Some(max_additional_seats) = plan.max_additional_seats {
			if additional_seats > max_additional_seats {
				return AccessPolicyResult::fail(format!(
					"Organization plan allows a maximum of {max_additional_seats} additional seats."
				));
			}
		}

		if seats > new_seat_total && current_user_count > new_seat_total {
			return AccessPolicyResult::fail(format!(
				"Your organization currently has {current_user_count} seats filled. \
				 Your new plan only has ({new_seat_total}) seats. Remove some users."
			));
		}

		AccessPolicyResult::Success
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use keep_server_db::PlanType;

	fn org(plan_type: PlanType, seats: Option<i64>) -> Organization {
		let mut org = Organization::new("Acme", "billing@acme.test", plan_type);
		org.seats = seats;
		org.gateway_customer_id = Some("cus_123".to_string());
		org.gateway_subscription_id = Some("sub_123".to_string());
		org
	}

	fn cloud() -> SubscriptionAccessPolicies {
		SubscriptionAccessPolicies::new(false)
	}

	mod can_scale {
		use super::*;

		#[test]
		fn nonpositive_additions_are_always_permitted() {
			let policies = SubscriptionAccessPolicies::new(true);
			let org = org(PlanType::TeamsAnnually, Some(5));
			assert!(policies.can_scale(&org, 0).is_permitted());
			assert!(policies.can_scale(&org, -3).is_permitted());
		}

		#[test]
		fn self_hosted_cannot_autoscale() {
			let policies = SubscriptionAccessPolicies::new(true);
			let result = policies.can_scale(&org(PlanType::TeamsAnnually, Some(5)), 1);
			assert_eq!(
				result.reason(),
				Some("Cannot autoscale on self-hosted instance.")
			);
		}

		#[test]
		fn autoscale_ceiling_is_enforced() {
			let mut org = org(PlanType::TeamsAnnually, Some(5));
			org.max_autoscale_seats = Some(6);
			let result = cloud().can_scale(&org, 2);
			assert_eq!(
				result.reason(),
				Some("Cannot invite new users. Seat limit has been reached.")
			);
		}

		#[test]
		fn within_ceiling_is_permitted() {
			let mut org = org(PlanType::TeamsAnnually, Some(5));
			org.max_autoscale_seats = Some(10);
			assert!(cloud().can_scale(&org, 2).is_permitted());
		}

		#[test]
		fn no_ceiling_means_no_cap() {
			let org = org(PlanType::TeamsAnnually, Some(5));
			assert!(cloud().can_scale(&org, 100).is_permitted());
		}
	}

	mod can_adjust_seats {
		use super::*;

		#[test]
		fn unlimited_seats_cannot_be_adjusted() {
			let result = cloud().can_adjust_seats(&org(PlanType::TeamsAnnually, None), 2, 0);
			assert_eq!(
				result.reason(),
				Some("Organization has no seat limit, no need to adjust seats")
			);
		}

		#[test]
		fn missing_payment_method_is_rejected() {
			let mut org = org(PlanType::TeamsAnnually, Some(5));
			org.gateway_customer_id = None;
			let result = cloud().can_adjust_seats(&org, 2, 0);
			assert_eq!(result.reason(), Some("No payment method found."));

			org.gateway_customer_id = Some("   ".to_string());
			let result = cloud().can_adjust_seats(&org, 2, 0);
			assert_eq!(result.reason(), Some("No payment method found."));
		}

		#[test]
		fn missing_subscription_is_rejected() {
			let mut org = org(PlanType::TeamsAnnually, Some(5));
			org.gateway_subscription_id = None;
			let result = cloud().can_adjust_seats(&org, 2, 0);
			assert_eq!(result.reason(), Some("No subscription found."));
		}

		#[test]
		fn fixed_size_plan_rejects_additional_seats() {
			let result = cloud().can_adjust_seats(&org(PlanType::FamiliesAnnually, Some(6)), 1, 0);
			assert_eq!(
				result.reason(),
				Some("Plan does not allow additional seats.")
			);
		}

		#[test]
		fn seat_floor_is_enforced() {
			let result = cloud().can_adjust_seats(&org(PlanType::TeamsAnnually, Some(3)), -3, 0);
			assert_eq!(result.reason(), Some("You must have at least 1 seat."));
		}

		#[test]
		fn shrinking_below_occupancy_is_rejected() {
			let result = cloud().can_adjust_seats(&org(PlanType::TeamsAnnually, Some(10)), -5, 8);
			assert_eq!(
				result.reason(),
				Some(
					"Your organization currently has 8 seats filled. \
					 Your new plan only has (5) seats. Remove some users."
				)
			);
		}

		#[test]
		fn shrinking_with_room_is_permitted() {
			assert!(cloud()
				.can_adjust_seats(&org(PlanType::TeamsAnnually, Some(10)), -5, 3)
				.is_permitted());
		}

		#[test]
		fn growing_is_permitted() {
			assert!(cloud()
				.can_adjust_seats(&org(PlanType::EnterpriseAnnually, Some(10)), 15, 10)
				.is_permitted());
		}

		#[test]
		fn guard_order_payment_before_plan() {
			// A Families org without a payment method reports the payment
			// failure, not the plan failure.
			let mut org = org(PlanType::FamiliesAnnually, Some(6));
			org.gateway_customer_id = None;
			let result = cloud().can_adjust_seats(&org, 1, 0);
			assert_eq!(result.reason(), Some("No payment method found."));
		}
	}
}
