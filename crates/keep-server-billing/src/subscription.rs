// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription update and seat autoscale commands.

use std::sync::Arc;

use keep_server_db::{Organization, OrganizationUserStore, OrgId, OrgStore};
use keep_server_events::{EventActor, EventEntry, EventService, EventType, SystemUser};
use serde_json::json;

use crate::error::BillingError;
use crate::plans::find_plan;
use crate::policy::{AccessPolicyResult, SubscriptionAccessPolicies};

/// A requested change to an organization's subscription.
#[derive(Debug, Clone)]
pub struct OrganizationUpdate {
	pub organization_id: OrgId,
	/// Seats to add (positive) or remove (negative).
	pub seat_adjustment: i64,
	/// New autoscale ceiling; `None` removes the ceiling.
	pub max_autoscale_seats: Option<i64>,
}

/// Applies validated subscription changes.
pub struct UpdateSubscriptionCommand {
	org_store: Arc<dyn OrgStore>,
	org_user_store: Arc<dyn OrganizationUserStore>,
	policies: SubscriptionAccessPolicies,
	events: Arc<EventService>,
}

impl UpdateSubscriptionCommand {
	pub fn new(
		org_store: Arc<dyn OrgStore>,
		org_user_store: Arc<dyn OrganizationUserStore>,
		policies: SubscriptionAccessPolicies,
		events: Arc<EventService>,
	) -> Self {
		Self {
			org_store,
			org_user_store,
			policies,
			events,
		}
	}

	/// Apply a subscription update.
	///
	/// Seat adjustments run through
	/// [`SubscriptionAccessPolicies::can_adjust_seats`]; the autoscale
	/// ceiling is validated against the plan. Returns the updated
	/// organization.
	#[tracing::instrument(
		skip(self, update),
		fields(org_id = %update.organization_id, seat_adjustment = update.seat_adjustment)
	)]
	pub async fn update_subscription(
		&self,
		update: OrganizationUpdate,
	) -> Result<Organization, BillingError> {
		let organization = self
			.org_store
			.get_org_by_id(&update.organization_id)
			.await?
			.ok_or_else(|| BillingError::NotFound("Organization not found.".to_string()))?;

		if update.seat_adjustment != 0 {
			let current_user_count = self
				.org_user_store
				.count_seats_taken(&organization.id)
				.await?;

			if let AccessPolicyResult::Fail(reason) =
				self
					.policies
					.can_adjust_seats(&organization, update.seat_adjustment, current_user_count)
			{
				return Err(BillingError::BadRequest(reason));
			}
		}

		let new_seats = organization.seats.map(|s| s + update.seat_adjustment);
		validate_autoscale_ceiling(&organization, update.max_autoscale_seats, new_seats)?;

		self
			.org_store
			.update_subscription(&organization.id, new_seats, update.max_autoscale_seats)
			.await?;

		self.events.log(
			EventEntry::builder(
				EventType::OrganizationSubscriptionUpdated,
				EventActor::System(SystemUser::Billing),
			)
			.organization(organization.id)
			.details(json!({
				"seat_adjustment": update.seat_adjustment,
				"seats": new_seats,
				"max_autoscale_seats": update.max_autoscale_seats,
			}))
			.build(),
		);

		tracing::info!(org_id = %organization.id, ?new_seats, "subscription updated");

		let organization = self
			.org_store
			.get_org_by_id(&organization.id)
			.await?
			.ok_or_else(|| BillingError::NotFound("Organization not found.".to_string()))?;
		Ok(organization)
	}

	/// Grow the subscription so `additional_users` more seats fit.
	///
	/// No-op when the organization has no seat cap or free capacity remains.
	/// Returns the number of seats added.
	#[tracing::instrument(skip(self, organization), fields(org_id = %organization.id, additional_users))]
	pub async fn auto_add_seats(
		&self,
		organization: &Organization,
		additional_users: i64,
	) -> Result<i64, BillingError> {
		let Some(seats) = organization.seats else {
			return Ok(0);
		};

		let occupied = self
			.org_user_store
			.count_seats_taken(&organization.id)
			.await?;
		let deficit = occupied + additional_users - seats;
		if deficit <= 0 {
			return Ok(0);
		}

		if let AccessPolicyResult::Fail(reason) = self.policies.can_scale(organization, deficit) {
			return Err(BillingError::BadRequest(reason));
		}

		self
			.org_store
			.update_subscription(
				&organization.id,
				Some(seats + deficit),
				organization.max_autoscale_seats,
			)
			.await?;

		self.events.log(
			EventEntry::builder(
				EventType::OrganizationSubscriptionUpdated,
				EventActor::System(SystemUser::Billing),
			)
			.organization(organization.id)
			.details(json!({
				"autoscaled": true,
				"seats_added": deficit,
				"seats": seats + deficit,
			}))
			.build(),
		);

		tracing::info!(org_id = %organization.id, seats_added = deficit, "seats autoscaled");
		Ok(deficit)
	}
}

fn validate_autoscale_ceiling(
	organization: &Organization,
	max_autoscale_seats: Option<i64>,
	new_seats: Option<i64>,
) -> Result<(), BillingError> {
	let Some(ceiling) = max_autoscale_seats else {
		return Ok(());
	};

	let plan = find_plan(organization.plan_type)
		.ok_or_else(|| BillingError::BadRequest("Existing plan not found.".to_string()))?;

	if !plan.allow_seat_autoscale {
		return Err(BillingError::BadRequest(
			"Your plan does not allow seat autoscaling.".to_string(),
		));
	}

	if let Some(new_seats) = new_seats {
		if ceiling < new_seats {
			return Err(BillingError::BadRequest(
				"Cannot set max seat autoscaling below current seat count.".to_string(),
			));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use keep_server_db::{
		testing::create_migrated_test_pool, Organization, OrganizationUser,
		OrganizationUserRepository, OrganizationUserType, OrgRepository, PlanType,
	};

	async fn setup(
		plan_type: PlanType,
		seats: Option<i64>,
		occupied: i64,
	) -> (UpdateSubscriptionCommand, Organization) {
		let pool = create_migrated_test_pool().await;
		let org_repo = OrgRepository::new(pool.clone());
		let org_user_repo = OrganizationUserRepository::new(pool.clone());

		let mut org = Organization::new("Acme", "billing@acme.test", plan_type);
		org.seats = seats;
		org.gateway_customer_id = Some("cus_123".to_string());
		org.gateway_subscription_id = Some("sub_123".to_string());
		org_repo.create_org(&org).await.unwrap();

		for i in 0..occupied {
			let seat = OrganizationUser::invite(
				org.id,
				format!("user{i}@acme.test"),
				OrganizationUserType::User,
			);
			org_user_repo.create_org_user(&seat).await.unwrap();
		}

		let command = UpdateSubscriptionCommand::new(
			Arc::new(org_repo),
			Arc::new(org_user_repo),
			SubscriptionAccessPolicies::new(false),
			Arc::new(EventService::new(16, vec![])),
		);
		(command, org)
	}

	#[tokio::test]
	async fn update_applies_seat_adjustment() {
		let (command, org) = setup(PlanType::TeamsAnnually, Some(10), 4).await;

		let updated = command
			.update_subscription(OrganizationUpdate {
				organization_id: org.id,
				seat_adjustment: 5,
				max_autoscale_seats: Some(30),
			})
			.await
			.unwrap();

		assert_eq!(updated.seats, Some(15));
		assert_eq!(updated.max_autoscale_seats, Some(30));
	}

	#[tokio::test]
	async fn update_unknown_org_is_not_found() {
		let (command, _) = setup(PlanType::TeamsAnnually, Some(10), 0).await;

		let result = command
			.update_subscription(OrganizationUpdate {
				organization_id: OrgId::generate(),
				seat_adjustment: 1,
				max_autoscale_seats: None,
			})
			.await;

		assert!(matches!(result, Err(BillingError::NotFound(_))));
	}

	#[tokio::test]
	async fn update_surfaces_policy_reason() {
		let (command, org) = setup(PlanType::TeamsAnnually, Some(10), 8).await;

		let result = command
			.update_subscription(OrganizationUpdate {
				organization_id: org.id,
				seat_adjustment: -5,
				max_autoscale_seats: None,
			})
			.await;

		match result {
			Err(BillingError::BadRequest(reason)) => {
				assert!(reason.contains("8 seats filled"), "got: {reason}")
			}
			other => panic!("expected BadRequest, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn pure_autoscale_change_skips_seat_policy() {
		// Seat adjustment 0 must not require gateway handles.
		let (command, org) = setup(PlanType::TeamsAnnually, Some(10), 0).await;

		let updated = command
			.update_subscription(OrganizationUpdate {
				organization_id: org.id,
				seat_adjustment: 0,
				max_autoscale_seats: Some(20),
			})
			.await
			.unwrap();

		assert_eq!(updated.seats, Some(10));
		assert_eq!(updated.max_autoscale_seats, Some(20));
	}

	#[tokio::test]
	async fn autoscale_ceiling_below_seats_is_rejected() {
		let (command, org) = setup(PlanType::TeamsAnnually, Some(10), 0).await;

		let result = command
			.update_subscription(OrganizationUpdate {
				organization_id: org.id,
				seat_adjustment: 0,
				max_autoscale_seats: Some(5),
			})
			.await;

		match result {
			Err(BillingError::BadRequest(reason)) => assert_eq!(
				reason,
				"Cannot set max seat autoscaling below current seat count."
			),
			other => panic!("expected BadRequest, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn autoscale_ceiling_on_fixed_plan_is_rejected() {
		let (command, org) = setup(PlanType::FamiliesAnnually, Some(6), 0).await;

		let result = command
			.update_subscription(OrganizationUpdate {
				organization_id: org.id,
				seat_adjustment: 0,
				max_autoscale_seats: Some(10),
			})
			.await;

		match result {
			Err(BillingError::BadRequest(reason)) => {
				assert_eq!(reason, "Your plan does not allow seat autoscaling.")
			}
			other => panic!("expected BadRequest, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn auto_add_seats_covers_deficit() {
		let (command, org) = setup(PlanType::TeamsAnnually, Some(4), 4).await;

		let added = command.auto_add_seats(&org, 2).await.unwrap();
		assert_eq!(added, 2);

		let updated = command
			.org_store
			.get_org_by_id(&org.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(updated.seats, Some(6));
	}

	#[tokio::test]
	async fn auto_add_seats_is_noop_with_capacity() {
		let (command, org) = setup(PlanType::TeamsAnnually, Some(10), 4).await;
		assert_eq!(command.auto_add_seats(&org, 2).await.unwrap(), 0);
	}

	#[tokio::test]
	async fn auto_add_seats_is_noop_without_seat_cap() {
		let (command, org) = setup(PlanType::TeamsAnnually, None, 4).await;
		assert_eq!(command.auto_add_seats(&org, 50).await.unwrap(), 0);
	}

	#[tokio::test]
	async fn auto_add_seats_respects_ceiling() {
		let (command, mut org) = setup(PlanType::TeamsAnnually, Some(4), 4).await;
		org.max_autoscale_seats = Some(5);
		command.org_store.update_org(&org).await.unwrap();

		let result = command.auto_add_seats(&org, 2).await;
		match result {
			Err(BillingError::BadRequest(reason)) => assert_eq!(
				reason,
				"Cannot invite new users. Seat limit has been reached."
			),
			other => panic!("expected BadRequest, got {other:?}"),
		}
	}
}
