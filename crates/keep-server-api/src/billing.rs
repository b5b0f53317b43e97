// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription and sponsorship DTOs.

use keep_server_billing::OrganizationUpdate;
use keep_server_db::{Organization, OrgId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Snapshot of an organization's subscription.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
	pub organization_id: String,
	pub plan_type: String,
	pub seats: Option<i64>,
	pub max_autoscale_seats: Option<i64>,
	pub occupied_seats: i64,
}

impl SubscriptionResponse {
	pub fn from_organization(organization: &Organization, occupied_seats: i64) -> Self {
		Self {
			organization_id: organization.id.to_string(),
			plan_type: organization.plan_type.to_string(),
			seats: organization.seats,
			max_autoscale_seats: organization.max_autoscale_seats,
			occupied_seats,
		}
	}
}

/// Requested subscription change.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdateRequest {
	/// Seats to add (positive) or remove (negative).
	pub seat_adjustment: i64,
	#[serde(default)]
	pub max_autoscale_seats: Option<i64>,
}

impl SubscriptionUpdateRequest {
	/// Translate into the domain update for the command layer.
	pub fn to_organization_update(&self, organization_id: OrgId) -> OrganizationUpdate {
		OrganizationUpdate {
			organization_id,
			seat_adjustment: self.seat_adjustment,
			max_autoscale_seats: self.max_autoscale_seats,
		}
	}
}

/// Invite a new member into the organization.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserRequest {
	pub email: String,
}

/// Result of an invite, including any seats autoscaling added.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserResponse {
	pub organization_user_id: String,
	pub email: String,
	pub seats_added: i64,
}

/// Error body shared by the billing routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct BillingErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use keep_server_db::PlanType;

	#[test]
	fn update_request_translates_to_domain_update() {
		let request: SubscriptionUpdateRequest =
			serde_json::from_str(r#"{"seatAdjustment": 5, "maxAutoscaleSeats": 20}"#).unwrap();
		let org_id = OrgId::generate();

		let update = request.to_organization_update(org_id);
		assert_eq!(update.organization_id, org_id);
		assert_eq!(update.seat_adjustment, 5);
		assert_eq!(update.max_autoscale_seats, Some(20));
	}

	#[test]
	fn update_request_defaults_autoscale_to_none() {
		let request: SubscriptionUpdateRequest =
			serde_json::from_str(r#"{"seatAdjustment": -2}"#).unwrap();
		let update = request.to_organization_update(OrgId::generate());
		assert_eq!(update.seat_adjustment, -2);
		assert_eq!(update.max_autoscale_seats, None);
	}

	#[test]
	fn update_request_requires_seat_adjustment() {
		let result: Result<SubscriptionUpdateRequest, _> = serde_json::from_str("{}");
		assert!(result.is_err());
	}

	#[test]
	fn subscription_response_serializes_camel_case() {
		let mut organization = Organization::new("Acme", "billing@acme.test", PlanType::TeamsAnnually);
		organization.seats = Some(10);
		let response = SubscriptionResponse::from_organization(&organization, 4);
		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["planType"], "teams_annually");
		assert_eq!(json["seats"], 10);
		assert_eq!(json["occupiedSeats"], 4);
	}
}
