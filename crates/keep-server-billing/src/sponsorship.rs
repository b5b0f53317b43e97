// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Families-for-Enterprise sponsorship offer command.

use std::sync::Arc;

use keep_server_db::{
	Organization, OrganizationSponsorship, OrganizationUser, OrganizationUserStatus,
};
use keep_server_email::MailService;
use keep_server_events::{EventActor, EventEntry, EventService, EventType, SystemUser};
use serde_json::json;

use crate::error::BillingError;

/// Sends (or resends) the sponsorship offer email.
///
/// Guards run before any mail is dispatched: a failed check must leave no
/// trace in the recipient's inbox.
pub struct SendSponsorshipOfferCommand {
	mail_service: Arc<dyn MailService>,
	events: Arc<EventService>,
}

impl SendSponsorshipOfferCommand {
	pub fn new(mail_service: Arc<dyn MailService>, events: Arc<EventService>) -> Self {
		Self {
			mail_service,
			events,
		}
	}

	/// Validate the sponsoring parties and send the offer email.
	///
	/// The `Option` parameters mirror the repository lookups of the caller:
	/// a missing row fails the corresponding guard here, keeping every
	/// failure message in one place.
	#[tracing::instrument(skip_all)]
	pub async fn send_sponsorship_offer(
		&self,
		sponsoring_org: Option<&Organization>,
		sponsoring_org_user: Option<&OrganizationUser>,
		sponsorship: Option<&OrganizationSponsorship>,
	) -> Result<(), BillingError> {
		let Some(org) = sponsoring_org else {
			return Err(BillingError::BadRequest(
				"Cannot find the requested sponsoring organization.".to_string(),
			));
		};

		let confirmed = sponsoring_org_user
			.map(|org_user| org_user.status == OrganizationUserStatus::Confirmed)
			.unwrap_or(false);
		if !confirmed {
			return Err(BillingError::BadRequest(
				"Only confirmed users can sponsor other organizations.".to_string(),
			));
		}

		let outstanding =
			sponsorship.and_then(|s| s.offered_to_email.as_deref().map(|email| (s, email)));
		let Some((sponsorship, offered_to_email)) = outstanding else {
			return Err(BillingError::BadRequest(
				"Cannot find an outstanding sponsorship offer for this organization.".to_string(),
			));
		};

		self
			.mail_service
			.send_sponsorship_offer_email(
				offered_to_email,
				&org.name,
				sponsorship.friendly_name.as_deref(),
			)
			.await?;

		self.events.log(
			EventEntry::builder(
				EventType::SponsorshipOfferSent,
				EventActor::System(SystemUser::Billing),
			)
			.organization(org.id)
			.organization_user(sponsorship.sponsoring_organization_user_id)
			.details(json!({"sponsorship_id": sponsorship.id.to_string()}))
			.build(),
		);

		tracing::info!(
			org_id = %org.id,
			sponsorship_id = %sponsorship.id,
			"sponsorship offer sent"
		);
		Ok(())
	}
}
