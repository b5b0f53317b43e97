// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Subscription, invite and sponsorship HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use keep_server_api::billing::{
	BillingErrorResponse, InviteUserRequest, InviteUserResponse, SubscriptionResponse,
	SubscriptionUpdateRequest,
};
use keep_server_billing::BillingError;
use keep_server_db::{OrganizationUser, OrganizationUserType};
use keep_server_email::is_valid_email;
use keep_server_events::{EventActor, EventEntry, EventType, SystemUser};
use serde_json::json;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error, not_found},
	impl_api_error_response, parse_id,
	validation::{parse_org_id, parse_org_user_id},
};

impl_api_error_response!(BillingErrorResponse);

fn billing_error_response(e: BillingError) -> Response {
	match e {
		BillingError::BadRequest(message) => {
			bad_request::<BillingErrorResponse>("invalid_request", message).into_response()
		}
		BillingError::NotFound(message) => {
			not_found::<BillingErrorResponse>(message).into_response()
		}
		BillingError::Db(e) => {
			tracing::error!(error = %e, "billing command database failure");
			internal_error::<BillingErrorResponse>("Internal server error.").into_response()
		}
		BillingError::Mail(e) => {
			tracing::error!(error = %e, "billing command mail failure");
			internal_error::<BillingErrorResponse>("Failed to send email.").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/subscription",
    params(
        ("org_id" = String, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Subscription snapshot", body = SubscriptionResponse),
        (status = 400, description = "Invalid organization ID", body = BillingErrorResponse),
        (status = 404, description = "Organization not found", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
/// Current subscription state of an organization.
#[tracing::instrument(skip(state), fields(%org_id))]
pub async fn get_subscription(
	State(state): State<AppState>,
	Path(org_id): Path<String>,
) -> impl IntoResponse {
	let org_id = parse_id!(BillingErrorResponse, parse_org_id(&org_id));

	let organization = match state.org_repo.get_org_by_id(&org_id).await {
		Ok(Some(organization)) => organization,
		Ok(None) => {
			return not_found::<BillingErrorResponse>("Organization not found.").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, %org_id, "Failed to load organization");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	let occupied = match state.org_user_repo.count_seats_taken(&org_id).await {
		Ok(count) => count,
		Err(e) => {
			tracing::error!(error = %e, %org_id, "Failed to count seats");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(SubscriptionResponse::from_organization(&organization, occupied)),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/subscription",
    params(
        ("org_id" = String, Path, description = "Organization ID")
    ),
    request_body = SubscriptionUpdateRequest,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Policy rejected the change", body = BillingErrorResponse),
        (status = 404, description = "Organization not found", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
/// Adjust seats and the autoscale ceiling.
///
/// The seat policy decides whether the change is allowed; its reason is
/// returned verbatim on rejection.
#[tracing::instrument(skip(state, payload), fields(%org_id, seat_adjustment = payload.seat_adjustment))]
pub async fn update_subscription(
	State(state): State<AppState>,
	Path(org_id): Path<String>,
	Json(payload): Json<SubscriptionUpdateRequest>,
) -> impl IntoResponse {
	let org_id = parse_id!(BillingErrorResponse, parse_org_id(&org_id));

	let update = payload.to_organization_update(org_id);
	let organization = match state.subscription_command.update_subscription(update).await {
		Ok(organization) => organization,
		Err(e) => return billing_error_response(e),
	};

	let occupied = match state.org_user_repo.count_seats_taken(&org_id).await {
		Ok(count) => count,
		Err(e) => {
			tracing::error!(error = %e, %org_id, "Failed to count seats");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(SubscriptionResponse::from_organization(&organization, occupied)),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/users/invite",
    params(
        ("org_id" = String, Path, description = "Organization ID")
    ),
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "User invited", body = InviteUserResponse),
        (status = 400, description = "Invalid email or seat limit reached", body = BillingErrorResponse),
        (status = 404, description = "Organization not found", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
/// Invite a member, autoscaling seats when the plan allows it.
#[tracing::instrument(skip(state, payload), fields(%org_id))]
pub async fn invite_user(
	State(state): State<AppState>,
	Path(org_id): Path<String>,
	Json(payload): Json<InviteUserRequest>,
) -> impl IntoResponse {
	let org_id = parse_id!(BillingErrorResponse, parse_org_id(&org_id));

	if !is_valid_email(&payload.email) {
		return bad_request::<BillingErrorResponse>("invalid_email", "Invalid email address.")
			.into_response();
	}

	let organization = match state.org_repo.get_org_by_id(&org_id).await {
		Ok(Some(organization)) => organization,
		Ok(None) => {
			return not_found::<BillingErrorResponse>("Organization not found.").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, %org_id, "Failed to load organization");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	let seats_added = match state
		.subscription_command
		.auto_add_seats(&organization, 1)
		.await
	{
		Ok(added) => added,
		Err(e) => return billing_error_response(e),
	};

	let invited = OrganizationUser::invite(org_id, payload.email.clone(), OrganizationUserType::User);
	if let Err(e) = state.org_user_repo.create_org_user(&invited).await {
		tracing::error!(error = %e, %org_id, "Failed to create organization user");
		return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
	}

	state.events.log(
		EventEntry::builder(
			EventType::OrganizationUserInvited,
			EventActor::System(SystemUser::Api),
		)
		.organization(org_id)
		.organization_user(invited.id)
		.details(json!({"email": payload.email, "seats_added": seats_added}))
		.build(),
	);

	(
		StatusCode::CREATED,
		Json(InviteUserResponse {
			organization_user_id: invited.id.to_string(),
			email: payload.email,
			seats_added,
		}),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/sponsorships/{org_user_id}/resend",
    params(
        ("org_id" = String, Path, description = "Organization ID"),
        ("org_user_id" = String, Path, description = "Sponsoring organization user ID")
    ),
    responses(
        (status = 204, description = "Offer email sent"),
        (status = 400, description = "No valid outstanding offer", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
/// Resend the Families-for-Enterprise offer email.
///
/// Lookups may come back empty; the command turns each missing piece into
/// its guard message and no email leaves on failure.
#[tracing::instrument(skip(state), fields(%org_id, %org_user_id))]
pub async fn resend_sponsorship_offer(
	State(state): State<AppState>,
	Path((org_id, org_user_id)): Path<(String, String)>,
) -> impl IntoResponse {
	let org_id = parse_id!(BillingErrorResponse, parse_org_id(&org_id));
	let org_user_id = parse_id!(BillingErrorResponse, parse_org_user_id(&org_user_id));

	let organization = match state.org_repo.get_org_by_id(&org_id).await {
		Ok(organization) => organization,
		Err(e) => {
			tracing::error!(error = %e, %org_id, "Failed to load organization");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	let org_user = match state.org_user_repo.get_org_user(&org_user_id).await {
		// A seat under another organization must behave exactly like a
		// missing one.
		Ok(org_user) => org_user.filter(|ou| ou.organization_id == org_id),
		Err(e) => {
			tracing::error!(error = %e, %org_user_id, "Failed to load organization user");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	let sponsorship = match state
		.sponsorship_repo
		.get_by_sponsoring_org_user(&org_user_id)
		.await
	{
		Ok(sponsorship) => sponsorship,
		Err(e) => {
			tracing::error!(error = %e, %org_user_id, "Failed to load sponsorship");
			return internal_error::<BillingErrorResponse>("Internal server error.").into_response();
		}
	};

	match state
		.sponsorship_command
		.send_sponsorship_offer(
			organization.as_ref(),
			org_user.as_ref(),
			sponsorship.as_ref(),
		)
		.await
	{
		Ok(()) => StatusCode::NO_CONTENT.into_response(),
		Err(e) => billing_error_response(e),
	}
}
