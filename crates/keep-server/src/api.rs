// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use keep_server_billing::{
	SendSponsorshipOfferCommand, SubscriptionAccessPolicies, UpdateSubscriptionCommand,
};
use keep_server_config::ServerConfig;
use keep_server_db::{
	GroupRepository, OrganizationUserRepository, OrgRepository, SponsorshipRepository,
};
use keep_server_email::{MailService, NoopMailService, SmtpClient, SmtpMailService};
use keep_server_events::{EventService, SqliteEventSink, TracingEventSink};
use keep_server_scim::handlers::groups::ScimState;
use keep_server_scim::{scim_routes, GroupProvisioningService};
use sqlx::SqlitePool;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub org_repo: Arc<OrgRepository>,
	pub org_user_repo: Arc<OrganizationUserRepository>,
	pub group_repo: Arc<GroupRepository>,
	pub sponsorship_repo: Arc<SponsorshipRepository>,
	pub events: Arc<EventService>,
	pub mail_service: Arc<dyn MailService>,
	pub subscription_command: Arc<UpdateSubscriptionCommand>,
	pub sponsorship_command: Arc<SendSponsorshipOfferCommand>,
	pub base_url: String,
	pub pool: SqlitePool,
}

/// Creates the application state, initializing optional components.
pub async fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let org_repo = Arc::new(OrgRepository::new(pool.clone()));
	let org_user_repo = Arc::new(OrganizationUserRepository::new(pool.clone()));
	let group_repo = Arc::new(GroupRepository::new(pool.clone()));
	let sponsorship_repo = Arc::new(SponsorshipRepository::new(pool.clone()));

	let events = Arc::new(EventService::new(
		10_000,
		vec![
			Arc::new(SqliteEventSink::new(pool.clone())),
			Arc::new(TracingEventSink),
		],
	));

	let mail_service: Arc<dyn MailService> = match &config.smtp {
		Some(smtp) => {
			let smtp_config = keep_server_email::SmtpConfig {
				host: smtp.host.clone(),
				port: smtp.port,
				username: smtp.username.clone(),
				password: smtp.password.clone(),
				from_address: smtp.from_address.clone(),
				from_name: smtp.from_name.clone(),
				use_tls: smtp.use_tls,
			};
			match SmtpClient::new(smtp_config) {
				Ok(client) => Arc::new(SmtpMailService::new(client)),
				Err(e) => {
					tracing::warn!(error = %e, "SMTP client init failed, mail dispatch disabled");
					Arc::new(NoopMailService)
				}
			}
		}
		None => Arc::new(NoopMailService),
	};

	let policies = SubscriptionAccessPolicies::new(config.billing.self_hosted);
	let subscription_command = Arc::new(UpdateSubscriptionCommand::new(
		org_repo.clone(),
		org_user_repo.clone(),
		policies,
		events.clone(),
	));
	let sponsorship_command = Arc::new(SendSponsorshipOfferCommand::new(
		mail_service.clone(),
		events.clone(),
	));

	AppState {
		org_repo,
		org_user_repo,
		group_repo,
		sponsorship_repo,
		events,
		mail_service,
		subscription_command,
		sponsorship_command,
		base_url: config.http.base_url.clone(),
		pool,
	}
}

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::billing::get_subscription,
		routes::billing::update_subscription,
		routes::billing::invite_user,
		routes::billing::resend_sponsorship_offer,
	),
	components(schemas(
		routes::health::HealthResponse,
		keep_server_api::billing::SubscriptionResponse,
		keep_server_api::billing::SubscriptionUpdateRequest,
		keep_server_api::billing::InviteUserRequest,
		keep_server_api::billing::InviteUserResponse,
		keep_server_api::billing::BillingErrorResponse,
	)),
	tags(
		(name = "health", description = "Liveness probes"),
		(name = "billing", description = "Subscription and seat management")
	)
)]
struct ApiDoc;

/// Assemble the full router: REST API, SCIM (when enabled) and docs.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
	let mut router = Router::new()
		.route("/health", get(routes::health::health))
		.route(
			"/api/orgs/{org_id}/subscription",
			get(routes::billing::get_subscription).post(routes::billing::update_subscription),
		)
		.route(
			"/api/orgs/{org_id}/users/invite",
			post(routes::billing::invite_user),
		)
		.route(
			"/api/orgs/{org_id}/sponsorships/{org_user_id}/resend",
			post(routes::billing::resend_sponsorship_offer),
		)
		.with_state(state.clone());

	if config.scim.enabled {
		let provisioning = GroupProvisioningService::new(
			state.org_repo.clone(),
			state.group_repo.clone(),
			state.org_user_repo.clone(),
			state.events.clone(),
		);
		let scim_state = ScimState {
			provisioning: Arc::new(provisioning),
			base_url: state.base_url.clone(),
		};
		router = router.nest(
			"/scim/v2/{org_id}",
			scim_routes(config.scim.token.clone(), scim_state),
		);
		tracing::info!("SCIM endpoint mounted at /scim/v2/{{organization_id}}");
	}

	router
		.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		)
		.layer(TraceLayer::new_for_http())
}
