// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{middleware, routing::get, Router};
use keep_common_secret::SecretString;

use crate::auth::scim_auth_middleware;
use crate::handlers::groups::{self, ScimState};

/// Build the SCIM router.
///
/// The caller nests this under `/scim/v2/{organization_id}`; the organization
/// capture reaches the handlers as the first path parameter.
pub fn scim_routes(token: Option<SecretString>, state: ScimState) -> Router {
	Router::new()
		.route(
			"/Groups",
			get(groups::list_groups).post(groups::create_group),
		)
		.route(
			"/Groups/{id}",
			get(groups::get_group)
				.put(groups::replace_group)
				.patch(groups::patch_group)
				.delete(groups::delete_group),
		)
		.layer(middleware::from_fn_with_state(token, scim_auth_middleware))
		.with_state(state)
}
