// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM Group handlers.
//!
//! Routes are mounted under `/scim/v2/{organization_id}`; the organization id
//! is the first path capture on every route.

use std::sync::Arc;

use axum::{
	extract::{Path, Query, State},
	http::{header, StatusCode},
	Json,
};
use keep_scim::{FilterParser, ListResponse, PatchRequest, ScimGroup};
use keep_server_db::{GroupId, OrgId};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ScimApiError;
use crate::mapping::group_to_scim;
use crate::provisioning::GroupProvisioningService;

/// State shared by the SCIM handlers.
#[derive(Clone)]
pub struct ScimState {
	pub provisioning: Arc<GroupProvisioningService>,
	/// External base URL, used for `Location` headers on create.
	pub base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsQuery {
	#[serde(default = "default_start_index")]
	pub start_index: i64,
	#[serde(default = "default_count")]
	pub count: i64,
	pub filter: Option<String>,
}

fn default_start_index() -> i64 {
	1
}
fn default_count() -> i64 {
	100
}

pub async fn list_groups(
	State(state): State<ScimState>,
	Path(org_id): Path<Uuid>,
	Query(query): Query<ListGroupsQuery>,
) -> Result<Json<ListResponse<ScimGroup>>, ScimApiError> {
	let org_id = OrgId::new(org_id);

	let parsed_filter = match &query.filter {
		Some(filter) => Some(FilterParser::parse(filter)?),
		None => None,
	};

	let start_index = query.start_index.max(1);
	let count = query.count.clamp(0, 1000);

	let (page, total) = state
		.provisioning
		.list_groups(&org_id, parsed_filter.as_ref(), start_index, count)
		.await?;

	let resources = page
		.iter()
		.map(|(group, members)| group_to_scim(group, members))
		.collect();

	Ok(Json(ListResponse::new(resources, total, start_index, count)))
}

pub async fn get_group(
	State(state): State<ScimState>,
	Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScimGroup>, ScimApiError> {
	let (group, members) = state
		.provisioning
		.get_group(&OrgId::new(org_id), &GroupId::new(id))
		.await?;
	Ok(Json(group_to_scim(&group, &members)))
}

pub async fn create_group(
	State(state): State<ScimState>,
	Path(org_id): Path<Uuid>,
	Json(payload): Json<ScimGroup>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ScimGroup>), ScimApiError> {
	let org_id = OrgId::new(org_id);
	let (group, members) = state.provisioning.create_group(&org_id, &payload).await?;

	let location = format!(
		"{}/scim/v2/{}/Groups/{}",
		state.base_url.trim_end_matches('/'),
		org_id,
		group.id
	);

	Ok((
		StatusCode::CREATED,
		[(header::LOCATION, location)],
		Json(group_to_scim(&group, &members)),
	))
}

pub async fn replace_group(
	State(state): State<ScimState>,
	Path((org_id, id)): Path<(Uuid, Uuid)>,
	Json(payload): Json<ScimGroup>,
) -> Result<Json<ScimGroup>, ScimApiError> {
	let (group, members) = state
		.provisioning
		.replace_group(&OrgId::new(org_id), &GroupId::new(id), &payload)
		.await?;
	Ok(Json(group_to_scim(&group, &members)))
}

pub async fn patch_group(
	State(state): State<ScimState>,
	Path((org_id, id)): Path<(Uuid, Uuid)>,
	Json(patch): Json<PatchRequest>,
) -> Result<StatusCode, ScimApiError> {
	state
		.provisioning
		.patch_group(&OrgId::new(org_id), &GroupId::new(id), &patch)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_group(
	State(state): State<ScimState>,
	Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ScimApiError> {
	state
		.provisioning
		.delete_group(&OrgId::new(org_id), &GroupId::new(id))
		.await?;
	Ok(StatusCode::NO_CONTENT)
}
