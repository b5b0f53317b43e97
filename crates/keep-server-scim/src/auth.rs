// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Request, State},
	http::StatusCode,
	middleware::Next,
	response::Response,
};
use keep_common_secret::SecretString;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Bearer-token check for the SCIM router.
///
/// Comparison is constant-time; a missing configured token rejects every
/// request rather than opening the endpoint.
pub async fn scim_auth_middleware(
	State(expected_token): State<Option<SecretString>>,
	request: Request,
	next: Next,
) -> Result<Response, StatusCode> {
	let Some(expected) = expected_token else {
		warn!("SCIM auth failed: no token configured");
		return Err(StatusCode::UNAUTHORIZED);
	};

	let auth_header = request
		.headers()
		.get("Authorization")
		.and_then(|h| h.to_str().ok());

	let Some(auth_value) = auth_header else {
		warn!("SCIM auth failed: missing Authorization header");
		return Err(StatusCode::UNAUTHORIZED);
	};

	let Some(bearer) = auth_value.strip_prefix("Bearer ") else {
		warn!("SCIM auth failed: invalid Authorization format");
		return Err(StatusCode::UNAUTHORIZED);
	};
	let token = bearer.trim();

	let expected_bytes = expected.expose().as_bytes();
	let token_bytes = token.as_bytes();

	if expected_bytes.len() != token_bytes.len() {
		warn!("SCIM auth failed: token length mismatch");
		return Err(StatusCode::UNAUTHORIZED);
	}

	if expected_bytes.ct_eq(token_bytes).into() {
		Ok(next.run(request).await)
	} else {
		warn!("SCIM auth failed: invalid token");
		Err(StatusCode::UNAUTHORIZED)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{body::Body, middleware, routing::get, Router};
	use tower::util::ServiceExt;

	fn router(token: Option<SecretString>) -> Router {
		Router::new()
			.route("/probe", get(|| async { "ok" }))
			.layer(middleware::from_fn_with_state(token, scim_auth_middleware))
	}

	fn request(auth: Option<&str>) -> axum::http::Request<Body> {
		let mut builder = axum::http::Request::builder().uri("/probe");
		if let Some(auth) = auth {
			builder = builder.header("Authorization", auth);
		}
		builder.body(Body::empty()).unwrap()
	}

	#[tokio::test]
	async fn no_configured_token_rejects_everything() {
		let response = router(None)
			.oneshot(request(Some("Bearer secret")))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn missing_header_is_unauthorized() {
		let token = Some(SecretString::new("secret".to_string()));
		let response = router(token).oneshot(request(None)).await.unwrap();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn wrong_scheme_is_unauthorized() {
		let token = Some(SecretString::new("secret".to_string()));
		let response = router(token)
			.oneshot(request(Some("Basic secret")))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn wrong_token_is_unauthorized() {
		let token = Some(SecretString::new("secret".to_string()));
		let response = router(token)
			.oneshot(request(Some("Bearer nope")))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn correct_token_passes() {
		let token = Some(SecretString::new("secret".to_string()));
		let response = router(token)
			.oneshot(request(Some("Bearer secret")))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}
}
