// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers and macros.
//!
//! This module provides common response patterns for HTTP handlers:
//! - Error response helpers (bad_request, not_found, internal_error)
//! - Macros for early-return error handling (parse_id!)
//! - Trait implementations for error response types (impl_api_error_response!)

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::validation::IdParseError;

/// Trait for API error response types that have `error` and `message` fields.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

/// Implement `ApiErrorResponse` for a struct with `error` and `message` fields.
///
/// # Example
///
/// ```ignore
/// impl_api_error_response!(BillingErrorResponse);
/// ```
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
				Self {
					error: error.into(),
					message: message.into(),
				}
			}
		}
	};
}

/// Parse an ID and return early with an error response if parsing fails.
///
/// # Example
///
/// ```ignore
/// let org_id = parse_id!(BillingErrorResponse, parse_org_id(&org_id));
/// ```
#[macro_export]
macro_rules! parse_id {
	($error_ty:ty, $parse_expr:expr) => {
		match $parse_expr {
			Ok(id) => id,
			Err(e) => {
				return $crate::api_response::id_parse_error::<$error_ty>(e).into_response();
			}
		}
	};
}

/// Create a 400 Bad Request response from an IdParseError.
pub fn id_parse_error<T: ApiErrorResponse>(e: IdParseError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 404 Not Found response.
pub fn not_found<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::NOT_FOUND, Json(T::new("not_found", message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", message)),
	)
}
