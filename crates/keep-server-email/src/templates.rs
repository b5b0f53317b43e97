// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Email bodies.
//!
//! Templates are plain format strings; the volume and variety of mail this
//! server sends does not justify a template engine.

/// Subject and bodies for the Families-for-Enterprise sponsorship offer.
pub fn sponsorship_offer(
	sponsoring_org_name: &str,
	friendly_name: Option<&str>,
) -> (String, String, String) {
	let subject = "Accept Your Free Families Subscription".to_string();
	let vault_label = friendly_name.unwrap_or("your family");

	let html = format!(
		"<p>{sponsoring_org_name} is sponsoring a free Keep Families subscription \
		 for {vault_label}.</p>\
		 <p>Sign in to your personal account and redeem the offer from the \
		 Settings &gt; Sponsorships page.</p>"
	);
	let text = format!(
		"{sponsoring_org_name} is sponsoring a free Keep Families subscription \
		 for {vault_label}.\n\nSign in to your personal account and redeem the \
		 offer from the Settings > Sponsorships page."
	);

	(subject, html, text)
}
