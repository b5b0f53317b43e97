// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use super::ast::{CompareOp, Filter, LogicalOp};
use crate::error::ScimError;
use winnow::ascii::{alpha1, alphanumeric1, space0, space1};
use winnow::combinator::{alt, repeat};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

pub struct FilterParser;

impl FilterParser {
	/// Parse a SCIM filter string into a [`Filter`] tree.
	pub fn parse(input: &str) -> Result<Filter, ScimError> {
		or_expr
			.parse(input.trim())
			.map_err(|e| ScimError::InvalidFilter(format!("{:?}", e)))
	}
}

fn or_expr(input: &mut &str) -> Result<Filter, ContextError> {
	let mut result = and_expr(input)?;

	while let Some(right) = trailing_operand(input, "or", and_expr)? {
		result = Filter::Logical {
			op: LogicalOp::Or,
			left: Box::new(result),
			right: Box::new(right),
		};
	}

	Ok(result)
}

fn and_expr(input: &mut &str) -> Result<Filter, ContextError> {
	let mut result = unary_expr(input)?;

	while let Some(right) = trailing_operand(input, "and", unary_expr)? {
		result = Filter::Logical {
			op: LogicalOp::And,
			left: Box::new(result),
			right: Box::new(right),
		};
	}

	Ok(result)
}

/// Try to consume ` <keyword> <operand>`; rewinds and returns `None` when the
/// keyword is not next.
fn trailing_operand(
	input: &mut &str,
	keyword: &'static str,
	operand: fn(&mut &str) -> Result<Filter, ContextError>,
) -> Result<Option<Filter>, ContextError> {
	let checkpoint = *input;
	let space_result: Result<&str, ContextError> = space1.parse_next(input);
	if space_result.is_err() {
		*input = checkpoint;
		return Ok(None);
	}
	let keyword_result: Result<&str, ContextError> =
		winnow::ascii::Caseless(keyword).parse_next(input);
	if keyword_result.is_err() {
		*input = checkpoint;
		return Ok(None);
	}
	let _: &str = space1.parse_next(input)?;
	operand(input).map(Some)
}

fn unary_expr(input: &mut &str) -> Result<Filter, ContextError> {
	let checkpoint = *input;
	let not_result: Result<&str, ContextError> = winnow::ascii::Caseless("not").parse_next(input);
	if not_result.is_ok() {
		let space_result: Result<&str, ContextError> = space1.parse_next(input);
		if space_result.is_ok() {
			let inner = atom(input)?;
			return Ok(Filter::Not(Box::new(inner)));
		}
	}
	*input = checkpoint;
	atom(input)
}

fn atom(input: &mut &str) -> Result<Filter, ContextError> {
	let _: &str = space0.parse_next(input)?;

	if input.starts_with('(') {
		let _ = '('.parse_next(input)?;
		let _: &str = space0.parse_next(input)?;
		let inner = or_expr(input)?;
		let _: &str = space0.parse_next(input)?;
		let _ = ')'.parse_next(input)?;
		return Ok(Filter::Group(Box::new(inner)));
	}

	comparison(input)
}

fn comparison(input: &mut &str) -> Result<Filter, ContextError> {
	let attr_path = attr_path(input)?;
	let _: &str = space1.parse_next(input)?;

	let checkpoint = *input;
	let pr_result: Result<&str, ContextError> = winnow::ascii::Caseless("pr").parse_next(input);
	if pr_result.is_ok() {
		return Ok(Filter::Compare {
			attr_path,
			op: CompareOp::Pr,
			value: None,
		});
	}
	*input = checkpoint;

	let op = compare_op(input)?;
	let _: &str = space1.parse_next(input)?;
	let value = comparison_value(input)?;

	Ok(Filter::Compare {
		attr_path,
		op,
		value: Some(value),
	})
}

fn attr_path(input: &mut &str) -> Result<String, ContextError> {
	let first: &str = alpha1.parse_next(input)?;
	let rest: String = repeat(
		0..,
		alt((
			alphanumeric1,
			".".map(|_: &str| "."),
			":".map(|_: &str| ":"),
		)),
	)
	.fold(String::new, |mut acc, s: &str| {
		acc.push_str(s);
		acc
	})
	.parse_next(input)?;
	Ok(format!("{}{}", first, rest))
}

fn compare_op(input: &mut &str) -> Result<CompareOp, ContextError> {
	alt((
		winnow::ascii::Caseless("eq").map(|_| CompareOp::Eq),
		winnow::ascii::Caseless("ne").map(|_| CompareOp::Ne),
		winnow::ascii::Caseless("co").map(|_| CompareOp::Co),
		winnow::ascii::Caseless("sw").map(|_| CompareOp::Sw),
		winnow::ascii::Caseless("ew").map(|_| CompareOp::Ew),
		winnow::ascii::Caseless("gt").map(|_| CompareOp::Gt),
		winnow::ascii::Caseless("ge").map(|_| CompareOp::Ge),
		winnow::ascii::Caseless("lt").map(|_| CompareOp::Lt),
		winnow::ascii::Caseless("le").map(|_| CompareOp::Le),
	))
	.parse_next(input)
}

fn comparison_value(input: &mut &str) -> Result<String, ContextError> {
	if input.starts_with('"') {
		let _ = '"'.parse_next(input)?;
		let value: String = take_while(0.., |c| c != '"').parse_next(input)?.to_string();
		let _ = '"'.parse_next(input)?;
		Ok(value)
	} else {
		let value: String = take_while(1.., |c: char| !c.is_whitespace() && c != ')')
			.parse_next(input)?
			.to_string();
		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn parses_display_name_eq() {
		let filter = FilterParser::parse(r#"displayName eq "Engineering""#).unwrap();
		assert_eq!(
			filter,
			Filter::Compare {
				attr_path: "displayName".to_string(),
				op: CompareOp::Eq,
				value: Some("Engineering".to_string()),
			}
		);
	}

	#[test]
	fn parses_value_with_spaces() {
		let filter = FilterParser::parse(r#"displayName eq "Sales and Support""#).unwrap();
		assert_eq!(
			filter,
			Filter::Compare {
				attr_path: "displayName".to_string(),
				op: CompareOp::Eq,
				value: Some("Sales and Support".to_string()),
			}
		);
	}

	#[test]
	fn parses_external_id_filter() {
		let filter = FilterParser::parse(r#"externalId eq "grp-42""#).unwrap();
		assert!(matches!(
			filter,
			Filter::Compare {
				op: CompareOp::Eq,
				..
			}
		));
	}

	#[test]
	fn parses_and_or_precedence() {
		// `a or b and c` groups as `a or (b and c)`.
		let filter = FilterParser::parse(
			r#"displayName eq "A" or displayName eq "B" and externalId pr"#,
		)
		.unwrap();
		match filter {
			Filter::Logical {
				op: LogicalOp::Or,
				right,
				..
			} => assert!(matches!(
				*right,
				Filter::Logical {
					op: LogicalOp::And,
					..
				}
			)),
			other => panic!("expected top-level or, got {other:?}"),
		}
	}

	#[test]
	fn parses_not_and_groups() {
		let filter =
			FilterParser::parse(r#"not (displayName eq "A" or displayName eq "B")"#).unwrap();
		assert!(matches!(filter, Filter::Not(_)));
	}

	#[test]
	fn parses_presence() {
		let filter = FilterParser::parse("externalId pr").unwrap();
		assert!(matches!(
			filter,
			Filter::Compare {
				op: CompareOp::Pr,
				value: None,
				..
			}
		));
	}

	#[test]
	fn parses_unquoted_value() {
		let filter = FilterParser::parse("active eq true").unwrap();
		assert_eq!(
			filter,
			Filter::Compare {
				attr_path: "active".to_string(),
				op: CompareOp::Eq,
				value: Some("true".to_string()),
			}
		);
	}

	#[test]
	fn rejects_garbage() {
		assert!(FilterParser::parse("displayName eq").is_err());
		assert!(FilterParser::parse("eq \"x\"").is_err());
		assert!(FilterParser::parse("(displayName eq \"x\"").is_err());
	}

	proptest! {
		#[test]
		fn quoted_eq_filters_round_trip(value in "[a-zA-Z0-9 _-]{0,40}") {
			let input = format!(r#"displayName eq "{value}""#);
			let filter = FilterParser::parse(&input).unwrap();
			prop_assert_eq!(
				filter,
				Filter::Compare {
					attr_path: "displayName".to_string(),
					op: CompareOp::Eq,
					value: Some(value),
				}
			);
		}

		#[test]
		fn parser_never_panics(input in ".{0,80}") {
			let _ = FilterParser::parse(&input);
		}
	}
}
