// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms, warnings)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
	clippy::missing_errors_doc,
	clippy::must_use_candidate,
	clippy::return_self_not_must_use,
)]

/// Content type of every request body sent to the key management service.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ApiVersion {
	V2014_11_01,
}

impl std::fmt::Display for ApiVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			ApiVersion::V2014_11_01 => "2014-11-01",
		})
	}
}

impl std::str::FromStr for ApiVersion {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"2014-11-01" => Ok(ApiVersion::V2014_11_01),
			_ => Err(()),
		}
	}
}

pub mod create_key {
	/// Value of the `X-Amz-Target` header that selects this operation.
	pub const TARGET: &str = "TrentService.CreateKey";

	pub const POLICY_MIN_LEN: usize = 1;
	pub const POLICY_MAX_LEN: usize = 131_072;
	pub const DESCRIPTION_MAX_LEN: usize = 8192;

	/// Parameters for creating a new customer master key.
	///
	/// None of the documented limits are enforced here. The service rejects requests that
	/// violate them when they are submitted.
	#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
	pub struct Request {
		/// Key policy to attach to the key. The service applies a default policy if this is absent.
		#[serde(rename = "Policy", default, skip_serializing_if = "Option::is_none")]
		pub policy: Option<String>,

		#[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
		pub description: Option<String>,

		#[serde(rename = "KeyUsage", default, skip_serializing_if = "Option::is_none")]
		pub key_usage: Option<kms_common::KeyUsage>,
	}

	impl Request {
		pub fn policy(&self) -> Option<&str> {
			self.policy.as_deref()
		}

		pub fn set_policy(&mut self, policy: Option<String>) {
			self.policy = policy;
		}

		pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
			self.policy = Some(policy.into());
			self
		}

		pub fn description(&self) -> Option<&str> {
			self.description.as_deref()
		}

		pub fn set_description(&mut self, description: Option<String>) {
			self.description = description;
		}

		pub fn with_description(mut self, description: impl Into<String>) -> Self {
			self.description = Some(description.into());
			self
		}

		pub fn key_usage(&self) -> Option<kms_common::KeyUsage> {
			self.key_usage
		}

		pub fn set_key_usage(&mut self, key_usage: Option<kms_common::KeyUsage>) {
			self.key_usage = key_usage;
		}

		pub fn with_key_usage(mut self, key_usage: kms_common::KeyUsage) -> Self {
			self.key_usage = Some(key_usage);
			self
		}

		/// Lists the fields whose values fall outside the service's documented limits.
		///
		/// Lengths are counted in characters, not bytes.
		pub fn documented_limit_violations(&self) -> Vec<LimitViolation> {
			let mut result = vec![];

			if let Some(policy) = &self.policy {
				let len = policy.chars().count();
				if !(POLICY_MIN_LEN..=POLICY_MAX_LEN).contains(&len) {
					result.push(LimitViolation::Length {
						field: "Policy",
						len,
						min: POLICY_MIN_LEN,
						max: POLICY_MAX_LEN,
					});
				}

				if let Some((position, character)) = policy.chars().enumerate().find(|&(_, c)| !is_policy_char(c)) {
					result.push(LimitViolation::Pattern {
						field: "Policy",
						position,
						character,
					});
				}
			}

			if let Some(description) = &self.description {
				let len = description.chars().count();
				if len > DESCRIPTION_MAX_LEN {
					result.push(LimitViolation::Length {
						field: "Description",
						len,
						min: 0,
						max: DESCRIPTION_MAX_LEN,
					});
				}
			}

			result
		}
	}

	/// Policy documents are limited to tab, LF, CR and U+0020 through U+00FF.
	fn is_policy_char(c: char) -> bool {
		matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{ff}')
	}

	impl std::fmt::Display for Request {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			let fields: [(&str, Option<&dyn std::fmt::Display>); 3] = [
				("Policy", self.policy.as_ref().map(|v| v as &dyn std::fmt::Display)),
				("Description", self.description.as_ref().map(|v| v as &dyn std::fmt::Display)),
				("KeyUsage", self.key_usage.as_ref().map(|v| v as &dyn std::fmt::Display)),
			];

			f.write_str("{")?;
			let mut first = true;
			for (name, value) in fields {
				if let Some(value) = value {
					if !first {
						f.write_str(",")?;
					}
					write!(f, "{}: {}", name, value)?;
					first = false;
				}
			}
			f.write_str("}")
		}
	}

	#[derive(Clone, Copy, Debug, Eq, PartialEq)]
	pub enum LimitViolation {
		Length {
			field: &'static str,
			len: usize,
			min: usize,
			max: usize,
		},

		Pattern {
			field: &'static str,
			position: usize,
			character: char,
		},
	}

	impl LimitViolation {
		pub fn field(&self) -> &'static str {
			match self {
				LimitViolation::Length { field, .. } | LimitViolation::Pattern { field, .. } => *field,
			}
		}
	}

	impl std::fmt::Display for LimitViolation {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			match self {
				LimitViolation::Length { field, len, min, max } => write!(
					f,
					"{} is {} characters long, expected between {} and {}",
					field, len, min, max,
				),

				LimitViolation::Pattern { field, position, character } => write!(
					f,
					"{} contains disallowed character {:?} at position {}",
					field, character, position,
				),
			}
		}
	}
}
