// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms, warnings)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
	clippy::must_use_candidate,
)]

/// The cryptographic operations a key is intended for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub enum KeyUsage {
	#[serde(rename = "ENCRYPT_DECRYPT")]
	EncryptDecrypt,
}

impl KeyUsage {
	pub const ALL: &'static [KeyUsage] = &[KeyUsage::EncryptDecrypt];

	pub fn as_str(self) -> &'static str {
		match self {
			KeyUsage::EncryptDecrypt => "ENCRYPT_DECRYPT",
		}
	}
}

impl std::fmt::Display for KeyUsage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for KeyUsage {
	type Err = UnknownKeyUsage;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		KeyUsage::ALL.iter()
			.copied()
			.find(|key_usage| key_usage.as_str() == s)
			.ok_or_else(|| UnknownKeyUsage(s.to_owned()))
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownKeyUsage(pub String);

impl std::fmt::Display for UnknownKeyUsage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "unknown key usage {:?}", self.0)
	}
}

impl std::error::Error for UnknownKeyUsage {}

#[cfg(test)]
mod tests {
	use super::KeyUsage;

	#[test]
	fn parse_key_usage() {
		assert_eq!("ENCRYPT_DECRYPT".parse::<KeyUsage>(), Ok(KeyUsage::EncryptDecrypt));

		let err = "encrypt_decrypt".parse::<KeyUsage>().unwrap_err();
		assert_eq!(err, super::UnknownKeyUsage("encrypt_decrypt".to_owned()));
		assert_eq!(err.to_string(), r#"unknown key usage "encrypt_decrypt""#);

		assert!("SIGN_VERIFY".parse::<KeyUsage>().is_err());
		assert!("".parse::<KeyUsage>().is_err());
	}

	#[test]
	fn text_form_matches_wire_form() {
		for &key_usage in KeyUsage::ALL {
			let wire = serde_json::to_string(&key_usage).unwrap();
			assert_eq!(wire, format!("{:?}", key_usage.to_string()));

			let parsed: KeyUsage = key_usage.to_string().parse().unwrap();
			assert_eq!(parsed, key_usage);
		}

		assert!(serde_json::from_str::<KeyUsage>(r#""SIGN_VERIFY""#).is_err());
	}
}
