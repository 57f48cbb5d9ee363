// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub const DEFAULT_CONFIG_PATH: &str = "/etc/kms/create-key.toml";
pub const DEFAULT_CONFIG_DIRECTORY_PATH: &str = "/etc/kms/create-key.d";

/// Default parameters for new keys.
#[derive(Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Inline key policy document. Mutually exclusive with `policy_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Path of a file containing the key policy document. Mutually exclusive with `policy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_file: Option<std::path::PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<kms_common::KeyUsage>,
}

impl Config {
    /// Resolves the policy document from either the inline value or the policy file.
    pub fn policy(&self) -> Result<Option<String>, Error> {
        match (&self.policy, &self.policy_file) {
            (Some(_), Some(_)) => Err(Error::AmbiguousPolicy),
            (Some(policy), None) => Ok(Some(policy.clone())),
            (None, Some(policy_file)) => {
                let policy = std::fs::read_to_string(policy_file)
                    .map_err(|err| Error::ReadPolicyFile(policy_file.clone(), err))?;
                Ok(Some(policy))
            }
            (None, None) => Ok(None),
        }
    }

    pub fn to_request(&self) -> Result<kms_common_http::create_key::Request, Error> {
        Ok(kms_common_http::create_key::Request {
            policy: self.policy()?,
            description: self.description.clone(),
            key_usage: self.key_usage,
        })
    }
}

#[derive(Debug)]
pub enum Error {
    AmbiguousPolicy,
    ReadPolicyFile(std::path::PathBuf, std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::AmbiguousPolicy => {
                f.write_str("only one of `policy` and `policy_file` may be specified")
            }
            Error::ReadPolicyFile(path, _) => {
                write!(f, "could not read policy file {}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AmbiguousPolicy => None,
            Error::ReadPolicyFile(_, err) => Some(err),
        }
    }
}
