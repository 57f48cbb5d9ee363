// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod error;

use crate::error::Error;

/// Reads the TOML file at `config_path`, then applies each `*.toml` file in `config_directory_path`
/// on top of it in sorted order.
///
/// A missing config directory is treated as empty.
pub fn read_config<TConfig>(
    config_path: &std::path::Path,
    config_directory_path: &std::path::Path,
) -> Result<TConfig, Error>
where
    TConfig: serde::de::DeserializeOwned,
{
    let config = read_toml(config_path)?;
    apply_patches_and_deserialize(config, config_directory_path)
}

/// Like [`read_config`], except that a missing file at `config_path` is treated as an empty table.
/// Patches in `config_directory_path` are still applied.
pub fn read_config_or_empty<TConfig>(
    config_path: &std::path::Path,
    config_directory_path: &std::path::Path,
) -> Result<TConfig, Error>
where
    TConfig: serde::de::DeserializeOwned,
{
    let config = match read_toml(config_path) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => {
            log::debug!(
                "{} does not exist; starting from an empty config",
                config_path.display()
            );
            toml::Value::Table(Default::default())
        }
        Err(err) => return Err(err),
    };
    apply_patches_and_deserialize(config, config_directory_path)
}

fn apply_patches_and_deserialize<TConfig>(
    mut config: toml::Value,
    config_directory_path: &std::path::Path,
) -> Result<TConfig, Error>
where
    TConfig: serde::de::DeserializeOwned,
{
    match std::fs::read_dir(config_directory_path) {
        Ok(entries) => {
            let mut patch_paths = vec![];
            for entry in entries {
                let entry = entry.map_err(|err| {
                    Error::ReadConfig(Some(config_directory_path.to_owned()), Box::new(err))
                })?;

                let entry_file_type = entry.file_type().map_err(|err| {
                    Error::ReadConfig(Some(config_directory_path.to_owned()), Box::new(err))
                })?;
                if !entry_file_type.is_file() {
                    continue;
                }

                let patch_path = entry.path();
                if patch_path.extension().and_then(std::ffi::OsStr::to_str) != Some("toml") {
                    continue;
                }

                patch_paths.push(patch_path);
            }
            patch_paths.sort();

            for patch_path in patch_paths {
                log::debug!("applying config patch {}", patch_path.display());
                let patch = read_toml(&patch_path)?;
                merge_toml(&mut config, patch);
            }
        }

        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),

        Err(err) => {
            return Err(Error::ReadConfig(
                Some(config_directory_path.to_owned()),
                Box::new(err),
            ))
        }
    }

    let config: TConfig = config
        .try_into()
        .map_err(|err| Error::ReadConfig(None, Box::new(err)))?;

    Ok(config)
}

fn read_toml(path: &std::path::Path) -> Result<toml::Value, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|err| Error::ReadConfig(Some(path.to_owned()), Box::new(err)))?;
    let value = toml::from_str(&contents)
        .map_err(|err| Error::ReadConfig(Some(path.to_owned()), Box::new(err)))?;
    Ok(value)
}

/// Tables merge key by key, arrays concatenate, and any other patch value replaces the base.
/// A patch cannot remove a key.
fn merge_toml(base: &mut toml::Value, patch: toml::Value) {
    match (base, patch) {
        (toml::Value::Table(base), toml::Value::Table(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }

        (toml::Value::Array(base), toml::Value::Array(patch)) => base.extend(patch),

        (base, patch) => *base = patch,
    }
}
