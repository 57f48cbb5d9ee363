// Copyright (c) Microsoft. All rights reserved.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use kms_common::KeyUsage;
use kms_common_http::create_key::Request;
use kms_create_key_config::Config;

#[derive(clap::Args)]
pub(crate) struct Options {
    /// Config file with default key parameters.
    ///
    /// Defaults to /etc/kms/create-key.toml. The default file may be absent; an explicitly
    /// specified one may not.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of *.toml files applied on top of the config file.
    #[arg(
        long,
        value_name = "DIR",
        default_value = kms_create_key_config::DEFAULT_CONFIG_DIRECTORY_PATH
    )]
    config_dir: PathBuf,

    /// Key policy document.
    #[arg(long, value_name = "POLICY", conflicts_with = "policy_file")]
    policy: Option<String>,

    /// File containing the key policy document.
    #[arg(long, value_name = "FILE")]
    policy_file: Option<PathBuf>,

    /// Description of the key.
    #[arg(long, value_name = "DESCRIPTION")]
    description: Option<String>,

    /// Intended use of the key. Only "ENCRYPT_DECRYPT" is currently recognized.
    #[arg(long, value_name = "KEY_USAGE")]
    key_usage: Option<KeyUsage>,

    /// Output format.
    #[arg(
        short,
        long,
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Json
    )]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// The request body as sent on the wire.
    Json,
    /// A human-readable summary of the fields that are set.
    Text,
    /// The request headers followed by the body.
    Http,
}

pub(crate) fn run(options: Options) -> Result<()> {
    let config = load_config(
        options.config.as_deref(),
        Path::new(kms_create_key_config::DEFAULT_CONFIG_PATH),
        &options.config_dir,
    )?;
    let request = build_request(&config, &options)?;

    for violation in request.documented_limit_violations() {
        log::warn!(
            "{}; the service is likely to reject this request",
            violation
        );
    }

    log::debug!(
        "rendering {} request for API version {}",
        kms_common_http::create_key::TARGET,
        kms_common_http::ApiVersion::V2014_11_01,
    );

    let mut stdout = std::io::stdout().lock();
    render(&request, options.output, &mut stdout).context("could not output to stdout")?;

    Ok(())
}

fn load_config(
    config_path: Option<&Path>,
    default_config_path: &Path,
    config_directory_path: &Path,
) -> Result<Config> {
    let config = if let Some(config_path) = config_path {
        config_common::read_config(config_path, config_directory_path)
    } else {
        config_common::read_config_or_empty(default_config_path, config_directory_path)
    };

    config.context("could not load create-key config")
}

fn build_request(config: &Config, options: &Options) -> Result<Request> {
    let policy = if let Some(policy) = &options.policy {
        Some(policy.clone())
    } else if let Some(policy_file) = &options.policy_file {
        let policy = std::fs::read_to_string(policy_file)
            .with_context(|| format!("could not read policy file {}", policy_file.display()))?;
        Some(policy)
    } else {
        config.policy().context("could not resolve configured policy")?
    };

    let mut request = Request::default();
    request.set_policy(policy);
    request.set_description(
        options
            .description
            .clone()
            .or_else(|| config.description.clone()),
    );
    request.set_key_usage(options.key_usage.or(config.key_usage));

    Ok(request)
}

fn render<W>(request: &Request, output: OutputFormat, mut w: W) -> Result<()>
where
    W: Write,
{
    match output {
        OutputFormat::Json => {
            serde_json::to_writer(&mut w, request)?;
            writeln!(w)?;
        }

        OutputFormat::Text => writeln!(w, "{}", request)?,

        OutputFormat::Http => {
            writeln!(w, "X-Amz-Target: {}", kms_common_http::create_key::TARGET)?;
            writeln!(w, "Content-Type: {}", kms_common_http::CONTENT_TYPE)?;
            writeln!(w)?;
            serde_json::to_writer(&mut w, request)?;
            writeln!(w)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use kms_common::KeyUsage;
    use kms_common_http::create_key::Request;
    use kms_create_key_config::Config;

    use super::OutputFormat;

    fn parse(args: &[&str]) -> super::Options {
        let options = crate::Options::try_parse_from(
            std::iter::once("kmsctl")
                .chain(std::iter::once("create-key"))
                .chain(args.iter().copied()),
        )
        .unwrap();
        match options {
            crate::Options::CreateKey(options) => options,
        }
    }

    fn render_to_string(request: &Request, output: OutputFormat) -> String {
        let mut buf = vec![];
        super::render(request, output, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parse_options() {
        let options = parse(&[]);
        assert_eq!(options.output, OutputFormat::Json);
        assert_eq!(options.config, None);
        assert_eq!(
            options.config_dir,
            std::path::Path::new(kms_create_key_config::DEFAULT_CONFIG_DIRECTORY_PATH)
        );

        let options = parse(&["--key-usage", "ENCRYPT_DECRYPT", "-o", "text"]);
        assert_eq!(options.key_usage, Some(KeyUsage::EncryptDecrypt));
        assert_eq!(options.output, OutputFormat::Text);

        let args = ["kmsctl", "create-key", "--key-usage", "SIGN_VERIFY"];
        assert!(crate::Options::try_parse_from(args).is_err());

        let args = ["kmsctl", "create-key", "--policy", "{}", "--policy-file", "p.json"];
        assert!(crate::Options::try_parse_from(args).is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            policy: Some("config policy".to_owned()),
            description: Some("config description".to_owned()),
            key_usage: Some(KeyUsage::EncryptDecrypt),
            ..Default::default()
        };

        let request = super::build_request(&config, &parse(&[])).unwrap();
        assert_eq!(
            request,
            Request::default()
                .with_policy("config policy")
                .with_description("config description")
                .with_key_usage(KeyUsage::EncryptDecrypt)
        );

        let options = parse(&["--policy", "flag policy", "--description", "flag description"]);
        let request = super::build_request(&config, &options).unwrap();
        assert_eq!(
            request,
            Request::default()
                .with_policy("flag policy")
                .with_description("flag description")
                .with_key_usage(KeyUsage::EncryptDecrypt)
        );
    }

    #[test]
    fn policy_file_flag_skips_configured_policy() {
        let dir = tempfile::tempdir().unwrap();
        let policy_file = dir.path().join("policy.json");
        std::fs::write(&policy_file, r#"{"Statement":[]}"#).unwrap();

        // The configured policy is ambiguous, but it is never consulted.
        let config = Config {
            policy: Some("{}".to_owned()),
            policy_file: Some(dir.path().join("missing.json")),
            ..Default::default()
        };

        let options = parse(&["--policy-file", policy_file.to_str().unwrap()]);
        let request = super::build_request(&config, &options).unwrap();
        assert_eq!(request, Request::default().with_policy(r#"{"Statement":[]}"#));

        let options = parse(&[]);
        assert!(super::build_request(&config, &options).is_err());

        let options = parse(&["--policy-file", dir.path().join("missing.json").to_str().unwrap()]);
        assert!(super::build_request(&Config::default(), &options).is_err());
    }

    #[test]
    fn load_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("create-key.toml");
        let default_config_path = dir.path().join("default.toml");
        let config_directory_path = dir.path().join("create-key.d");

        assert!(super::load_config(
            Some(&config_path),
            &default_config_path,
            &config_directory_path
        )
        .is_err());

        std::fs::write(&config_path, "description = \"base\"\n").unwrap();
        std::fs::create_dir(&config_directory_path).unwrap();
        std::fs::write(
            config_directory_path.join("00-usage.toml"),
            "key_usage = \"ENCRYPT_DECRYPT\"\n",
        )
        .unwrap();

        let config = super::load_config(
            Some(&config_path),
            &default_config_path,
            &config_directory_path,
        )
        .unwrap();
        assert_eq!(
            config,
            Config {
                description: Some("base".to_owned()),
                key_usage: Some(KeyUsage::EncryptDecrypt),
                ..Default::default()
            }
        );
    }

    #[test]
    fn load_config_missing_default() {
        let dir = tempfile::tempdir().unwrap();
        let default_config_path = dir.path().join("create-key.toml");
        let config_directory_path = dir.path().join("create-key.d");

        let config =
            super::load_config(None, &default_config_path, &config_directory_path).unwrap();
        assert_eq!(config, Config::default());

        // Drop-in patches still apply when the default base file is absent.
        std::fs::create_dir(&config_directory_path).unwrap();
        std::fs::write(
            config_directory_path.join("00-usage.toml"),
            "key_usage = \"ENCRYPT_DECRYPT\"\n",
        )
        .unwrap();

        let config =
            super::load_config(None, &default_config_path, &config_directory_path).unwrap();
        assert_eq!(
            config,
            Config {
                key_usage: Some(KeyUsage::EncryptDecrypt),
                ..Default::default()
            }
        );

        std::fs::write(&default_config_path, "description = \"default\"\n").unwrap();
        let config =
            super::load_config(None, &default_config_path, &config_directory_path).unwrap();
        assert_eq!(
            config,
            Config {
                description: Some("default".to_owned()),
                key_usage: Some(KeyUsage::EncryptDecrypt),
                ..Default::default()
            }
        );

        std::fs::write(&default_config_path, "key_usage = \"SIGN_VERIFY\"\n").unwrap();
        assert!(super::load_config(None, &default_config_path, &config_directory_path).is_err());
    }

    #[test]
    fn render_outputs() {
        let request = Request::default()
            .with_description("test key")
            .with_key_usage(KeyUsage::EncryptDecrypt);

        assert_eq!(
            render_to_string(&request, OutputFormat::Json),
            "{\"Description\":\"test key\",\"KeyUsage\":\"ENCRYPT_DECRYPT\"}\n"
        );

        assert_eq!(
            render_to_string(&request, OutputFormat::Text),
            "{Description: test key,KeyUsage: ENCRYPT_DECRYPT}\n"
        );

        assert_eq!(
            render_to_string(&Request::default(), OutputFormat::Http),
            "X-Amz-Target: TrentService.CreateKey\nContent-Type: application/x-amz-json-1.1\n\n{}\n"
        );
    }
}
