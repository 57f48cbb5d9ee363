// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

/// Filter directives in `env_logger` syntax, e.g. `KMS_LOG=debug` or `KMS_LOG=config_common=debug`.
const LOG_LEVEL_ENV_VAR: &str = "KMS_LOG";

pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .format(|fmt, record| {
            use std::io::Write;

            let (tag, syslog_level) = level_info(record.level());
            let timestamp = fmt.timestamp();
            write!(fmt, "<{}>{} [{}] - ", syslog_level, timestamp, tag)?;

            // Debug and trace lines name the module they came from.
            if record.level() >= log::Level::Debug {
                write!(fmt, "[{}] ", record.target())?;
            }

            writeln!(fmt, "{}", record.args())
        })
        .filter_level(log::LevelFilter::Info)
        .parse_env(LOG_LEVEL_ENV_VAR)
        .try_init()
}

/// The four-character tag and the syslog severity for a log level.
fn level_info(level: log::Level) -> (&'static str, u8) {
    match level {
        log::Level::Error => ("ERR!", 3),
        log::Level::Warn => ("WARN", 4),
        log::Level::Info => ("INFO", 6),
        log::Level::Debug => ("DBUG", 7),
        log::Level::Trace => ("TRCE", 7),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn level_info() {
        let actual: Vec<_> = [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ]
        .into_iter()
        .map(super::level_info)
        .collect();

        assert_eq!(
            actual,
            [
                ("ERR!", 3),
                ("WARN", 4),
                ("INFO", 6),
                ("DBUG", 7),
                ("TRCE", 7),
            ]
        );
    }

    #[test]
    fn second_init_fails() {
        // Whichever call comes first in this process wins; any later call must report the conflict.
        let _ = super::try_init();
        assert!(super::try_init().is_err());
    }
}
