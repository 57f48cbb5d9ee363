// Copyright (c) Microsoft. All rights reserved.

#[derive(Debug)]
pub enum Error {
    ReadConfig(
        Option<std::path::PathBuf>,
        Box<dyn std::error::Error + Send + Sync>,
    ),
}

impl Error {
    /// Whether the base config file itself does not exist, as opposed to being unreadable or malformed.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ReadConfig(_, err) => err
                .downcast_ref::<std::io::Error>()
                .map_or(false, |err| err.kind() == std::io::ErrorKind::NotFound),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ReadConfig(Some(path), _) => {
                write!(f, "could not read config from {}", path.display())
            }
            Error::ReadConfig(None, _) => f.write_str("could not read config"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadConfig(_, err) => Some(&**err),
        }
    }
}
