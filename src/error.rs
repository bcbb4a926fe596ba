use thiserror::Error;

// One error type for the whole crate. The counting core never fails;
// only the storage transport, the config file and the settings surface do.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stats data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("could not write config file: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

// Shorthand so signatures read `Result<T>` instead of `Result<T, Error>`
pub type Result<T> = std::result::Result<T, Error>;
