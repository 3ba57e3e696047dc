use thiserror::Error;

/// Errors raised while configuring grammars and looking up modes.
///
/// Tokenizing itself never fails; malformed source only degrades the
/// highlighting. These errors come from the registration surface.
#[derive(Error, Debug)]
pub enum ModeError {
    #[error("unknown mode or MIME type '{0}'")]
    UnknownMode(String),
    #[error("no mode registered for extension '{0}'")]
    UnknownExtension(String),
    #[error("invalid region pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("pattern alternatives must not be empty")]
    EmptyAlternatives,
    #[error("line {index} is out of range for a buffer of {len} lines")]
    LineOutOfRange { index: usize, len: usize },
}
