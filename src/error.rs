use thiserror::Error;

/// Failures of the collaborators that feed the counter:
/// chat history, guild emoji lists and the external corpus.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown guild {0}")]
    UnknownGuild(u64),

    #[error("unknown channel {0}")]
    UnknownChannel(u64),

    #[error("{0}")]
    Other(String),
}

/// Query failures. Every variant except `Source` is an input error and is
/// meant to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("no such dataset {0:?}")]
    UnknownGroup(String),

    /// The group exists but holds no words.
    #[error("target {0} has no words")]
    EmptyGroup(String),

    /// Cross-group fallback found no group that used the word.
    #[error("no one has said {0}")]
    NobodySaid(String),

    #[error("word contains only sanitized chars")]
    EmptyWord,

    #[error("1 or 2 args plz (got {0})")]
    Arity(usize),

    #[error("bad argument {0:?}")]
    BadArgument(String),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl CountError {
    /// `true` for errors caused by what the user typed.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, CountError::Source(_))
    }
}
