use cavity_quest::level::LevelError;

/// Errors that stop a headless run.
#[derive(Debug)]
pub enum RunnerError {
    /// A file could not be read.
    Io { path: String, source: std::io::Error },
    /// The input script is not valid TOML for a [`crate::script::Script`].
    Script(String),
    /// The level set failed validation.
    Levels(LevelError),
    /// The final snapshot could not be encoded.
    Json(serde_json::Error),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Script(msg) => write!(f, "invalid input script: {msg}"),
            Self::Levels(e) => write!(f, "invalid levels: {e}"),
            Self::Json(e) => write!(f, "snapshot encoding failed: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Levels(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Script(_) => None,
        }
    }
}

impl From<LevelError> for RunnerError {
    fn from(e: LevelError) -> Self {
        Self::Levels(e)
    }
}

impl From<serde_json::Error> for RunnerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
