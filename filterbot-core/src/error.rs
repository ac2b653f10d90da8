use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single wizard turn. All of them are recovered locally by rendering to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Query too short: {0} characters")]
    InvalidQuery(usize),

    #[error("Geocoding service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Event has no user identity")]
    MissingUserIdentity,

    /// The stored context does not carry the fields its step implies.
    #[error("Inconsistent wizard context: {0}")]
    InconsistentContext(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
