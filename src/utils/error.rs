use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Setup-time failures: configuration loading, validation and client construction.
#[derive(Error, Debug)]
pub enum PricerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, PricerError>;

/// Failure reported by a [`ListingsSource`](crate::domain::ports::ListingsSource).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("unexpected status {status} - {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(Box::new(err))
    }
}

/// None of the known listings shapes decoded into a non-empty listing set.
/// The raw body is kept for diagnostics.
#[derive(Error, Debug)]
#[error("unknown listings response shape - body: {body}")]
pub struct ShapeError {
    pub body: String,
}

impl ShapeError {
    pub fn from_bytes(body: &[u8]) -> Self {
        Self {
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    UnexpectedStatus,
    UnknownShape,
    NoActiveListing,
    ValidationFailed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Where in a resolution the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FirstPage,
    NextPage { offset: u64 },
    Selection,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::FirstPage => write!(f, "first page"),
            Stage::NextPage { offset } => write!(f, "page at offset {}", offset),
            Stage::Selection => write!(f, "selection"),
            Stage::Validation => write!(f, "validation"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveFailure {
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("unexpected status {status} - {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error(transparent)]
    UnknownShape(#[from] ShapeError),

    #[error("no active listing with a positive price")]
    NoActiveListing,

    #[error("listing {listing_id} is not active (status={status})")]
    ValidationFailed { listing_id: String, status: String },

    #[error("resolution cancelled")]
    Cancelled,
}

impl From<FetchError> for ResolveFailure {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport(source) => ResolveFailure::Transport(source),
            FetchError::UnexpectedStatus { status, body } => {
                ResolveFailure::UnexpectedStatus { status, body }
            }
            FetchError::Cancelled => ResolveFailure::Cancelled,
        }
    }
}

impl ResolveFailure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveFailure::Transport(_) => ErrorKind::Transport,
            ResolveFailure::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            ResolveFailure::UnknownShape(_) => ErrorKind::UnknownShape,
            ResolveFailure::NoActiveListing => ErrorKind::NoActiveListing,
            ResolveFailure::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            ResolveFailure::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Terminal failure of one resolution, tagged with the product and the stage it stopped at.
#[derive(Error, Debug)]
#[error("resolving {product_id} failed at {stage}: {source}")]
pub struct ResolveError {
    pub product_id: String,
    pub stage: Stage,
    #[source]
    pub source: ResolveFailure,
}

impl ResolveError {
    pub fn new(product_id: impl Into<String>, stage: Stage, source: impl Into<ResolveFailure>) -> Self {
        Self {
            product_id: product_id.into(),
            stage,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NoActiveListing => ErrorSeverity::Low,
            ErrorKind::Transport | ErrorKind::UnexpectedStatus | ErrorKind::Cancelled => {
                ErrorSeverity::Medium
            }
            ErrorKind::UnknownShape | ErrorKind::ValidationFailed => ErrorSeverity::High,
        }
    }
}
