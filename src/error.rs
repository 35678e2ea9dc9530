use thiserror::Error;

/// Non-200 `status_code` values reported in the response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    BadRequest,
    Unauthorized,
    UsageLimit,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    ServerError,
    Unavailable,
    Other(u16),
}

impl ApiStatus {
    /// `None` for 200.
    pub fn from_code(code: u16) -> Option<Self> {
        let status = match code {
            200 => return None,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            402 => Self::UsageLimit,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            500 => Self::ServerError,
            503 => Self::Unavailable,
            other => Self::Other(other),
        };
        Some(status)
    }

    pub fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::UsageLimit => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::ServerError => 500,
            Self::Unavailable => 503,
            Self::Other(c) => c,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "invalid or missing api key",
            Self::UsageLimit => "usage limit reached",
            Self::Forbidden => "not authorized",
            Self::NotFound => "not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::ServerError => "server error",
            Self::Unavailable => "service unavailable",
            Self::Other(_) => "unexpected status",
        }
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.describe(), self.code())
    }
}

/// Failures of catalog fetches. Cloneable so it can be published to every
/// subscriber of a stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("api error: {0}")]
    Api(ApiStatus),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("requested id {requested} but received {received}")]
    IdMismatch { requested: u64, received: u64 },
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
