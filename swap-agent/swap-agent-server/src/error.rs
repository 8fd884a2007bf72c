//! Error types for the swap agent

use serde_json::json;
use tracing::error;
use warp::{
    http::StatusCode,
    reject::Reject,
    reply::{Json, WithStatus},
    Rejection,
};

/// Type alias for Results using SwapAgentError
pub type SwapAgentResult<T> = Result<T, SwapAgentError>;

/// The error type emitted by the swap agent
#[derive(Debug, Clone, thiserror::Error)]
pub enum SwapAgentError {
    /// A custom error
    #[error("custom error: {0}")]
    Custom(String),
    /// An error executing an HTTP request
    #[error("http error: {0}")]
    Http(String),
    /// The incoming and outgoing assets are the same
    #[error("identical assets: {0}")]
    IdenticalAssets(String),
    /// The routing oracle found no viable path
    #[error("no route: {0}")]
    NoRoute(String),
    /// An error parsing a value
    #[error("parse error: {0}")]
    Parse(String),
    /// An external call did not complete before its deadline
    #[error("timeout: {0}")]
    Timeout(String),
    /// The route cannot be expressed in the adapter's path format
    #[error("unsupported route: {0}")]
    UnsupportedRoute(String),
}

#[allow(clippy::needless_pass_by_value)]
impl SwapAgentError {
    /// Create a new custom error
    pub fn custom<T: ToString>(e: T) -> Self {
        SwapAgentError::Custom(e.to_string())
    }

    /// Create a new http error
    pub fn http<T: ToString>(e: T) -> Self {
        SwapAgentError::Http(e.to_string())
    }

    /// Create a new identical-assets error
    pub fn identical_assets<T: ToString>(e: T) -> Self {
        SwapAgentError::IdenticalAssets(e.to_string())
    }

    /// Create a new no-route error
    pub fn no_route<T: ToString>(e: T) -> Self {
        SwapAgentError::NoRoute(e.to_string())
    }

    /// Create a new parse error
    pub fn parse<T: ToString>(e: T) -> Self {
        SwapAgentError::Parse(e.to_string())
    }

    /// Create a new timeout error
    pub fn timeout<T: ToString>(e: T) -> Self {
        SwapAgentError::Timeout(e.to_string())
    }

    /// Create a new unsupported-route error
    pub fn unsupported_route<T: ToString>(e: T) -> Self {
        SwapAgentError::UnsupportedRoute(e.to_string())
    }
}

impl Reject for SwapAgentError {}

impl From<reqwest::Error> for SwapAgentError {
    fn from(e: reqwest::Error) -> Self {
        SwapAgentError::http(e)
    }
}

/// API-specific error type
#[derive(Debug)]
pub enum ApiError {
    /// Internal server error
    InternalError(String),
    /// Bad request error
    BadRequest(String),
}

impl Reject for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InternalError(e) => write!(f, "Internal error: {}", e),
            ApiError::BadRequest(e) => write!(f, "Bad request: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

// ------------------
// | Error Handling |
// ------------------

/// Handle a rejection from an endpoint handler
pub async fn handle_rejection(err: Rejection) -> Result<WithStatus<Json>, Rejection> {
    if let Some(api_error) = err.find::<ApiError>() {
        let (code, message) = match api_error {
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        error!("API Error: {api_error}");
        Ok(json_error(&message, code))
    } else if let Some(agent_error) = err.find::<SwapAgentError>() {
        let msg = format!("Internal server error: {agent_error}");
        error!("{msg}");
        Ok(json_error(&msg, StatusCode::INTERNAL_SERVER_ERROR))
    } else {
        error!("Unhandled rejection: {:?}", err);
        Err(err)
    }
}

/// Return a json error from a string message
fn json_error(msg: &str, code: StatusCode) -> WithStatus<Json> {
    let json = json!({ "error": msg });
    warp::reply::with_status(warp::reply::json(&json), code)
}
