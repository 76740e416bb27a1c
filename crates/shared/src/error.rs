use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned by the processing server alongside a non-success status,
/// e.g. `404 {"error": "File not found"}` from the download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("data url must start with `data:`")]
    MissingScheme,
    #[error("data url is missing the `,` payload separator")]
    MissingPayload,
    #[error("data url payload is not base64 encoded")]
    NotBase64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("success response is missing `{0}`")]
    MissingField(&'static str),
}
