use serde::{Deserialize, Serialize};

use crate::{
    domain::{DataUrl, ResultId},
    error::ProtocolError,
};

pub const UPLOAD_PATH: &str = "upload";
pub const DOWNLOAD_PATH: &str = "download";

/// JSON body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub image: DataUrl,
    pub intensity: i64,
    pub edge_thickness: i64,
    pub color_levels: i64,
}

/// JSON body answered by `POST /upload` with a 2xx status.
///
/// The server flags the outcome with `success` and fills either the result
/// fields or `error`; [`ProcessResponse::into_outcome`] turns that into a
/// closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image: Option<DataUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<ResultId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessResponse {
    pub fn success(result_image: DataUrl, result_id: ResultId) -> Self {
        Self {
            success: true,
            result_image: Some(result_image),
            result_id: Some(result_id),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result_image: None,
            result_id: None,
            error: Some(error.into()),
        }
    }

    pub fn into_outcome(self) -> Result<ProcessOutcome, ProtocolError> {
        if !self.success {
            return Ok(ProcessOutcome::Failed {
                error: self.error.unwrap_or_default(),
            });
        }
        let result_image = self
            .result_image
            .ok_or(ProtocolError::MissingField("result_image"))?;
        let result_id = self
            .result_id
            .ok_or(ProtocolError::MissingField("result_id"))?;
        Ok(ProcessOutcome::Completed {
            result_image,
            result_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Completed {
        result_image: DataUrl,
        result_id: ResultId,
    },
    Failed {
        error: String,
    },
}
