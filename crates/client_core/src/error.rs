use thiserror::Error;

/// Failures the controller detects and surfaces as error notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("unsupported file type `{mime_type}`")]
    InvalidFileType { mime_type: String },
    #[error("file is {size_bytes} bytes, limit is {max_bytes} bytes")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
    #[error("failed to read file: {0}")]
    FileReadFailure(String),
    #[error("no image selected")]
    NoImageSelected,
    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },
    #[error("server reported failure: {0}")]
    ServerReportedFailure(String),
    #[error("request failed: {0}")]
    NetworkFailure(String),
    #[error("no result available")]
    NoResultAvailable,
    #[error("download failed: {0}")]
    DownloadFailure(String),
}

impl ControllerError {
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => "Please select a valid image file.".to_string(),
            Self::FileTooLarge { max_bytes, .. } => format!(
                "File size too large. Please select an image smaller than {}.",
                human_readable_limit(*max_bytes)
            ),
            Self::FileReadFailure(_) => "Error reading file. Please try again.".to_string(),
            Self::NoImageSelected => "Please select an image first.".to_string(),
            Self::HttpError { status } => format!(
                "Failed to process image (server returned HTTP {status}). Please try again."
            ),
            Self::ServerReportedFailure(message) => format!("Error: {message}"),
            Self::NetworkFailure(_) => {
                "Failed to process image. Please check your connection and try again.".to_string()
            }
            Self::NoResultAvailable => "No result available to download.".to_string(),
            Self::DownloadFailure(_) => "Download failed. Please try again.".to_string(),
        }
    }
}

fn human_readable_limit(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Failures of a single `/upload` round trip or endpoint construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl From<BackendError> for ControllerError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Status(status) => Self::HttpError { status },
            other => Self::NetworkFailure(other.to_string()),
        }
    }
}
