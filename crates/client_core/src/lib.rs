//! Client side of the image cartoonizer: the upload/process/result
//! controller and the seams it talks through.

pub mod controller;
pub mod error;
pub mod file;
pub mod notification;
pub mod transport;
pub mod types;
pub mod view;

pub use controller::{download_filename, UploadController};
pub use error::{BackendError, ControllerError};
pub use file::{FileSource, SelectedFile};
pub use notification::{Notification, NotificationLevel, StatusRegion};
pub use transport::{
    normalize_base_url, DownloadSink, HttpDownloadSink, HttpProcessingBackend,
    MissingDownloadSink, ProcessingBackend,
};
pub use types::{
    ControllerConfig, ControllerState, ParameterControls, ParameterKind, ProcessingParams,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SUCCESS_CLEAR_AFTER,
};
pub use view::{ControllerView, Region};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
