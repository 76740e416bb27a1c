//! Upload/process/result state machine.

use std::{io::Cursor, sync::Arc};

use chrono::{DateTime, Utc};
use image::ImageReader;
use shared::{
    domain::{DataUrl, ResultId},
    protocol::{ProcessOutcome, UploadRequest},
};
use tracing::{error, info, warn};

use crate::{
    error::ControllerError,
    file::SelectedFile,
    notification::Notification,
    transport::{DownloadSink, ProcessingBackend},
    types::{
        ControllerConfig, ControllerState, ParameterControls, ParameterKind, ProcessingParams,
        SessionState,
    },
    view::{ControllerView, Region},
};

/// Holds the controller in `Processing` with the busy indicator shown and
/// submit disabled. Dropping it, including when the request future is
/// cancelled, hands back `ImageLoaded` and restores the trigger.
struct BusyGuard<'a> {
    view: &'a dyn ControllerView,
    state: &'a mut ControllerState,
}

impl<'a> BusyGuard<'a> {
    fn engage(view: &'a dyn ControllerView, state: &'a mut ControllerState) -> Self {
        *state = ControllerState::Processing;
        view.set_region_visible(Region::Busy, true);
        view.set_submit_enabled(false);
        view.set_region_visible(Region::Results, false);
        Self { view, state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if *self.state == ControllerState::Processing {
            *self.state = ControllerState::ImageLoaded;
        }
        self.view.set_region_visible(Region::Busy, false);
        self.view.set_submit_enabled(true);
    }
}

pub struct UploadController {
    config: ControllerConfig,
    backend: Arc<dyn ProcessingBackend>,
    downloads: Arc<dyn DownloadSink>,
    view: Arc<dyn ControllerView>,
    session: SessionState,
    parameters: ParameterControls,
    state: ControllerState,
}

impl UploadController {
    pub fn new(
        config: ControllerConfig,
        backend: Arc<dyn ProcessingBackend>,
        downloads: Arc<dyn DownloadSink>,
        view: Arc<dyn ControllerView>,
    ) -> Self {
        let controller = Self {
            config,
            backend,
            downloads,
            view,
            session: SessionState::default(),
            parameters: ParameterControls::default(),
            state: ControllerState::Empty,
        };
        controller.refresh_parameter_labels();
        controller.view.set_submit_enabled(true);
        controller
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn loaded_image(&self) -> Option<&DataUrl> {
        self.session.loaded_image.as_ref()
    }

    pub fn last_result_id(&self) -> Option<&ResultId> {
        self.session.last_result_id.as_ref()
    }

    pub fn parameters(&self) -> ProcessingParams {
        self.parameters.snapshot()
    }

    pub fn set_parameter(&mut self, kind: ParameterKind, value: i64) -> i64 {
        let applied = self.parameters.set(kind, value);
        self.view.set_parameter_label(kind, applied);
        applied
    }

    pub async fn load_image(&mut self, file: &SelectedFile) -> Result<(), ControllerError> {
        if !file.is_image() {
            return Err(self.surface(ControllerError::InvalidFileType {
                mime_type: file.mime_type().to_string(),
            }));
        }
        if let Some(max_bytes) = self.config.max_upload_bytes {
            if file.size_bytes() > max_bytes {
                return Err(self.surface(ControllerError::FileTooLarge {
                    size_bytes: file.size_bytes(),
                    max_bytes,
                }));
            }
        }

        let bytes = match file.read().await {
            Ok(bytes) if bytes.is_empty() => {
                return Err(self.surface(ControllerError::FileReadFailure(format!(
                    "{} is empty",
                    file.name()
                ))));
            }
            Ok(bytes) => bytes,
            Err(err) => {
                return Err(self.surface(ControllerError::FileReadFailure(format!(
                    "{}: {err}",
                    file.name()
                ))));
            }
        };

        let dimensions = probe_dimensions(&bytes);
        if dimensions.is_none() {
            warn!(file = file.name(), "load: could not read image dimensions");
        }

        let image = DataUrl::encode(file.mime_type(), &bytes);
        self.view.show_original(&image);
        self.view.set_region_visible(Region::Results, false);
        self.view.set_region_visible(Region::Controls, true);
        self.view.set_region_visible(Region::ActionButtons, true);
        self.session.loaded_image = Some(image);
        self.session.last_result_id = None;
        self.state = ControllerState::ImageLoaded;

        info!(
            file = file.name(),
            mime_type = file.mime_type(),
            size_bytes = file.size_bytes(),
            "load: image ready"
        );
        let message = match dimensions {
            Some((width, height)) => format!(
                "Image loaded successfully! ({width}x{height}) Adjust settings and click Cartoonize."
            ),
            None => "Image loaded successfully! Adjust settings and click Cartoonize.".to_string(),
        };
        self.notify_success(message);
        Ok(())
    }

    pub async fn submit_for_processing(&mut self) -> Result<ResultId, ControllerError> {
        let Some(image) = self.session.loaded_image.clone() else {
            return Err(self.surface(ControllerError::NoImageSelected));
        };

        let params = self.parameters.snapshot();
        let request = UploadRequest {
            image,
            intensity: params.intensity,
            edge_thickness: params.edge_thickness,
            color_levels: params.color_levels,
        };
        info!(
            intensity = request.intensity,
            edge_thickness = request.edge_thickness,
            color_levels = request.color_levels,
            "process: sending payload"
        );

        let outcome = {
            let _busy = BusyGuard::engage(self.view.as_ref(), &mut self.state);
            self.backend.process(&request).await
        };

        match outcome {
            Ok(ProcessOutcome::Completed {
                result_image,
                result_id,
            }) => {
                self.view.show_result(&result_image);
                self.view.set_region_visible(Region::Results, true);
                self.session.last_result_id = Some(result_id.clone());
                self.state = ControllerState::ResultReady;
                info!(%result_id, "process: completed");
                self.notify_success("Cartoonization completed successfully!");
                Ok(result_id)
            }
            Ok(ProcessOutcome::Failed { error }) => {
                Err(self.surface(ControllerError::ServerReportedFailure(error)))
            }
            Err(err) => {
                error!(error = %err, "process: request failed");
                Err(self.surface(err.into()))
            }
        }
    }

    pub async fn download_result(&self) -> Result<(), ControllerError> {
        let Some(result_id) = self.session.last_result_id.as_ref() else {
            return Err(self.surface(ControllerError::NoResultAvailable));
        };

        let url = self
            .backend
            .download_url(result_id)
            .map_err(|err| self.surface(ControllerError::DownloadFailure(err.to_string())))?;
        let filename = download_filename(Utc::now());

        if let Err(err) = self.downloads.start_download(&url, &filename).await {
            return Err(self.surface(ControllerError::DownloadFailure(format!("{err:#}"))));
        }

        info!(%url, filename = %filename, "download: started");
        self.notify_success("Download started!");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.session.clear();
        self.view.clear_file_selection();
        for region in [
            Region::Controls,
            Region::ActionButtons,
            Region::Results,
            Region::Busy,
        ] {
            self.view.set_region_visible(region, false);
        }
        self.view.clear_notification();
        self.parameters.restore_defaults();
        self.refresh_parameter_labels();
        self.state = ControllerState::Empty;

        info!("reset: session cleared");
        self.notify_success("Reset complete. Ready for a new image.");
    }

    fn refresh_parameter_labels(&self) {
        for kind in ParameterKind::ALL {
            self.view.set_parameter_label(kind, self.parameters.get(kind));
        }
    }

    fn notify_success(&self, message: impl Into<String>) {
        self.view.show_notification(&Notification::success(
            message,
            self.config.success_clear_after,
        ));
    }

    /// Shows `err` to the user and hands it back for the caller to return.
    fn surface(&self, err: ControllerError) -> ControllerError {
        warn!(error = %err, state = ?self.state, "controller: operation rejected");
        self.view.show_notification(&Notification::error(
            err.user_message(),
            self.config.scroll_errors_into_view,
        ));
        err
    }
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

pub fn download_filename(now: DateTime<Utc>) -> String {
    format!("cartoonized_{}.png", now.timestamp_millis())
}
