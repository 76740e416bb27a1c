//! Terminal rendering of the controller's view surface.

use std::{sync::Mutex, time::Instant};

use client_core::{
    ControllerView, Notification, NotificationLevel, ParameterKind, Region, StatusRegion,
};
use shared::domain::DataUrl;
use tracing::debug;

#[derive(Default)]
pub struct TerminalView {
    status: Mutex<StatusRegion>,
}

impl TerminalView {
    /// The notification still on screen, if it has not expired.
    pub fn visible_status(&self) -> Option<Notification> {
        let mut status = self.status.lock().ok()?;
        status.visible(Instant::now()).cloned()
    }
}

impl ControllerView for TerminalView {
    fn show_original(&self, image: &DataUrl) {
        println!(
            "original: {} ({} base64 chars)",
            image.mime_type(),
            image.payload().len()
        );
    }

    fn show_result(&self, image: &DataUrl) {
        println!(
            "result:   {} ({} base64 chars)",
            image.mime_type(),
            image.payload().len()
        );
    }

    fn set_region_visible(&self, region: Region, visible: bool) {
        if region == Region::Busy && visible {
            println!("processing...");
        }
        debug!(?region, visible, "view: region toggled");
    }

    fn set_submit_enabled(&self, enabled: bool) {
        debug!(enabled, "view: submit trigger");
    }

    fn set_parameter_label(&self, kind: ParameterKind, value: i64) {
        debug!(parameter = kind.label(), value, "view: parameter label");
    }

    fn clear_file_selection(&self) {
        debug!("view: file selection cleared");
    }

    fn show_notification(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => {
                println!("[{}] {}", notification.level.style(), notification.message)
            }
            NotificationLevel::Error => {
                eprintln!("[{}] {}", notification.level.style(), notification.message)
            }
        }
        if let Ok(mut status) = self.status.lock() {
            status.post(notification.clone(), Instant::now());
        }
    }

    fn clear_notification(&self) {
        if let Ok(mut status) = self.status.lock() {
            status.clear();
        }
    }
}
