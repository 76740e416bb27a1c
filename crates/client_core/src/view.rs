//! The presentation surface the controller drives.

use shared::domain::DataUrl;

use crate::{notification::Notification, types::ParameterKind};

/// Regions whose visibility the controller toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Controls,
    ActionButtons,
    Results,
    Busy,
}

pub trait ControllerView: Send + Sync {
    fn show_original(&self, image: &DataUrl);
    fn show_result(&self, image: &DataUrl);
    fn set_region_visible(&self, region: Region, visible: bool);
    fn set_submit_enabled(&self, enabled: bool);
    fn set_parameter_label(&self, kind: ParameterKind, value: i64);
    fn clear_file_selection(&self);
    fn show_notification(&self, notification: &Notification);
    fn clear_notification(&self);
}
