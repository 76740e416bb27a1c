use std::{ops::RangeInclusive, time::Duration};

use shared::domain::{DataUrl, ResultId};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SUCCESS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Empty,
    ImageLoaded,
    Processing,
    ResultReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Intensity,
    EdgeThickness,
    ColorLevels,
}

impl ParameterKind {
    pub const ALL: [Self; 3] = [Self::Intensity, Self::EdgeThickness, Self::ColorLevels];

    pub fn label(self) -> &'static str {
        match self {
            Self::Intensity => "Cartoon intensity",
            Self::EdgeThickness => "Edge thickness",
            Self::ColorLevels => "Color levels",
        }
    }

    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            Self::Intensity => 1..=10,
            Self::EdgeThickness => 1..=5,
            Self::ColorLevels => 2..=16,
        }
    }

    pub fn default_value(self) -> i64 {
        match self {
            Self::Intensity => 5,
            Self::EdgeThickness => 2,
            Self::ColorLevels => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingParams {
    pub intensity: i64,
    pub edge_thickness: i64,
    pub color_levels: i64,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            intensity: ParameterKind::Intensity.default_value(),
            edge_thickness: ParameterKind::EdgeThickness.default_value(),
            color_levels: ParameterKind::ColorLevels.default_value(),
        }
    }
}

impl ProcessingParams {
    pub fn get(&self, kind: ParameterKind) -> i64 {
        match kind {
            ParameterKind::Intensity => self.intensity,
            ParameterKind::EdgeThickness => self.edge_thickness,
            ParameterKind::ColorLevels => self.color_levels,
        }
    }

    fn slot_mut(&mut self, kind: ParameterKind) -> &mut i64 {
        match kind {
            ParameterKind::Intensity => &mut self.intensity,
            ParameterKind::EdgeThickness => &mut self.edge_thickness,
            ParameterKind::ColorLevels => &mut self.color_levels,
        }
    }
}

/// The three bounded sliders. Writes are clamped to each slider's range, so
/// a value read back is always in range.
#[derive(Debug, Clone, Default)]
pub struct ParameterControls {
    values: ProcessingParams,
}

impl ParameterControls {
    pub fn get(&self, kind: ParameterKind) -> i64 {
        self.values.get(kind)
    }

    /// Returns the value the control settled on.
    pub fn set(&mut self, kind: ParameterKind, value: i64) -> i64 {
        let range = kind.range();
        let clamped = value.clamp(*range.start(), *range.end());
        *self.values.slot_mut(kind) = clamped;
        clamped
    }

    pub fn snapshot(&self) -> ProcessingParams {
        self.values
    }

    pub fn restore_defaults(&mut self) {
        self.values = ProcessingParams::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub loaded_image: Option<DataUrl>,
    pub last_result_id: Option<ResultId>,
}

impl SessionState {
    pub fn clear(&mut self) {
        self.loaded_image = None;
        self.last_result_id = None;
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// `None` disables the size check.
    pub max_upload_bytes: Option<u64>,
    /// `None` keeps success messages until replaced.
    pub success_clear_after: Option<Duration>,
    pub scroll_errors_into_view: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
            success_clear_after: Some(DEFAULT_SUCCESS_CLEAR_AFTER),
            scroll_errors_into_view: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_start_at_defaults() {
        let controls = ParameterControls::default();
        assert_eq!(
            controls.snapshot(),
            ProcessingParams {
                intensity: 5,
                edge_thickness: 2,
                color_levels: 8
            }
        );
    }

    #[test]
    fn controls_clamp_to_their_bounds() {
        let mut controls = ParameterControls::default();
        assert_eq!(controls.set(ParameterKind::Intensity, 42), 10);
        assert_eq!(controls.set(ParameterKind::EdgeThickness, 0), 1);
        assert_eq!(controls.set(ParameterKind::ColorLevels, 12), 12);
        assert_eq!(controls.get(ParameterKind::ColorLevels), 12);
    }

    #[test]
    fn restore_defaults_discards_adjustments() {
        let mut controls = ParameterControls::default();
        controls.set(ParameterKind::Intensity, 9);
        controls.restore_defaults();
        assert_eq!(controls.get(ParameterKind::Intensity), 5);
    }
}
