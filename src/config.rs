use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Threshold handed to the external model; the heuristic path uses
/// `VisualizationConfig::confidence_threshold` instead.
pub const MODEL_CONFIDENCE_THRESHOLD: f32 = 0.3;

pub const DEFAULT_FRAME_BUDGET_MS: u64 = 30;

/// Coerce a kernel/block size to a usable odd value (minimum 1)
pub fn odd_kernel_size(size: i32) -> u32 {
    let size = size.max(1) as u32;
    if size % 2 == 0 { size + 1 } else { size }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MorphologyOperation {
    Erode,
    Dilate,
    Open,
    #[default]
    Close,
}

/// Per-stage toggles and parameters for the filter pipeline.
///
/// Sizes are signed so that out-of-range values coming from a settings file
/// or a UI slider can be corrected instead of rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub median_enabled: bool,
    pub median_kernel_size: i32,

    pub gaussian_enabled: bool,
    pub gaussian_kernel_size: i32,
    pub gaussian_sigma: f32,

    pub bilateral_enabled: bool,
    pub bilateral_diameter: i32,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_space: f32,

    pub clahe_enabled: bool,
    pub clahe_clip_limit: f32,
    pub clahe_tile_grid_x: i32,
    pub clahe_tile_grid_y: i32,

    pub contrast_enabled: bool,
    pub contrast_gain: f32,
    pub contrast_bias: f32,

    pub adaptive_threshold_enabled: bool,
    pub adaptive_block_size: i32,
    pub adaptive_c: i32,

    pub morphology_enabled: bool,
    pub morphology_kernel_size: i32,
    pub morphology_operation: MorphologyOperation,

    pub structure_enabled: bool,
    /// Weight of the incoming image in the structure blend
    pub structure_alpha: f32,
    /// Weight of the inverted edge response; alpha + beta need not be 1
    pub structure_beta: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            median_enabled: true,
            median_kernel_size: 5,
            gaussian_enabled: true,
            gaussian_kernel_size: 5,
            gaussian_sigma: 1.2,
            bilateral_enabled: true,
            bilateral_diameter: 9,
            bilateral_sigma_color: 75.0,
            bilateral_sigma_space: 75.0,
            clahe_enabled: true,
            clahe_clip_limit: 3.0,
            clahe_tile_grid_x: 8,
            clahe_tile_grid_y: 8,
            contrast_enabled: true,
            contrast_gain: 1.8,
            contrast_bias: 10.0,
            adaptive_threshold_enabled: true,
            adaptive_block_size: 11,
            adaptive_c: 2,
            morphology_enabled: true,
            morphology_kernel_size: 3,
            morphology_operation: MorphologyOperation::Close,
            structure_enabled: true,
            structure_alpha: 0.7,
            structure_beta: 0.3,
        }
    }
}

impl FilterConfig {
    /// Every stage switched off, parameters left at their defaults
    pub fn disabled() -> Self {
        Self {
            median_enabled: false,
            gaussian_enabled: false,
            bilateral_enabled: false,
            clahe_enabled: false,
            contrast_enabled: false,
            adaptive_threshold_enabled: false,
            morphology_enabled: false,
            structure_enabled: false,
            ..Self::default()
        }
    }

    /// Skip the six enhancement stages but keep thresholding and morphology
    pub fn without_enhancement(mut self) -> Self {
        self.median_enabled = false;
        self.gaussian_enabled = false;
        self.bilateral_enabled = false;
        self.clahe_enabled = false;
        self.contrast_enabled = false;
        self.structure_enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub show_boxes: bool,
    pub show_labels: bool,
    pub show_confidence: bool,
    /// Carried for settings compatibility, nothing draws masks
    pub show_mask: bool,
    /// RGB
    pub box_color: [u8; 3],
    /// RGB
    pub text_color: [u8; 3],
    pub box_thickness: i32,
    pub font_scale: f32,
    pub confidence_threshold: f32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            show_boxes: true,
            show_labels: true,
            show_confidence: true,
            show_mask: false,
            box_color: [0, 255, 0],
            text_color: [255, 255, 255],
            box_thickness: 2,
            font_scale: 0.5,
            confidence_threshold: 0.5,
        }
    }
}

/// Per-call detection switches, passed in rather than held by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionState {
    pub model_available: bool,
    pub detection_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub enabled: bool,
    pub frame_budget_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl DetectionSettings {
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationSettings {
    pub debug_mode: bool,
}

/// Settings file layout used by the command line tool
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub application: ApplicationSettings,
    pub filters: FilterConfig,
    pub visualization: VisualizationConfig,
    pub detection: DetectionSettings,
}

impl AppConfig {
    /// Load settings from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("config file not found: {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg = Self::from_toml(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        log::info!("configuration loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
