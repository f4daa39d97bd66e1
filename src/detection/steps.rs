use image::GrayImage;

use crate::config::FilterConfig;
use crate::detection::{clahe, preprocessing};
use crate::pipeline::PipelineStep;

/// Impulse noise removal
pub struct MedianStep;

impl PipelineStep for MedianStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.median_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_median(&image, config.median_kernel_size)
    }

    fn name(&self) -> &str {
        "Median Filter"
    }
}

/// Broadband noise removal
pub struct GaussianStep;

impl PipelineStep for GaussianStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.gaussian_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_gaussian(&image, config.gaussian_kernel_size, config.gaussian_sigma)
    }

    fn name(&self) -> &str {
        "Gaussian Filter"
    }
}

pub struct BilateralStep;

impl PipelineStep for BilateralStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.bilateral_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_bilateral(
            &image,
            config.bilateral_diameter,
            config.bilateral_sigma_color,
            config.bilateral_sigma_space,
        )
    }

    fn name(&self) -> &str {
        "Bilateral Filter"
    }
}

pub struct ClaheStep;

impl PipelineStep for ClaheStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.clahe_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        clahe::apply_clahe(
            &image,
            config.clahe_clip_limit,
            config.clahe_tile_grid_x,
            config.clahe_tile_grid_y,
        )
    }

    fn name(&self) -> &str {
        "CLAHE"
    }
}

pub struct ContrastStep;

impl PipelineStep for ContrastStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.contrast_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_contrast(&image, config.contrast_gain, config.contrast_bias)
    }

    fn name(&self) -> &str {
        "Contrast Enhancement"
    }
}

/// Inverted Laplacian blended back into the frame; must stay last
pub struct StructureEnhancementStep;

impl PipelineStep for StructureEnhancementStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.structure_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_structure_enhancement(&image, config.structure_alpha, config.structure_beta)
    }

    fn name(&self) -> &str {
        "Structure Enhancement"
    }
}

/// Adaptive mean threshold, or the midpoint threshold when adaptive
/// thresholding is switched off. Always runs.
pub struct ThresholdStep;

impl PipelineStep for ThresholdStep {
    fn is_enabled(&self, _config: &FilterConfig) -> bool {
        true
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        if config.adaptive_threshold_enabled {
            preprocessing::adaptive_threshold_inv(&image, config.adaptive_block_size, config.adaptive_c)
        } else {
            preprocessing::midpoint_threshold_inv(&image)
        }
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Gap filling on the adaptive mask
pub struct MorphologyStep;

impl PipelineStep for MorphologyStep {
    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.adaptive_threshold_enabled && config.morphology_enabled
    }

    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage {
        preprocessing::apply_morphology(&image, config.morphology_operation, config.morphology_kernel_size)
    }

    fn name(&self) -> &str {
        "Morphology"
    }
}
