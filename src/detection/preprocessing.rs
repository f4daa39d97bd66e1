use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::{bilateral_filter, filter3x3, median_filter, separable_filter_equal};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::morphology;

use crate::config::{MorphologyOperation, odd_kernel_size};

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Median filter over a square window, removes impulse noise
pub fn apply_median(img: &GrayImage, kernel_size: i32) -> GrayImage {
    let radius = odd_kernel_size(kernel_size) / 2;
    if radius == 0 {
        return img.clone();
    }
    median_filter(img, radius, radius)
}

/// Sampled, normalized 1D Gaussian of odd length `size`.
///
/// A non-positive sigma is derived from the size the way OpenCV does it.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (size / 2) as i32;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Gaussian blur with an explicit kernel size and sigma, borders replicated
pub fn apply_gaussian(img: &GrayImage, kernel_size: i32, sigma: f32) -> GrayImage {
    let size = odd_kernel_size(kernel_size);
    if size == 1 || is_empty(img) {
        return img.clone();
    }
    let kernel = gaussian_kernel(size, sigma);

    // Filter in f32 so the result is rounded once instead of truncated per pass
    let float: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(img.width(), img.height(), |x, y| Luma([img.get_pixel(x, y)[0] as f32]));
    let blurred = separable_filter_equal(&float, kernel.as_slice());
    GrayImage::from_fn(img.width(), img.height(), |x, y| Luma([saturate(blurred.get_pixel(x, y)[0])]))
}

/// Edge-preserving smoothing over a square window of `diameter` pixels.
///
/// A non-positive diameter is derived from `sigma_space`.
pub fn apply_bilateral(img: &GrayImage, diameter: i32, sigma_color: f32, sigma_space: f32) -> GrayImage {
    if is_empty(img) {
        return img.clone();
    }
    let sigma_color = if sigma_color > 0.0 { sigma_color } else { 1.0 };
    let sigma_space = if sigma_space > 0.0 { sigma_space } else { 1.0 };
    let radius = match diameter {
        d if d > 0 => odd_kernel_size(d) / 2,
        _ => (sigma_space * 1.5).round() as u32,
    };
    let radius = radius.clamp(1, img.width().max(img.height()));

    bilateral_filter(img, 2 * radius + 1, sigma_color, sigma_space)
}

/// Linear contrast: `v * gain + bias`, saturated to [0, 255]
pub fn apply_contrast(img: &GrayImage, gain: f32, bias: f32) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([saturate(img.get_pixel(x, y)[0] as f32 * gain + bias)])
    })
}

const LAPLACIAN_KERNEL: [f32; 9] = [2.0, 0.0, 2.0, 0.0, -8.0, 0.0, 2.0, 0.0, 2.0];

/// 3x3 Laplacian response `[2 0 2; 0 -8 0; 2 0 2]`, negative values clipped
/// to zero
pub fn laplacian(img: &GrayImage) -> GrayImage {
    if is_empty(img) {
        return img.clone();
    }
    filter3x3::<_, f32, u8>(img, &LAPLACIAN_KERNEL)
}

/// Highlight structures: invert the Laplacian and blend it with the input.
///
/// `out = img * alpha + (255 - laplacian(img)) * beta`
pub fn apply_structure_enhancement(img: &GrayImage, alpha: f32, beta: f32) -> GrayImage {
    let edges = laplacian(img);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let base = img.get_pixel(x, y)[0] as f32;
        let inverted = 255.0 - edges.get_pixel(x, y)[0] as f32;
        Luma([saturate(base * alpha + inverted * beta)])
    })
}

/// Local mean threshold, inverted: pixels darker than their neighbourhood
/// mean minus `c` become foreground (255).
///
/// The mean is taken over the part of the block that lies inside the frame.
pub fn adaptive_threshold_inv(img: &GrayImage, block_size: i32, c: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    let half = odd_kernel_size(block_size) / 2;
    let integral: ImageBuffer<Luma<u64>, Vec<u64>> = integral_image::<_, u64>(img);

    GrayImage::from_fn(width, height, |x, y| {
        let left = x.saturating_sub(half);
        let top = y.saturating_sub(half);
        let right = x.saturating_add(half).min(width - 1);
        let bottom = y.saturating_add(half).min(height - 1);
        let sum = sum_image_pixels(&integral, left, top, right, bottom)[0];
        let count = ((right - left + 1) as u64 * (bottom - top + 1) as u64) as f64;
        let mean = (sum as f64 / count).round() as i32;

        let value = img.get_pixel(x, y)[0] as i32;
        if value > mean - c { Luma([0]) } else { Luma([255]) }
    })
}

/// Fixed threshold at the middle of the intensity range, inverted like
/// the adaptive variant.
pub fn midpoint_threshold_inv(img: &GrayImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if img.get_pixel(x, y)[0] > 127 { Luma([0u8]) } else { Luma([255u8]) }
    })
}

/// Binary morphology with a square structuring element
pub fn apply_morphology(img: &GrayImage, operation: MorphologyOperation, kernel_size: i32) -> GrayImage {
    let radius = (odd_kernel_size(kernel_size) / 2).min(u8::MAX as u32) as u8;
    if radius == 0 {
        return img.clone();
    }
    match operation {
        MorphologyOperation::Erode => morphology::erode(img, Norm::LInf, radius),
        MorphologyOperation::Dilate => morphology::dilate(img, Norm::LInf, radius),
        MorphologyOperation::Open => morphology::open(img, Norm::LInf, radius),
        MorphologyOperation::Close => morphology::close(img, Norm::LInf, radius),
    }
}

fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn is_empty(img: &GrayImage) -> bool {
    img.width() == 0 || img.height() == 0
}
