use image::{GrayImage, Luma};

const BINS: usize = 256;

/// Contrast-limited adaptive histogram equalization.
///
/// The frame is split into a `grid_x` x `grid_y` tile grid (clamped to the
/// frame size). Tiles overhanging the right or bottom edge sample a mirrored
/// border, so every tile covers the same area. Each tile gets its own
/// equalization table built from a histogram clipped at `clip_limit` times
/// the mean bin height, with the clipped excess spread evenly over all bins.
/// Output pixels interpolate bilinearly between the tables of the four
/// nearest tile centres.
pub fn apply_clahe(img: &GrayImage, clip_limit: f32, grid_x: i32, grid_y: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let tiles_x = (grid_x.max(1) as u32).min(width);
    let tiles_y = (grid_y.max(1) as u32).min(height);
    let tile_w = width.div_ceil(tiles_x);
    let tile_h = height.div_ceil(tiles_y);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            luts.push(tile_lut(img, (tx * tile_w, ty * tile_h), (tile_w, tile_h), clip_limit));
        }
    }

    let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];

    GrayImage::from_fn(width, height, |x, y| {
        let value = img.get_pixel(x, y)[0] as usize;

        // Position relative to tile centres
        let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let (tx0, tx1, wx) = neighbours(fx, tiles_x);
        let (ty0, ty1, wy) = neighbours(fy, tiles_y);

        let top = lut_at(tx0, ty0)[value] as f32 * (1.0 - wx) + lut_at(tx1, ty0)[value] as f32 * wx;
        let bottom = lut_at(tx0, ty1)[value] as f32 * (1.0 - wx) + lut_at(tx1, ty1)[value] as f32 * wx;
        let mapped = top * (1.0 - wy) + bottom * wy;
        Luma([mapped.round().clamp(0.0, 255.0) as u8])
    })
}

// Lower/upper tile index and weight of the upper one
fn neighbours(pos: f32, tiles: u32) -> (u32, u32, f32) {
    if pos <= 0.0 {
        return (0, 0, 0.0);
    }
    let last = tiles - 1;
    let lower = pos.floor() as u32;
    if lower >= last {
        return (last, last, 0.0);
    }
    (lower, lower + 1, pos - lower as f32)
}

// Mirror an index past the end back into [0, len), edge pixel not repeated
fn reflect(v: u32, len: u32) -> u32 {
    if v < len {
        return v;
    }
    if len == 1 {
        return 0;
    }
    (2 * (len - 1)).saturating_sub(v).min(len - 1)
}

fn tile_lut(img: &GrayImage, (x0, y0): (u32, u32), (tile_w, tile_h): (u32, u32), clip_limit: f32) -> [u8; BINS] {
    let (width, height) = img.dimensions();
    let mut hist = [0u32; BINS];
    for y in y0..y0 + tile_h {
        for x in x0..x0 + tile_w {
            hist[img.get_pixel(reflect(x, width), reflect(y, height))[0] as usize] += 1;
        }
    }
    let area = tile_w * tile_h;

    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);
        let mut excess = 0u32;
        for count in hist.iter_mut() {
            if *count > limit {
                excess += *count - limit;
                *count = limit;
            }
        }

        let batch = excess / BINS as u32;
        let residual = (excess % BINS as u32) as usize;
        for count in hist.iter_mut() {
            *count += batch;
        }
        if residual > 0 {
            let step = (BINS / residual).max(1);
            for i in (0..BINS).step_by(step).take(residual) {
                hist[i] += 1;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; BINS];
    let mut cumulative = 0u32;
    for (i, count) in hist.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
