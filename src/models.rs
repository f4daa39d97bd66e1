use image::{DynamicImage, GrayImage, RgbImage};

/// Raw camera frame, single- or three-channel, 8 bits per channel
pub type Frame = DynamicImage;

/// Output of the enhancement stages
pub type EnhancedFrame = GrayImage;

/// Foreground (255) / background (0) mask
pub type BinaryFrame = GrayImage;

/// Frame copy with detection annotations drawn on it
pub type AnnotatedFrame = RgbImage;

/// Axis-aligned box in frame pixel coordinates.
///
/// Coordinates are signed because boxes coming back from an external model
/// may start left of or above the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Rectangle intersection; the result may be empty
    pub fn intersect(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        BoundingBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// In [0, 1]
    pub confidence: f32,
    pub class_id: i32,
    pub class_name: String,
}

/// An external contour traced from a binary frame
#[derive(Debug, Clone)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    /// Polygon area enclosed by the traced border points
    pub area: f64,
    pub point_count: usize,
}

impl Region {
    /// Build a region from border points, returns None for an empty trace
    pub fn from_points(points: &[(u32, u32)]) -> Option<Self> {
        let (&(first_x, first_y), _) = points.split_first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
            area: polygon_area(points),
            point_count: points.len(),
        })
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn aspect_ratio(&self) -> f64 {
        let h = self.height() as f64;
        if h == 0.0 {
            return 0.0;
        }
        self.width() as f64 / h
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.min_x as i32,
            y: self.min_y as i32,
            width: self.width() as i32,
            height: self.height() as i32,
        }
    }
}

/// Shoelace area of a closed polygon
fn polygon_area(points: &[(u32, u32)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, &(x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % points.len()];
        twice_area += x0 as f64 * y1 as f64 - x1 as f64 * y0 as f64;
    }
    (twice_area / 2.0).abs()
}
