//! Detection results and normalized bounding-box features

use serde::{Deserialize, Serialize};

/// Pixel-space bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.xmin + (self.xmax - self.xmin) / 2.0,
            self.ymin + (self.ymax - self.ymin) / 2.0,
        )
    }

    /// Width, at least one pixel.
    pub fn width(&self) -> f64 {
        (self.xmax - self.xmin).max(1.0)
    }

    /// Height, at least one pixel.
    pub fn height(&self) -> f64 {
        (self.ymax - self.ymin).max(1.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// One labelled detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub score: f64,
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// A detection response for one camera frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionFrame {
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub image_width: u32,
    #[serde(default)]
    pub image_height: u32,
}

impl DetectionFrame {
    pub fn first(&self) -> Option<&Detection> {
        self.detections.first()
    }

    /// Normalized features of the first detection.
    ///
    /// `None` when there is no detection or the image size is unknown.
    pub fn observe(&self) -> Option<BoundingBoxObservation> {
        let detection = self.first()?;
        BoundingBoxObservation::from_box(&detection.bbox, self.image_width, self.image_height)
    }

    /// `label (0.87), label (0.55)`
    pub fn describe(&self) -> String {
        self.detections
            .iter()
            .map(|d| format!("{} ({:.2})", d.label, d.score))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Bounding box features normalized by the image size, each in `[0, 1]` for
/// an in-frame box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxObservation {
    pub norm_center_x: f64,
    pub norm_center_y: f64,
    pub norm_area: f64,
    pub norm_bottom: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl BoundingBoxObservation {
    pub fn from_box(bbox: &BoundingBox, image_width: u32, image_height: u32) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let (w, h) = (f64::from(image_width), f64::from(image_height));
        let (cx, cy) = bbox.center();
        Some(Self {
            norm_center_x: cx / w,
            norm_center_y: cy / h,
            norm_area: bbox.area() / (w * h),
            norm_bottom: bbox.ymax / h,
            image_width,
            image_height,
        })
    }

    /// Build directly from normalized centre coordinates.
    pub fn centered_at(norm_center_x: f64, norm_center_y: f64) -> Self {
        Self {
            norm_center_x,
            norm_center_y,
            norm_area: 0.0,
            norm_bottom: norm_center_y,
            image_width: 1,
            image_height: 1,
        }
    }
}
