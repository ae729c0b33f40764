//! Mapping between document space and device-pixel screen space.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Clockwise page rotation, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations in clockwise order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Build a rotation from a multiple of 90 degrees (negative values wrap).
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The next rotation a quarter turn clockwise.
    pub fn clockwise(self) -> Self {
        self.compose(Rotation::Deg90)
    }

    /// Combine two rotations (e.g. intrinsic page rotation and user rotation).
    pub fn compose(self, other: Rotation) -> Self {
        let total = i32::from(self.degrees()) + i32::from(other.degrees());
        Rotation::from_degrees(total).unwrap_or_default()
    }

    /// Whether the page's width and height swap on screen.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(i32::from(degrees))
            .ok_or_else(|| format!("rotation must be a multiple of 90, got {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// The transform that registers a page's document space onto its surfaces.
///
/// Screen space here is the pixel-buffer space of the raster and overlay
/// surfaces: document units multiplied by `scale * device_pixel_ratio`, with
/// the axes swapped or flipped according to the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Zoom factor.
    pub scale: f64,
    /// Device pixels per layout pixel.
    pub device_pixel_ratio: f64,
    /// Effective clockwise rotation of the page.
    pub rotation: Rotation,
    /// Unrotated page size in document units.
    pub page_size: Size,
}

impl ViewportTransform {
    /// Create a transform for a page of the given unrotated size.
    pub fn new(scale: f64, device_pixel_ratio: f64, rotation: Rotation, page_size: Size) -> Self {
        Self {
            scale,
            device_pixel_ratio,
            rotation,
            page_size,
        }
    }

    /// Device pixels per document unit.
    pub fn pixel_scale(&self) -> f64 {
        self.scale * self.device_pixel_ratio
    }

    /// Get the affine transform from document space to screen space.
    pub fn transform(&self) -> Affine {
        let k = self.pixel_scale();
        let Size { width, height } = self.page_size;
        match self.rotation {
            Rotation::Deg0 => Affine::new([k, 0.0, 0.0, k, 0.0, 0.0]),
            Rotation::Deg90 => Affine::new([0.0, k, -k, 0.0, height * k, 0.0]),
            Rotation::Deg180 => Affine::new([-k, 0.0, 0.0, -k, width * k, height * k]),
            Rotation::Deg270 => Affine::new([0.0, -k, k, 0.0, 0.0, width * k]),
        }
    }

    /// Get the inverse transform, from screen space to document space.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a document point to screen coordinates.
    pub fn to_screen(&self, doc_point: Point) -> Point {
        self.transform() * doc_point
    }

    /// Convert a screen point to document coordinates.
    pub fn to_doc(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Map a document rectangle to a normalized screen rectangle.
    pub fn rect_to_screen(&self, doc_rect: Rect) -> Rect {
        let p0 = self.to_screen(Point::new(doc_rect.x0, doc_rect.y0));
        let p1 = self.to_screen(Point::new(doc_rect.x1, doc_rect.y1));
        Rect::from_points(p0, p1).abs()
    }

    /// Map a screen rectangle to a normalized document rectangle.
    pub fn rect_to_doc(&self, screen_rect: Rect) -> Rect {
        let p0 = self.to_doc(Point::new(screen_rect.x0, screen_rect.y0));
        let p1 = self.to_doc(Point::new(screen_rect.x1, screen_rect.y1));
        Rect::from_points(p0, p1).abs()
    }

    /// Size of the whole page in screen pixels.
    pub fn screen_size(&self) -> Size {
        let k = self.pixel_scale();
        let size = if self.rotation.swaps_axes() {
            Size::new(self.page_size.height, self.page_size.width)
        } else {
            self.page_size
        };
        Size::new(size.width * k, size.height * k)
    }
}
