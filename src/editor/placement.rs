use crate::geometry::SurfacePoint;

/// Smallest bounding-box width any gesture may shrink the overlay to.
pub const MIN_OVERLAY_SIZE: f64 = 50.0;

const DEFAULT_PLACEMENT_X: f64 = 100.0;
const DEFAULT_PLACEMENT_Y: f64 = 100.0;
const DEFAULT_PLACEMENT_SIZE: f64 = 150.0;

/// Position, width and rotation of the overlay on the surface.
///
/// `x`/`y` name the top-left of the bounding box, `size` its width. The
/// height follows the overlay asset's aspect ratio. `rotation` is in degrees
/// and is never wrapped into a fixed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(
            DEFAULT_PLACEMENT_X,
            DEFAULT_PLACEMENT_Y,
            DEFAULT_PLACEMENT_SIZE,
            0.0,
        )
    }
}

impl Placement {
    pub const fn new(x: f64, y: f64, size: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            size,
            rotation,
        }
    }

    /// Pivot used for rotation, both when drawing and when rotating by pointer.
    pub fn center(&self) -> SurfacePoint {
        let half = self.size / 2.0;
        SurfacePoint::new(self.x + half, self.y + half)
    }

    pub fn overlay_height(&self, aspect_ratio: f64) -> f64 {
        self.size * aspect_ratio
    }

    /// Axis-aligned, inclusive hit-test against the square `size × size` box.
    /// Rotation is not taken into account.
    pub fn contains(&self, point: SurfacePoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.size
            && point.y >= self.y
            && point.y <= self.y + self.size
    }

    /// Re-centers the box under `point`; any grab offset is dropped.
    pub fn centered_on(self, point: SurfacePoint) -> Self {
        let half = self.size / 2.0;
        Self {
            x: point.x - half,
            y: point.y - half,
            ..self
        }
    }

    /// Width follows the horizontal distance from the left edge to `point`.
    pub fn resized_toward(self, point: SurfacePoint) -> Self {
        Self {
            size: clamp_overlay_size(point.x - self.x),
            ..self
        }
    }

    /// Points the overlay at `point`: absolute angle, not a delta.
    pub fn rotated_toward(self, point: SurfacePoint) -> Self {
        Self {
            rotation: self.center().angle_to_degrees(point),
            ..self
        }
    }

    pub fn scaled_and_rotated_by(self, scale: f64, rotation_delta: f64) -> Self {
        Self {
            size: clamp_overlay_size(self.size * scale),
            rotation: self.rotation + rotation_delta,
            ..self
        }
    }
}

/// `f64::max` returns the non-NaN operand, so NaN collapses to the minimum too.
pub(crate) fn clamp_overlay_size(size: f64) -> f64 {
    size.max(MIN_OVERLAY_SIZE)
}
