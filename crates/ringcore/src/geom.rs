use derive_more::{Add, Sub};

/// Side length of the square output canvas, in logical pixels.
pub const CANVAS_SIZE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point on the circle of `radius` around `self` at `angle` radians.
    pub fn polar(self, radius: f64, angle: f64) -> Point {
        Point::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

/// Range clamp that never panics: an inverted range yields `hi`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

pub fn angular_length(pixel_width: f64, radius: f64) -> f64 {
    pixel_width / radius
}

/// Ring geometry on a square canvas for a given frame width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub canvas_size: f64,
    pub frame_width: f64,
}

impl FrameGeometry {
    pub fn new(frame_width: f64) -> Self {
        Self::with_canvas(CANVAS_SIZE, frame_width)
    }

    pub fn with_canvas(canvas_size: f64, frame_width: f64) -> Self {
        Self {
            canvas_size,
            frame_width,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.canvas_size / 2.0, self.canvas_size / 2.0)
    }

    /// Inner edge of the ring.
    pub fn radius(&self) -> f64 {
        self.canvas_size / 2.0 - self.frame_width
    }

    /// Centre line of the ring, where text sits.
    pub fn ring_radius(&self) -> f64 {
        self.radius() + self.frame_width / 2.0
    }

    /// Outer edge of the ring; everything is clipped to this.
    pub fn clip_radius(&self) -> f64 {
        self.radius() + self.frame_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn clamp_inverted_range_does_not_panic() {
        assert_eq!(clamp(0.5, 1.0, 0.0), 0.0);
    }

    #[test]
    fn frame_geometry_radii() {
        let g = FrameGeometry::new(120.0);
        assert_eq!(g.center(), Point::new(500.0, 500.0));
        assert_eq!(g.radius(), 380.0);
        assert_eq!(g.ring_radius(), 440.0);
        assert_eq!(g.clip_radius(), 500.0);
    }

    #[test]
    fn angular_length_is_width_over_radius() {
        assert!((angular_length(10.0, 200.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(a.distance(b), 5.0);
    }
}
