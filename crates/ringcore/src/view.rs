use crate::geom::{FrameGeometry, Point, clamp};

pub const MIN_SCALE: f64 = 0.3;
pub const MAX_SCALE: f64 = 5.0;

pub fn clamp_scale(s: f64) -> f64 {
    clamp(s, MIN_SCALE, MAX_SCALE)
}

/// Largest pan distance per axis before the ring would expose blank canvas.
pub fn pan_limit(scale: f64, frame_width: f64, canvas_size: f64) -> f64 {
    let r = canvas_size / 2.0 - frame_width;
    let half = canvas_size * scale / 2.0;
    (half - r).max(0.0)
}

pub fn clamp_offset(proposed: Point, scale: f64, frame_width: f64, canvas_size: f64) -> Point {
    let max = pan_limit(scale, frame_width, canvas_size);
    Point::new(clamp(proposed.x, -max, max), clamp(proposed.y, -max, max))
}

/// Pan offset and zoom scale of the photo under the frame.
///
/// Both fields stay within their bounds: every mutation that touches the
/// scale also re-clamps the offset, since the offset bounds depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    offset: Point,
    scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            scale: 1.0,
        }
    }
}

impl ViewState {
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn clamp_offset(&self, proposed: Point, geometry: &FrameGeometry) -> Point {
        clamp_offset(
            proposed,
            self.scale,
            geometry.frame_width,
            geometry.canvas_size,
        )
    }

    pub fn apply_pan(&mut self, delta: Point, geometry: &FrameGeometry) -> Point {
        self.offset = self.clamp_offset(self.offset + delta, geometry);
        self.offset
    }

    pub fn apply_zoom_delta(&mut self, delta: f64, geometry: &FrameGeometry) -> f64 {
        self.set_scale(self.scale + delta, geometry)
    }

    pub fn set_scale(&mut self, scale: f64, geometry: &FrameGeometry) -> f64 {
        self.scale = clamp_scale(scale);
        self.reclamp(geometry);
        self.scale
    }

    /// Pulls the offset back inside the bounds for the current scale and
    /// geometry.
    pub fn reclamp(&mut self, geometry: &FrameGeometry) -> Point {
        self.offset = self.clamp_offset(self.offset, geometry);
        self.offset
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CANVAS_SIZE;

    #[test]
    fn test_clamp_offset_frame_120_scale_1() {
        let p = clamp_offset(Point::new(500.0, 500.0), 1.0, 120.0, CANVAS_SIZE);
        assert_eq!(p, Point::new(120.0, 120.0));
        let p = clamp_offset(Point::new(-500.0, 40.0), 1.0, 120.0, CANVAS_SIZE);
        assert_eq!(p, Point::new(-120.0, 40.0));
    }

    #[test]
    fn test_clamp_offset_no_slack_when_image_fits() {
        assert_eq!(pan_limit(0.5, 120.0, CANVAS_SIZE), 0.0);
        for proposed in [Point::new(10.0, -3.0), Point::new(-900.0, 900.0)] {
            assert_eq!(
                clamp_offset(proposed, 0.5, 120.0, CANVAS_SIZE),
                Point::new(0.0, 0.0)
            );
        }
    }

    #[test]
    fn test_clamp_offset_within_limit_for_scale_sweep() {
        let frame_width = 80.0;
        let mut s = MIN_SCALE;
        while s <= MAX_SCALE {
            let max = (CANVAS_SIZE * s / 2.0 - (CANVAS_SIZE / 2.0 - frame_width)).max(0.0);
            for proposed in [
                Point::new(1e6, -1e6),
                Point::new(-37.5, 12.0),
                Point::new(0.0, 0.0),
            ] {
                let p = clamp_offset(proposed, s, frame_width, CANVAS_SIZE);
                assert!(p.x.abs() <= max && p.y.abs() <= max, "scale {}: {:?}", s, p);
            }
            s += 0.05;
        }
    }

    #[test]
    fn test_clamp_scale_idempotent() {
        for s in [-10.0, 0.0, 0.3, 0.31, 1.0, 4.99, 5.0, 123.0] {
            let once = clamp_scale(s);
            assert_eq!(clamp_scale(once), once);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&once));
        }
    }

    #[test]
    fn test_zoom_out_reclamps_offset() {
        let geometry = FrameGeometry::new(120.0);
        let mut view = ViewState::default();
        view.set_scale(2.0, &geometry);
        view.apply_pan(Point::new(400.0, -400.0), &geometry);
        assert_eq!(view.offset(), Point::new(400.0, -400.0));

        view.apply_zoom_delta(-1.0, &geometry);
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.offset(), Point::new(120.0, -120.0));
    }

    #[test]
    fn test_zoom_delta_is_clamped() {
        let geometry = FrameGeometry::new(120.0);
        let mut view = ViewState::default();
        assert_eq!(view.apply_zoom_delta(100.0, &geometry), MAX_SCALE);
        assert_eq!(view.apply_zoom_delta(-100.0, &geometry), MIN_SCALE);
        assert_eq!(view.offset(), Point::default());
    }

    #[test]
    fn test_reset() {
        let geometry = FrameGeometry::new(50.0);
        let mut view = ViewState::default();
        view.set_scale(3.0, &geometry);
        view.apply_pan(Point::new(200.0, 200.0), &geometry);
        view.reset();
        assert_eq!(view, ViewState::default());
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.offset(), Point::new(0.0, 0.0));
    }
}
