use eframe::egui::{Pos2, Rect, Vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 4.0;

const RESET_DURATION_SECS: f64 = 0.5;

/// Pan/zoom state mapping simulation space to screen space. Simulation
/// origin projects to the canvas center at identity.
pub(in crate::app) struct Camera {
    pub(in crate::app) pan: Vec2,
    pub(in crate::app) zoom: f32,
    reset: Option<ResetAnimation>,
}

struct ResetAnimation {
    from_pan: Vec2,
    from_zoom: f32,
    started_at: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            reset: None,
        }
    }
}

impl Camera {
    pub(in crate::app) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub(in crate::app) fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Scales around the given screen-space focal point; the simulation
    /// point under the pointer stays put. Repeated gestures accumulate
    /// into the one transform.
    pub(in crate::app) fn zoom_around(&mut self, rect: Rect, focus: Pos2, factor: f32) {
        let world_at_focus = self.screen_to_world(rect, focus);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = focus - rect.center() - world_at_focus * self.zoom;
        self.reset = None;
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
        self.reset = None;
    }

    /// Starts the animated return to the identity transform.
    pub(in crate::app) fn begin_reset(&mut self, now: f64) {
        if self.pan == Vec2::ZERO && self.zoom == 1.0 {
            return;
        }

        self.reset = Some(ResetAnimation {
            from_pan: self.pan,
            from_zoom: self.zoom,
            started_at: now,
        });
    }

    /// Advances the reset animation. Returns `true` while more frames are
    /// needed.
    pub(in crate::app) fn animate(&mut self, now: f64) -> bool {
        let Some(anim) = &self.reset else {
            return false;
        };

        let t = ((now - anim.started_at) / RESET_DURATION_SECS).clamp(0.0, 1.0) as f32;
        let eased = ease_in_out_cubic(t);
        self.pan = anim.from_pan * (1.0 - eased);
        self.zoom = anim.from_zoom + (1.0 - anim.from_zoom) * eased;

        if t >= 1.0 {
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
            self.reset = None;
            return false;
        }
        true
    }
}

fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - (inv * inv * inv) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    #[test]
    fn screen_world_round_trip() {
        let mut camera = Camera::default();
        camera.pan = vec2(37.0, -12.0);
        camera.zoom = 1.7;

        let world = vec2(120.0, -45.0);
        let screen = camera.world_to_screen(canvas(), world);
        let back = camera.screen_to_world(canvas(), screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn zoom_in_never_exceeds_upper_bound() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.zoom_around(canvas(), pos2(400.0, 300.0), 1.15);
        }
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn zoom_out_never_drops_below_lower_bound() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.zoom_around(canvas(), pos2(400.0, 300.0), 0.85);
        }
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_keeps_focal_point_fixed() {
        let mut camera = Camera::default();
        camera.pan = vec2(25.0, 40.0);

        let focus = pos2(530.0, 210.0);
        let world_before = camera.screen_to_world(canvas(), focus);
        camera.zoom_around(canvas(), focus, 1.12);
        let screen_after = camera.world_to_screen(canvas(), world_before);

        assert!((screen_after - focus).length() < 1e-3);
    }

    #[test]
    fn pan_gestures_accumulate() {
        let mut camera = Camera::default();
        camera.pan_by(vec2(10.0, 0.0));
        camera.pan_by(vec2(5.0, -8.0));
        assert_eq!(camera.pan, vec2(15.0, -8.0));
    }

    #[test]
    fn reset_animates_to_identity() {
        let mut camera = Camera::default();
        camera.pan = vec2(140.0, -60.0);
        camera.zoom = 3.0;

        camera.begin_reset(10.0);
        assert!(camera.animate(10.25));
        assert!(camera.zoom > 1.0 && camera.zoom < 3.0);
        assert!(camera.pan.length() < 140.0 + 60.0);

        assert!(!camera.animate(10.5));
        assert_eq!(camera.pan, Vec2::ZERO);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn gesture_cancels_reset_animation() {
        let mut camera = Camera::default();
        camera.pan = vec2(140.0, -60.0);
        camera.zoom = 3.0;

        camera.begin_reset(10.0);
        camera.animate(10.1);
        camera.pan_by(vec2(1.0, 0.0));
        assert!(!camera.animate(10.2));
    }

    #[test]
    fn reset_from_identity_is_a_no_op() {
        let mut camera = Camera::default();
        camera.begin_reset(5.0);
        assert!(!camera.animate(5.1));
    }
}
