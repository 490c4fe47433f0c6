//! Scroll easing and parallax scale math.
//!
//! The driver keeps an eased scroll value that chases the real scroll offset
//! and turns it into CSS scale factors for the hero text layers and the 3D
//! canvas. Everything here is plain math so it can be exercised without a
//! DOM.

/// Scale gained per scrolled pixel by the text layers.
pub const TEXT_SCALE_PER_PX: f64 = 0.0005;
/// Scale gained per scrolled pixel by the canvas.
pub const CANVAS_SCALE_PER_PX: f64 = 0.000_25;
/// Rotation added to the scene per scrolled pixel, per tick.
pub const SPIN_PER_SCROLL_PX: f64 = 0.000_000_1;
/// Easing factor. Must stay in (0, 1]; smaller is smoother.
pub const EASE: f64 = 0.001;
/// Update cadence of the driver, decoupled from the display refresh.
pub const TICK_MS: i32 = 1000 / 60;

/// Eased scroll offset chasing the document's real scroll position.
#[derive(Debug, Clone, Copy)]
pub struct ScrollState {
    pub current: f64,
    pub target: f64,
    pub ease: f64,
}

impl ScrollState {
    pub fn new(ease: f64) -> Self {
        debug_assert!(ease > 0.0 && ease <= 1.0);
        Self {
            current: 0.0,
            target: 0.0,
            ease,
        }
    }

    /// Record a new absolute scroll offset to chase.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Move `current` one easing step toward `target` and return it.
    pub fn ease_step(&mut self) -> f64 {
        self.current += (self.target - self.current) * self.ease;
        self.current
    }
}

/// Whether the element spanning `[elem_top, elem_bottom]` (document
/// coordinates) overlaps the viewport window derived from the scroll
/// *target*. Using the target instead of the eased value makes the easing
/// lag visibly near the boundary; that is the intended behavior, not
/// something to smooth over.
pub fn band_in_view(target: f64, viewport_h: f64, elem_top: f64, elem_bottom: f64) -> bool {
    !(target + viewport_h < elem_top || target > elem_bottom)
}

pub fn text_scale(current: f64) -> f64 {
    1.0 + current * TEXT_SCALE_PER_PX
}

pub fn canvas_scale(current: f64) -> f64 {
    1.0 + current * CANVAS_SCALE_PER_PX
}

/// Rotation contributed to the scene by one driver tick.
pub fn spin_contribution(current: f64) -> f64 {
    current * SPIN_PER_SCROLL_PX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_converges_without_overshoot() {
        for ease in [0.001, 0.1, 0.5, 1.0] {
            let mut state = ScrollState::new(ease);
            state.set_target(500.0);
            let mut previous_gap = (state.target - state.current).abs();
            for _ in 0..20_000 {
                let current = state.ease_step();
                assert!(current <= state.target, "overshot at ease={ease}");
                let gap = (state.target - current).abs();
                assert!(gap <= previous_gap, "diverged at ease={ease}");
                previous_gap = gap;
            }
            assert!(previous_gap < 1.0, "did not converge at ease={ease}");
        }
    }

    #[test]
    fn easing_handles_downward_targets() {
        let mut state = ScrollState::new(0.25);
        state.current = 800.0;
        state.set_target(100.0);
        let mut previous = state.current;
        for _ in 0..200 {
            let current = state.ease_step();
            assert!(current >= state.target);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn text_scale_is_linear_in_current() {
        for current in [0.0, 10.0, 250.0, 1234.5] {
            let single = text_scale(current) - 1.0;
            let double = text_scale(2.0 * current) - 1.0;
            assert!((double - 2.0 * single).abs() < 1e-12);
        }
    }

    #[test]
    fn band_test_uses_the_target_window() {
        // Element spans 1000..2000 in document coordinates, viewport is 600 tall.
        assert!(!band_in_view(0.0, 600.0, 1000.0, 2000.0));
        assert!(band_in_view(400.0, 600.0, 1000.0, 2000.0));
        assert!(band_in_view(1999.0, 600.0, 1000.0, 2000.0));
        assert!(!band_in_view(2001.0, 600.0, 1000.0, 2000.0));
    }
}
