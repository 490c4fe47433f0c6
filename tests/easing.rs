#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use portfolio_wasm::parallax::{self, ScrollState};
use portfolio_wasm::spin::SpinAccumulator;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn eased_scroll_converges_without_overshoot() {
    for ease in [0.001, 0.1, 1.0] {
        let mut scroll = ScrollState::new(ease);
        scroll.set_target(1200.0);
        let mut previous_gap = scroll.target - scroll.current;
        for _ in 0..20_000 {
            let current = scroll.ease_step();
            assert!(current <= scroll.target);
            let gap = scroll.target - current;
            assert!(gap <= previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1.0);
    }
}

#[wasm_bindgen_test]
fn text_scale_is_linear() {
    for current in [0.0, 33.0, 480.0] {
        let single = parallax::text_scale(current) - 1.0;
        let double = parallax::text_scale(2.0 * current) - 1.0;
        assert!((double - 2.0 * single).abs() < 1e-12);
    }
}

// One driver tick with the tracked element outside the target-derived
// viewport window: nothing may move, not even the rotation share.
#[wasm_bindgen_test]
fn offscreen_tick_changes_nothing() {
    let mut scroll = ScrollState::new(parallax::EASE);
    scroll.set_target(5000.0);
    let mut spin = SpinAccumulator::default();

    let viewport_h = 800.0;
    let (elem_top, elem_bottom) = (0.0, 900.0);
    assert!(!parallax::band_in_view(scroll.target, viewport_h, elem_top, elem_bottom));

    let current_before = scroll.current;
    let spin_before = spin.angle();
    if parallax::band_in_view(scroll.target, viewport_h, elem_top, elem_bottom) {
        let current = scroll.ease_step();
        spin.add_scroll_contribution(parallax::spin_contribution(current));
    }
    assert_eq!(scroll.current, current_before);
    assert_eq!(spin.angle(), spin_before);
}

#[wasm_bindgen_test]
fn both_spin_sources_accumulate() {
    let mut spin = SpinAccumulator::default();
    spin.add_frame_contribution(0.0025);
    spin.add_scroll_contribution(parallax::spin_contribution(400.0));
    assert!((spin.angle() - (0.0025 + 400.0 * 1e-7)).abs() < 1e-15);
}
