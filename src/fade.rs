//! Visibility-threshold policy for the fade-in sections.
//!
//! Each tracked section carries its own intersection-ratio threshold; there
//! is no global constant and no coordination between sections.

/// Class toggled on a section when it is sufficiently visible.
pub const MARKER_CLASS: &str = "fade-in";

/// One tracked page region.
#[derive(Debug, Clone, Copy)]
pub struct FadeRule {
    pub selector: &'static str,
    pub threshold: f64,
}

/// All observed sections and their thresholds.
pub const SECTIONS: &[FadeRule] = &[
    FadeRule { selector: ".about-section", threshold: 0.4 },
    FadeRule { selector: ".education-section", threshold: 0.4 },
    FadeRule { selector: ".certificates-section", threshold: 0.1 },
    FadeRule { selector: ".skills-section", threshold: 0.4 },
    FadeRule { selector: ".work-experience", threshold: 0.3 },
    FadeRule { selector: ".organizations", threshold: 0.3 },
    FadeRule { selector: ".projects", threshold: 0.1 },
    FadeRule { selector: ".hobbies", threshold: 0.5 },
    FadeRule { selector: ".bottom-socials", threshold: 1.0 },
];

/// The marker is present exactly when the visible ratio reaches the
/// section's threshold.
pub fn reveals(threshold: f64, ratio: f64) -> bool {
    ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_follows_the_threshold_in_both_directions() {
        assert!(!reveals(0.4, 0.39));
        assert!(reveals(0.4, 0.4));
        assert!(reveals(0.4, 0.41));
        // Crossing back down removes it again.
        let ratios = [0.0, 0.2, 0.45, 0.8, 0.45, 0.2, 0.0];
        let shown: Vec<bool> = ratios.iter().map(|r| reveals(0.4, *r)).collect();
        assert_eq!(shown, [false, false, true, true, true, false, false]);
    }

    #[test]
    fn every_section_applies_its_own_threshold() {
        for rule in SECTIONS {
            assert!(reveals(rule.threshold, rule.threshold));
            assert!(!reveals(rule.threshold, rule.threshold - 0.01));
        }
    }

    #[test]
    fn full_visibility_section_needs_the_whole_element() {
        let rule = SECTIONS
            .iter()
            .find(|r| r.selector == ".bottom-socials")
            .unwrap();
        assert!(!reveals(rule.threshold, 0.99));
        assert!(reveals(rule.threshold, 1.0));
    }
}
