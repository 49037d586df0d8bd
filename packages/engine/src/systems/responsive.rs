//! Responsive scale table
//!
//! The rule is picked by viewport width (first rule by ascending
//! `max_viewport_width`; a rule without a bound matches everything). The size
//! itself comes from the container: `max(min_px, container * pct)`.

use crate::core::config::{ResponsiveConfig, ResponsiveRule};

pub fn select_rule(cfg: &ResponsiveConfig, viewport_width: f32) -> Option<&ResponsiveRule> {
    let mut rules: Vec<&ResponsiveRule> = cfg.rules.iter().collect();
    rules.sort_by(|a, b| {
        let a = a.max_viewport_width.unwrap_or(f32::INFINITY);
        let b = b.max_viewport_width.unwrap_or(f32::INFINITY);
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    });
    rules
        .iter()
        .copied()
        .find(|r| r.max_viewport_width.map_or(true, |max| viewport_width <= max))
        .or_else(|| rules.last().copied())
}

/// Target pixel width of one shape
pub fn target_width(cfg: &ResponsiveConfig, container_width: f32, viewport_width: f32) -> Option<f32> {
    let rule = select_rule(cfg, viewport_width)?;
    Some(rule.min_px.max(container_width * rule.percent_of_container))
}

/// Scale factor for outlines authored `reference_width` units wide.
///
/// `None` when the result would not be a positive finite number.
pub fn target_scale(
    cfg: &ResponsiveConfig,
    reference_width: f32,
    container_width: f32,
    viewport_width: f32,
) -> Option<f32> {
    if !(reference_width > 0.0) {
        return None;
    }
    let scale = target_width(cfg, container_width, viewport_width)? / reference_width;
    (scale.is_finite() && scale > 0.0).then_some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_by_viewport() {
        let cfg = ResponsiveConfig::default();
        assert_eq!(select_rule(&cfg, 400.0).unwrap().min_px, 150.0);
        assert_eq!(select_rule(&cfg, 480.0).unwrap().min_px, 150.0);
        assert_eq!(select_rule(&cfg, 700.0).unwrap().min_px, 175.0);
        assert_eq!(select_rule(&cfg, 1440.0).unwrap().percent_of_container, 0.30);
    }

    #[test]
    fn rule_order_in_config_does_not_matter() {
        let mut cfg = ResponsiveConfig::default();
        cfg.rules.reverse();
        assert_eq!(select_rule(&cfg, 400.0).unwrap().min_px, 150.0);
        assert_eq!(select_rule(&cfg, 2000.0).unwrap().max_viewport_width, None);
    }

    #[test]
    fn scale_uses_container_width_and_floor() {
        let cfg = ResponsiveConfig::default();
        // desktop: 30% of 1000 = 300 -> 300/500
        assert!((target_scale(&cfg, 500.0, 1000.0, 1200.0).unwrap() - 0.6).abs() < 1e-6);
        // phone: 60% of 200 = 120 < 150 floor
        assert!((target_scale(&cfg, 500.0, 200.0, 360.0).unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        let cfg = ResponsiveConfig::default();
        assert!(target_scale(&cfg, 500.0, 0.0, 1200.0).is_none());
        assert!(target_scale(&cfg, 0.0, 800.0, 1200.0).is_none());
        assert!(target_scale(&ResponsiveConfig { rules: Vec::new() }, 500.0, 800.0, 800.0).is_none());
    }
}
