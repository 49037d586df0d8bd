//! Paint resolution
//!
//! Definitions reference colors by custom-property name; an instance resolves
//! them once, at scene construction, against whatever styling context the
//! host provides.

use std::collections::HashMap;

use super::shape::PaintRefs;

pub const DEFAULT_FILL: &str = "#222";

/// Resolved paint for one instance
#[derive(Clone, Debug, PartialEq)]
pub struct PaintStyle {
    pub fill: String,
    pub stroke: Option<String>,
    pub line_width: f32,
}

impl PaintStyle {
    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some() && self.line_width > 0.0
    }
}

/// Looks up a style variable in the host context
pub trait StyleResolver {
    fn resolve(&self, var_name: &str) -> Option<String>;
}

/// Resolver with no variables; every instance gets the default paint
pub struct NoStyles;

impl StyleResolver for NoStyles {
    fn resolve(&self, _var_name: &str) -> Option<String> {
        None
    }
}

impl StyleResolver for HashMap<String, String> {
    fn resolve(&self, var_name: &str) -> Option<String> {
        self.get(var_name).cloned()
    }
}

pub fn resolve_paint(refs: &PaintRefs, resolver: &dyn StyleResolver) -> PaintStyle {
    let lookup = |var: &Option<String>| {
        var.as_deref()
            .and_then(|name| resolver.resolve(name))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    PaintStyle {
        fill: lookup(&refs.fill_var).unwrap_or_else(|| DEFAULT_FILL.to_string()),
        stroke: lookup(&refs.stroke_var),
        line_width: refs.stroke_width.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_fall_back() {
        let refs = PaintRefs {
            fill_var: Some("--fill".into()),
            stroke_var: Some("--stroke".into()),
            stroke_width: 2.0,
        };
        let style = resolve_paint(&refs, &NoStyles);
        assert_eq!(style.fill, DEFAULT_FILL);
        assert_eq!(style.stroke, None);
        assert!(!style.has_stroke());
    }

    #[test]
    fn resolved_values_are_trimmed() {
        let mut vars = HashMap::new();
        vars.insert("--fill".to_string(), "  #ff0000 ".to_string());
        vars.insert("--stroke".to_string(), "   ".to_string());
        let refs = PaintRefs {
            fill_var: Some("--fill".into()),
            stroke_var: Some("--stroke".into()),
            stroke_width: 1.0,
        };
        let style = resolve_paint(&refs, &vars);
        assert_eq!(style.fill, "#ff0000");
        assert_eq!(style.stroke, None);
    }
}
