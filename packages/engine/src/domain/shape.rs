use serde::Deserialize;

/// Paint attribute references, resolved against the host styling context
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintRefs {
    #[serde(default)]
    pub fill_var: Option<String>,
    #[serde(default)]
    pub stroke_var: Option<String>,
    #[serde(default)]
    pub stroke_width: f32,
}

/// Immutable authoring-side description of one shape
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDefinition {
    pub id: String,
    /// SVG path data (`d` attribute)
    pub path_data: String,
    pub paint: PaintRefs,
    /// How many instances each scene spawns
    pub count: u32,
}

impl ShapeDefinition {
    pub fn new(id: impl Into<String>, path_data: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            path_data: path_data.into(),
            paint: PaintRefs::default(),
            count,
        }
    }

    pub fn with_paint(mut self, paint: PaintRefs) -> Self {
        self.paint = paint;
        self
    }
}
