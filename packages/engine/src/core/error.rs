use thiserror::Error;

/// Failures while turning outline data into a physics polygon
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid path data: {0}")]
    InvalidPath(String),
    #[error("outline has no drawable sub-paths")]
    EmptyOutline,
    #[error("polygon is degenerate ({points} points, area {area})")]
    Degenerate { points: usize, area: f32 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config json: {0}")]
    Config(#[source] serde_json::Error),
    #[error("shape bundle json: {0}")]
    Bundle(#[source] serde_json::Error),
    #[error("unsupported shape bundle format version {0}")]
    BundleVersion(u32),
    #[error("shape '{id}': {source}")]
    Shape {
        id: String,
        #[source]
        source: GeometryError,
    },
    #[error("host element missing: {0}")]
    MissingHost(&'static str),
}
