//! Core: configuration, errors, math and randomness shared by every layer.

pub mod config;
pub mod error;
pub mod random;
pub mod vec2;

pub use config::SceneConfig;
pub use error::{EngineError, GeometryError};
pub use random::Rng;
pub use vec2::Vec2;
