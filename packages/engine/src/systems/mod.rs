//! Systems: the pieces a scene is assembled from.
//!
//! Each system is independent of `Scene` and testable on its own; the
//! simulation module wires them together per frame.

pub mod arena;
pub mod body_factory;
pub mod dirty;
pub mod input;
pub mod layout;
pub mod lift;
pub mod physics_world;
pub mod responsive;

pub use arena::{Arena, WallRect, WallSide};
pub use body_factory::{create_body, rescale_body, BodyHandles};
pub use dirty::{DirtyTracker, TransformSnapshot};
pub use input::{InputDispatcher, LiftInput, LiftSink, ScrollTracker};
pub use layout::{spawn_plan, SpawnPoint};
pub use lift::{ease_factor, step_cap, InputOutcome, LiftState};
pub use physics_world::{BodyState, PhysicsWorld};
pub use responsive::target_scale;
