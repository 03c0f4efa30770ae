/// Procedural scenery generation for the driving game
///
/// This module provides the value-noise field, roadside object placement,
/// an opt-in per-segment scene cache, and the sprite lookup table used by
/// renderers.

pub mod world_data;
pub mod noise;
pub mod scenery;
pub mod scene_cache;
pub mod sprite_table;

// Re-export main types for convenience
pub use world_data::{Position, SceneSnapshot, SceneSummary, SceneryKind, SpriteHandle, WorldObject};
pub use noise::{NoiseField, NOISE_TABLE_LEN};
pub use scenery::{base_distance, SceneGenerator, SEGMENT_LENGTH};
pub use scene_cache::SceneCache;
pub use sprite_table::SpriteTable;
