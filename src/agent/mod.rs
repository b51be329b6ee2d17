//! Agents — one per pipeline concern.
//!
//! - `design`: concept variants and critique
//! - `level`: level sequences with difficulty scaling
//! - `asset`: visual style guide
//! - `creation`: the single-game pipeline

pub mod asset;
pub mod creation;
pub mod design;
pub mod level;

pub use asset::AssetAgent;
pub use creation::CreationAgent;
pub use design::DesignAgent;
pub use level::LevelAgent;
