//! Public types for the Mimir API.

mod model;
mod provider;
mod resolution;

pub use model::{ModelCategory, ModelConfig};
pub use provider::Provider;
pub use resolution::{NotFoundReason, Resolution, ResolvedModel};
