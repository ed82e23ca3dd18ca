//! The dynamic section engine: a closed family of value-equal context snapshots plus their
//! renderers, diffed turn over turn by `dr-history`'s auto-reply aggregator.

pub mod builtin;
pub mod data;
pub mod renderer;

pub use data::{DynamicSectionData, SectionKind};
pub use renderer::{RendererRegistry, SectionRenderer};
