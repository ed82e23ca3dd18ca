//! Renderer trait and registry.
//!
//! Grounded on `original_source/.../dynamic_sections/__init__.py`'s `DynamicSectionRenderer`
//! (the `_render_template` try/except-to-`<error>` convention) and structurally on the
//! teacher's `agenticlaw-tools::registry::{Tool, ToolRegistry}` (register-once, `HashMap`-backed,
//! typed lookup).

use crate::data::{DynamicSectionData, SectionKind};
use std::collections::HashMap;

/// Renders one section variant's snapshot into the text block shown to the agent.
///
/// `future_changes` is the count of *later* auto-replies that also report this section again —
/// renderers may use it to decide whether to show full detail or a terser summary (§4.3).
pub trait SectionRenderer: Send + Sync {
    fn render(&self, data: &DynamicSectionData, future_changes: usize) -> String;
}

/// Maps each [`SectionKind`] to its renderer. Built once at startup and treated as read-only
/// thereafter (Design Note: "global registries ... model as an explicit dependency").
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<SectionKind, Box<dyn SectionRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: SectionKind, renderer: Box<dyn SectionRenderer>) {
        self.renderers.insert(kind, renderer);
    }

    /// Renders `data`, or an inline `<error>` block if no renderer is registered for its kind.
    ///
    /// A missing renderer never aborts the turn — this mirrors
    /// `original_source`'s `DynamicSectionData.deserialize`/render-time fallback, which prints
    /// a warning and degrades gracefully rather than raising.
    pub fn render(&self, data: &DynamicSectionData, future_changes: usize) -> String {
        let kind = data.kind();
        match self.renderers.get(&kind) {
            Some(renderer) => renderer.render(data, future_changes),
            None => format!(
                "<error context=\"{kind:?}\">Missing renderer for section {kind:?}</error>"
            ),
        }
    }
}
