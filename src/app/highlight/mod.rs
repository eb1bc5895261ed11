use std::collections::HashSet;

use super::RenderGraph;

/// Opacity levels for the hover-dim overlay, grouped here rather than
/// scattered through the render pass.
#[derive(Clone, Copy, Debug)]
pub(super) struct HighlightStyle {
    pub dim_node_opacity: f32,
    pub dim_edge_opacity: f32,
    pub rest_edge_opacity: f32,
    pub rest_edge_label_opacity: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            dim_node_opacity: 0.15,
            dim_edge_opacity: 0.08,
            rest_edge_opacity: 0.6,
            rest_edge_label_opacity: 0.7,
        }
    }
}

pub(super) struct HighlightState {
    focus: usize,
    members: HashSet<usize>,
}

/// The hovered node plus everything directly connected to it, via any edge
/// in either direction.
pub(super) fn build_highlight_state(cache: &RenderGraph, hovered: usize) -> HighlightState {
    let mut members = HashSet::new();
    members.insert(hovered);

    if let Some(neighbors) = cache.neighbors.get(hovered) {
        members.extend(neighbors.iter().copied());
    }

    HighlightState {
        focus: hovered,
        members,
    }
}

impl HighlightState {
    pub(super) fn contains_node(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub(super) fn edge_is_active(&self, source: usize, target: usize) -> bool {
        source == self.focus || target == self.focus
    }

    #[cfg(test)]
    pub(super) fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl HighlightStyle {
    pub(super) fn node_opacity(&self, highlight: Option<&HighlightState>, index: usize) -> f32 {
        match highlight {
            None => 1.0,
            Some(state) if state.contains_node(index) => 1.0,
            Some(_) => self.dim_node_opacity,
        }
    }

    pub(super) fn edge_opacity(
        &self,
        highlight: Option<&HighlightState>,
        source: usize,
        target: usize,
    ) -> f32 {
        match highlight {
            None => self.rest_edge_opacity,
            Some(state) if state.edge_is_active(source, target) => self.rest_edge_opacity,
            Some(_) => self.dim_edge_opacity,
        }
    }

    pub(super) fn edge_label_opacity(
        &self,
        highlight: Option<&HighlightState>,
        source: usize,
        target: usize,
    ) -> f32 {
        match highlight {
            None => self.rest_edge_label_opacity,
            Some(state) if state.edge_is_active(source, target) => self.rest_edge_label_opacity,
            Some(_) => self.dim_edge_opacity,
        }
    }
}
