use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::super::render_utils::{node_radius, parse_node_color};
use super::super::{RenderEdge, RenderGraph, RenderNode, ViewModel};

const SEED_RADIUS: f32 = 160.0;

impl ViewModel {
    fn make_render_node(&self, display: usize, index: usize, node_count: usize) -> RenderNode {
        let record = &self.snapshot.nodes[display];

        let world_pos = if node_count == 1 {
            // a lone node settles exactly at the canvas center
            Vec2::ZERO
        } else {
            let (jx, jy) = stable_pair(&record.id);
            let mut direction = vec2(jx, jy);
            if direction.length_sq() <= 0.0001 {
                let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
                direction = vec2(angle.cos(), angle.sin());
            }
            direction * SEED_RADIUS
        };

        RenderNode {
            id: record.id.clone(),
            display,
            kind: record.kind,
            color: parse_node_color(&record.color),
            radius: node_radius(record.size),
            world_pos,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }

    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.graph_revision = self.graph_revision.wrapping_add(1);
        self.search_match_cache = None;
        self.interaction.reset();

        let prior_positions = self
            .graph_cache
            .take()
            .map(|cache| {
                cache
                    .nodes
                    .into_iter()
                    .map(|node| (node.id, (node.world_pos, node.velocity)))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        if self.snapshot.nodes.is_empty() {
            self.dropped_edge_count = 0;
            self.graph_dirty = false;
            return;
        }

        let mut index_by_id = HashMap::with_capacity(self.snapshot.nodes.len());
        let mut nodes = Vec::with_capacity(self.snapshot.nodes.len());
        for (display, record) in self.snapshot.nodes.iter().enumerate() {
            if index_by_id.contains_key(record.id.as_str()) {
                tracing::warn!(id = %record.id, "duplicate node id in snapshot, keeping first");
                continue;
            }

            let index = nodes.len();
            index_by_id.insert(record.id.as_str(), index);
            let mut node = self.make_render_node(display, index, self.snapshot.nodes.len());
            if let Some(&(world_pos, velocity)) = prior_positions.get(&node.id) {
                node.world_pos = world_pos;
                node.velocity = velocity;
            }
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(self.snapshot.edges.len());
        let mut dropped = 0usize;
        for record in &self.snapshot.edges {
            let source = index_by_id.get(record.source.as_str()).copied();
            let target = index_by_id.get(record.target.as_str()).copied();

            match (source, target) {
                (Some(source), Some(target)) => edges.push(RenderEdge {
                    source,
                    target,
                    kind: record.kind,
                    label: record.label.clone(),
                }),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, "dropped edges referencing unknown node ids");
        }

        self.dropped_edge_count = dropped;
        self.graph_cache = Some(RenderGraph::new(nodes, edges));
        self.graph_dirty = false;
    }
}
