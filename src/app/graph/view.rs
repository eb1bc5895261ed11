use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, StrokeKind, Ui,
    vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::snapshot::NodeRecord;
use crate::util::format_ports;

use super::super::camera::Camera;
use super::super::highlight::build_highlight_state;
use super::super::physics::step_simulation;
use super::super::render_utils::{
    EDGE_DASH_LENGTH, EDGE_GAP_LENGTH, NODE_FILL_OPACITY, NODE_STROKE_WIDTH, NodeShape,
    diamond_points, draw_background, edge_color, edge_is_dashed, fade, shape_for, square_rect,
};
use super::super::{RenderGraph, SearchMatchCache, ViewModel};
use super::interaction::ClickTarget;

const EDGE_STROKE_WIDTH: f32 = 1.5;
const TOOLTIP_OFFSET: egui::Vec2 = egui::Vec2::new(14.0, 18.0);
const LABEL_COLOR: Color32 = Color32::from_gray(225);
const SELECTION_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn record_matches(matcher: &SkimMatcherV2, record: &NodeRecord, query: &str) -> bool {
    let mut fields = vec![record.label.as_str(), record.id.as_str()];
    if let Some(ip) = &record.ip {
        fields.push(ip.as_str());
    }
    if let Some(hostname) = &record.hostname {
        fields.push(hostname.as_str());
    }

    fields
        .into_iter()
        .any(|text| fuzzy_match_score(matcher, text, query).is_some())
}

impl ViewModel {
    fn update_screen_space(rect: Rect, camera: &Camera, cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_sizes.clear();
        scratch
            .screen_positions
            .reserve(cache.nodes.len().saturating_sub(scratch.screen_positions.capacity()));
        scratch
            .screen_sizes
            .reserve(cache.nodes.len().saturating_sub(scratch.screen_sizes.capacity()));

        for node in &cache.nodes {
            scratch
                .screen_positions
                .push(camera.world_to_screen(rect, node.world_pos));
            scratch.screen_sizes.push(node.radius * camera.zoom);
        }
    }

    fn handle_wheel_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom_around(rect, pointer, factor);
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.graph_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.graph_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let record = &self.snapshot.nodes[node.display];
                if record_matches(&matcher, record, query) {
                    Some(index)
                } else {
                    None
                }
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.camera.pan, self.camera.zoom);

        let now = ui.input(|input| input.time);
        let camera_animating = self.camera.animate(now);
        self.handle_wheel_zoom(ui, rect, &response);

        let search_matches = self.cached_search_matches();
        let style = self.highlight_style;

        let Some(cache) = self.graph_cache.as_mut() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Snapshot contains no nodes.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            if camera_animating {
                ui.ctx().request_repaint();
            }
            return;
        };

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let (primary_pressed, primary_released, pointer_delta) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.delta(),
            )
        });

        if primary_pressed
            && response.hovered()
            && let Some(pos) = pointer
        {
            self.interaction.pointer_pressed(cache, &self.camera, rect, pos);
        }
        if pointer_delta != egui::Vec2::ZERO
            && let Some(pos) = pointer
        {
            self.interaction
                .pointer_moved(cache, &mut self.camera, rect, pos, pointer_delta);
        }
        let mut pending_click = None;
        if primary_released {
            pending_click = self.interaction.pointer_released(cache);
        }

        let mut simulation_hot = false;
        if self.live_physics {
            simulation_hot = step_simulation(cache, &self.simulation);
        }
        if simulation_hot || self.interaction.is_dragging() || camera_animating {
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, &self.camera, cache);

        let pointer_in_rect = pointer.filter(|pos| rect.contains(*pos));
        self.interaction
            .update_hover(cache, &self.camera, rect, pointer_in_rect);
        let hovered = self.interaction.hovered();

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let highlight = hovered.map(|index| build_highlight_state(cache, index));

        // paint order: every edge, then every node, then every label
        for edge in &cache.edges {
            let start = cache.view_scratch.screen_positions[edge.source];
            let end = cache.view_scratch.screen_positions[edge.target];

            let opacity = style.edge_opacity(highlight.as_ref(), edge.source, edge.target);
            let stroke = Stroke::new(EDGE_STROKE_WIDTH, fade(edge_color(edge.kind), opacity));
            if edge_is_dashed(edge.kind) {
                painter.extend(Shape::dashed_line(
                    &[start, end],
                    stroke,
                    EDGE_DASH_LENGTH,
                    EDGE_GAP_LENGTH,
                ));
            } else {
                painter.line_segment([start, end], stroke);
            }
        }

        let node_opacity = |index: usize| {
            let opacity = style.node_opacity(highlight.as_ref(), index);
            if highlight.is_none()
                && let Some(matches) = &search_matches
                && !matches.contains(&index)
            {
                return style.dim_node_opacity;
            }
            opacity
        };

        for (index, node) in cache.nodes.iter().enumerate() {
            let position = cache.view_scratch.screen_positions[index];
            let size = cache.view_scratch.screen_sizes[index];

            let opacity = node_opacity(index);
            let fill = fade(node.color, NODE_FILL_OPACITY * opacity);
            let stroke = Stroke::new(NODE_STROKE_WIDTH, fade(node.color, opacity));

            match shape_for(node.kind) {
                NodeShape::Diamond => {
                    painter.add(Shape::convex_polygon(
                        diamond_points(position, size),
                        fill,
                        stroke,
                    ));
                }
                NodeShape::Square => {
                    let square = square_rect(position, size);
                    painter.rect_filled(square, 3.0, fill);
                    painter.rect_stroke(square, 3.0, stroke, StrokeKind::Middle);
                }
                NodeShape::Circle => {
                    painter.circle_filled(position, size, fill);
                    painter.circle_stroke(position, size, stroke);
                }
            }

            if self.selected.as_deref() == Some(node.id.as_str()) {
                painter.circle_stroke(
                    position,
                    size + 5.0,
                    Stroke::new(1.6, fade(SELECTION_COLOR, opacity.max(0.8))),
                );
            }
        }

        for edge in &cache.edges {
            let Some(label) = &edge.label else {
                continue;
            };

            let start = cache.view_scratch.screen_positions[edge.source];
            let end = cache.view_scratch.screen_positions[edge.target];
            let label_opacity =
                style.edge_label_opacity(highlight.as_ref(), edge.source, edge.target);
            painter.text(
                start + (end - start) * 0.5,
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(10.0),
                fade(LABEL_COLOR, label_opacity),
            );
        }

        for (index, node) in cache.nodes.iter().enumerate() {
            let position = cache.view_scratch.screen_positions[index];
            let size = cache.view_scratch.screen_sizes[index];
            let record = &self.snapshot.nodes[node.display];

            painter.text(
                position + vec2(0.0, size + 5.0),
                Align2::CENTER_TOP,
                record.display_label(),
                FontId::proportional(11.0),
                fade(LABEL_COLOR, node_opacity(index)),
            );
        }

        if let Some(index) = hovered
            && let Some(pos) = pointer_in_rect
        {
            let record = &self.snapshot.nodes[cache.nodes[index].display];
            draw_node_tooltip(ui.ctx(), pos, record);
        }

        if let Some(click) = pending_click {
            let selection = match click {
                ClickTarget::Node(index) => Some(cache.nodes[index].id.clone()),
                ClickTarget::Canvas => None,
            };
            self.set_selected(selection);
        }
    }
}

fn draw_node_tooltip(ctx: &egui::Context, pointer: Pos2, record: &NodeRecord) {
    egui::Area::new(egui::Id::new("node_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(pointer + TOOLTIP_OFFSET)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(record.display_label()).strong());
                if let Some(ip) = &record.ip {
                    ui.label(format!("IP: {ip}"));
                }
                if let Some(hostname) = &record.hostname {
                    ui.label(format!("Hostname: {hostname}"));
                }
                if let Some(vendor) = &record.vendor {
                    ui.label(format!("Vendor: {vendor}"));
                }
                if !record.bigr_category.is_empty() {
                    ui.label(format!("Category: {}", record.bigr_category));
                }
                ui.label(format!("Type: {}", record.kind.label()));
                ui.label(format!("Open ports: {}", format_ports(&record.open_ports)));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TopologySnapshot;

    fn model_with(raw: &str) -> ViewModel {
        let snapshot: TopologySnapshot = serde_json::from_str(raw).unwrap();
        let mut model = ViewModel::new(snapshot);
        model.rebuild_render_graph();
        model
    }

    #[test]
    fn search_matches_by_label_ip_and_hostname() {
        let mut model = model_with(
            r#"{
                "nodes": [
                    {"id": "gw", "label": "Edge Gateway", "type": "gateway", "ip": "10.0.0.1"},
                    {"id": "host-1", "label": "host-1", "type": "device",
                     "hostname": "printer.lan"},
                    {"id": "host-2", "label": "host-2", "type": "device"}
                ],
                "edges": []
            }"#,
        );

        model.search = "gateway".to_owned();
        let matches = model.cached_search_matches().unwrap();
        assert!(matches.contains(&0));
        assert!(!matches.contains(&2));

        model.search = "printer".to_owned();
        let matches = model.cached_search_matches().unwrap();
        assert!(matches.contains(&1));
    }

    #[test]
    fn search_cache_is_reused_for_the_same_query_and_revision() {
        let mut model = model_with(
            r#"{
                "nodes": [{"id": "a", "label": "alpha", "type": "device"}],
                "edges": []
            }"#,
        );

        model.search = "alpha".to_owned();
        let first = model.cached_search_matches().unwrap();
        let second = model.cached_search_matches().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        model.rebuild_render_graph();
        let third = model.cached_search_matches().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let mut model = model_with(
            r#"{
                "nodes": [{"id": "a", "label": "alpha", "type": "device"}],
                "edges": []
            }"#,
        );

        model.search = "   ".to_owned();
        assert!(model.cached_search_matches().is_none());
    }
}
