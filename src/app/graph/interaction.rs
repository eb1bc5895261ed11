use eframe::egui::{Pos2, Rect, Vec2};

use super::super::camera::Camera;
use super::super::physics::DRAG_ALPHA;
use super::super::render_utils::{hit_test_shape, shape_for};
use super::super::RenderGraph;

/// Cumulative pointer travel (screen px) separating a click from a drag.
const DRAG_THRESHOLD: f32 = 4.0;

#[derive(Clone, Copy)]
enum PointerState {
    Idle,
    /// Button is down but travel is still within the click threshold.
    Pressed {
        node: Option<usize>,
        travelled: f32,
    },
    DraggingNode {
        node: usize,
    },
    Panning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ClickTarget {
    Node(usize),
    Canvas,
}

/// Classifies raw pointer events into drag / pan / hover / click. Driven by
/// the render pass from egui input, and by synthetic event sequences in
/// tests.
pub(in crate::app) struct InteractionController {
    pointer: PointerState,
    hovered: Option<usize>,
}

impl InteractionController {
    pub(in crate::app) fn new() -> Self {
        Self {
            pointer: PointerState::Idle,
            hovered: None,
        }
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        matches!(
            self.pointer,
            PointerState::DraggingNode { .. } | PointerState::Panning
        )
    }

    /// Drops any in-flight gesture; called when the graph cache is replaced
    /// so stale indices never reach a new graph.
    pub(in crate::app) fn reset(&mut self) {
        self.pointer = PointerState::Idle;
        self.hovered = None;
    }

    pub(in crate::app) fn update_hover(
        &mut self,
        cache: &RenderGraph,
        camera: &Camera,
        rect: Rect,
        pointer: Option<Pos2>,
    ) {
        self.hovered = pointer.and_then(|pos| hit_node(cache, camera, rect, pos));
    }

    pub(in crate::app) fn pointer_pressed(
        &mut self,
        cache: &RenderGraph,
        camera: &Camera,
        rect: Rect,
        pos: Pos2,
    ) {
        self.pointer = PointerState::Pressed {
            node: hit_node(cache, camera, rect, pos),
            travelled: 0.0,
        };
    }

    pub(in crate::app) fn pointer_moved(
        &mut self,
        cache: &mut RenderGraph,
        camera: &mut Camera,
        rect: Rect,
        pos: Pos2,
        delta: Vec2,
    ) {
        match self.pointer {
            PointerState::Idle => {}
            PointerState::Pressed { node, travelled } => {
                let travelled = travelled + delta.length();
                if travelled <= DRAG_THRESHOLD {
                    self.pointer = PointerState::Pressed { node, travelled };
                    return;
                }

                match node {
                    Some(index) => {
                        cache.nodes[index].pinned = Some(camera.screen_to_world(rect, pos));
                        cache.sim.alpha = cache.sim.alpha.max(DRAG_ALPHA);
                        cache.sim.alpha_target = DRAG_ALPHA;
                        self.pointer = PointerState::DraggingNode { node: index };
                    }
                    None => {
                        camera.pan_by(delta);
                        self.pointer = PointerState::Panning;
                    }
                }
            }
            PointerState::DraggingNode { node } => {
                cache.nodes[node].pinned = Some(camera.screen_to_world(rect, pos));
            }
            PointerState::Panning => camera.pan_by(delta),
        }
    }

    /// Ends the gesture. Returns a click target only when the pointer never
    /// crossed the drag threshold.
    pub(in crate::app) fn pointer_released(&mut self, cache: &mut RenderGraph) -> Option<ClickTarget> {
        match std::mem::replace(&mut self.pointer, PointerState::Idle) {
            PointerState::Idle => None,
            PointerState::Pressed { node, .. } => match node {
                Some(index) => Some(ClickTarget::Node(index)),
                None => Some(ClickTarget::Canvas),
            },
            PointerState::DraggingNode { node } => {
                if let Some(dragged) = cache.nodes.get_mut(node) {
                    dragged.pinned = None;
                }
                cache.sim.alpha_target = 0.0;
                None
            }
            PointerState::Panning => None,
        }
    }
}

/// Front-most hit wins: nodes draw in index order, so the scan runs from the
/// top of the paint order down.
fn hit_node(cache: &RenderGraph, camera: &Camera, rect: Rect, pointer: Pos2) -> Option<usize> {
    cache
        .nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| {
            let center = camera.world_to_screen(rect, node.world_pos);
            let size = node.radius * camera.zoom;
            hit_test_shape(shape_for(node.kind), center, size, pointer)
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{RenderEdge, RenderGraph, RenderNode};
    use crate::snapshot::{EdgeKind, NodeKind};
    use eframe::egui::{Color32, pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    fn make_node(id: &str, kind: NodeKind, world_pos: Vec2) -> RenderNode {
        RenderNode {
            id: id.to_owned(),
            display: 0,
            kind,
            color: Color32::WHITE,
            radius: 10.0,
            world_pos,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }

    fn make_graph(nodes: Vec<RenderNode>) -> RenderGraph {
        let edges = if nodes.len() >= 2 {
            vec![RenderEdge {
                source: 0,
                target: 1,
                kind: EdgeKind::Other,
                label: None,
            }]
        } else {
            Vec::new()
        };
        RenderGraph::new(nodes, edges)
    }

    #[test]
    fn sub_threshold_release_is_a_click_with_no_position_change() {
        let mut cache = make_graph(vec![make_node("a", NodeKind::Device, Vec2::ZERO)]);
        let mut camera = Camera::default();
        let mut controller = InteractionController::new();

        // node sits at the canvas center: screen (400, 300)
        controller.pointer_pressed(&cache, &camera, canvas(), pos2(400.0, 300.0));
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(401.0, 300.0),
            vec2(1.0, 0.0),
        );
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(400.0, 301.0),
            vec2(-1.0, 1.0),
        );

        assert!(cache.nodes[0].pinned.is_none());
        assert_eq!(cache.nodes[0].world_pos, Vec2::ZERO);

        let click = controller.pointer_released(&mut cache);
        assert_eq!(click, Some(ClickTarget::Node(0)));
        assert_eq!(cache.nodes[0].world_pos, Vec2::ZERO);
    }

    #[test]
    fn crossing_threshold_pins_reheats_and_suppresses_the_click() {
        let mut cache = make_graph(vec![
            make_node("a", NodeKind::Device, Vec2::ZERO),
            make_node("b", NodeKind::Device, vec2(100.0, 0.0)),
        ]);
        // cool the simulation down first
        cache.sim.alpha = 0.0001;
        let mut camera = Camera::default();
        let mut controller = InteractionController::new();

        controller.pointer_pressed(&cache, &camera, canvas(), pos2(400.0, 300.0));
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(420.0, 300.0),
            vec2(20.0, 0.0),
        );

        assert!(controller.is_dragging());
        assert_eq!(cache.nodes[0].pinned, Some(vec2(20.0, 0.0)));
        assert!(cache.sim.alpha >= DRAG_ALPHA);
        assert_eq!(cache.sim.alpha_target, DRAG_ALPHA);

        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(450.0, 330.0),
            vec2(30.0, 30.0),
        );
        assert_eq!(cache.nodes[0].pinned, Some(vec2(50.0, 30.0)));

        let click = controller.pointer_released(&mut cache);
        assert_eq!(click, None);
        assert!(cache.nodes[0].pinned.is_none());
        assert_eq!(cache.sim.alpha_target, 0.0);
    }

    #[test]
    fn pressing_empty_canvas_and_dragging_pans_the_camera() {
        let mut cache = make_graph(vec![make_node("a", NodeKind::Device, Vec2::ZERO)]);
        let mut camera = Camera::default();
        let mut controller = InteractionController::new();

        controller.pointer_pressed(&cache, &camera, canvas(), pos2(700.0, 100.0));
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(710.0, 100.0),
            vec2(10.0, 0.0),
        );
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(715.0, 104.0),
            vec2(5.0, 4.0),
        );

        assert_eq!(camera.pan, vec2(15.0, 4.0));
        assert_eq!(controller.pointer_released(&mut cache), None);
    }

    #[test]
    fn empty_canvas_click_reports_the_canvas() {
        let mut cache = make_graph(vec![make_node("a", NodeKind::Device, Vec2::ZERO)]);
        let camera = Camera::default();
        let mut controller = InteractionController::new();

        controller.pointer_pressed(&cache, &camera, canvas(), pos2(700.0, 100.0));
        assert_eq!(
            controller.pointer_released(&mut cache),
            Some(ClickTarget::Canvas)
        );
    }

    #[test]
    fn hover_tracks_shape_silhouettes() {
        let cache = make_graph(vec![make_node("gw", NodeKind::Gateway, Vec2::ZERO)]);
        let camera = Camera::default();
        let mut controller = InteractionController::new();

        // inside the diamond
        controller.update_hover(&cache, &camera, canvas(), Some(pos2(404.0, 304.0)));
        assert_eq!(controller.hovered(), Some(0));

        // inside the bounding box but outside the diamond silhouette
        controller.update_hover(&cache, &camera, canvas(), Some(pos2(408.0, 308.0)));
        assert_eq!(controller.hovered(), None);

        controller.update_hover(&cache, &camera, canvas(), None);
        assert_eq!(controller.hovered(), None);
    }

    #[test]
    fn front_most_node_wins_on_exact_overlap() {
        let cache = make_graph(vec![
            make_node("below", NodeKind::Device, Vec2::ZERO),
            make_node("above", NodeKind::Device, Vec2::ZERO),
        ]);
        let camera = Camera::default();
        let mut controller = InteractionController::new();

        controller.update_hover(&cache, &camera, canvas(), Some(pos2(400.0, 300.0)));
        assert_eq!(controller.hovered(), Some(1));
    }

    #[test]
    fn reset_clears_an_in_flight_drag() {
        let mut cache = make_graph(vec![make_node("a", NodeKind::Device, Vec2::ZERO)]);
        let mut camera = Camera::default();
        let mut controller = InteractionController::new();

        controller.pointer_pressed(&cache, &camera, canvas(), pos2(400.0, 300.0));
        controller.pointer_moved(
            &mut cache,
            &mut camera,
            canvas(),
            pos2(420.0, 300.0),
            vec2(20.0, 0.0),
        );
        assert!(controller.is_dragging());

        controller.reset();
        assert!(!controller.is_dragging());
        assert_eq!(controller.pointer_released(&mut cache), None);
    }
}
