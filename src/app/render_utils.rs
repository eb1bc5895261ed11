use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::snapshot::{EdgeKind, NodeKind};

pub(super) const MIN_NODE_RADIUS: f32 = 3.0;
pub(super) const NODE_FILL_OPACITY: f32 = 0.25;
pub(super) const NODE_STROKE_WIDTH: f32 = 2.0;
pub(super) const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) const EDGE_DASH_LENGTH: f32 = 6.0;
pub(super) const EDGE_GAP_LENGTH: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum NodeShape {
    Diamond,
    Square,
    Circle,
}

pub(super) fn shape_for(kind: NodeKind) -> NodeShape {
    match kind {
        NodeKind::Gateway => NodeShape::Diamond,
        NodeKind::Switch => NodeShape::Square,
        NodeKind::Device | NodeKind::Subnet => NodeShape::Circle,
    }
}

/// Render radius; degenerate sizes clamp to a minimum visible radius
/// instead of breaking the pass.
pub(super) fn node_radius(size: f32) -> f32 {
    if size.is_finite() {
        size.max(MIN_NODE_RADIUS)
    } else {
        MIN_NODE_RADIUS
    }
}

pub(super) fn parse_node_color(raw: &str) -> Color32 {
    Color32::from_hex(raw).unwrap_or(DEFAULT_NODE_COLOR)
}

pub(super) fn fade(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn edge_color(kind: EdgeKind) -> Color32 {
    match kind {
        EdgeKind::Gateway => Color32::from_rgb(246, 206, 104),
        EdgeKind::Switch => Color32::from_rgb(128, 140, 154),
        EdgeKind::Subnet | EdgeKind::Other => Color32::from_rgb(86, 94, 106),
    }
}

pub(super) fn edge_is_dashed(kind: EdgeKind) -> bool {
    matches!(kind, EdgeKind::Subnet)
}

pub(super) fn diamond_points(center: Pos2, extent: f32) -> Vec<Pos2> {
    vec![
        center + vec2(0.0, -extent),
        center + vec2(extent, 0.0),
        center + vec2(0.0, extent),
        center + vec2(-extent, 0.0),
    ]
}

pub(super) fn square_rect(center: Pos2, size: f32) -> Rect {
    Rect::from_center_size(center, Vec2::splat(size * 0.8))
}

/// Tests the pointer against the actual shape silhouette, not a bounding
/// box: circles by radius, diamonds by their rotated-square metric, squares
/// by their half side.
pub(super) fn hit_test_shape(shape: NodeShape, center: Pos2, size: f32, point: Pos2) -> bool {
    let delta = point - center;
    match shape {
        NodeShape::Circle => delta.length_sq() <= size * size,
        NodeShape::Diamond => (delta.x.abs() + delta.y.abs()) <= size,
        NodeShape::Square => {
            let half = size * 0.4;
            delta.x.abs() <= half && delta.y.abs() <= half
        }
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn shape_dispatch_is_a_pure_function_of_kind() {
        for _ in 0..3 {
            assert_eq!(shape_for(NodeKind::Gateway), NodeShape::Diamond);
            assert_eq!(shape_for(NodeKind::Switch), NodeShape::Square);
            assert_eq!(shape_for(NodeKind::Device), NodeShape::Circle);
            assert_eq!(shape_for(NodeKind::Subnet), NodeShape::Circle);
        }
    }

    #[test]
    fn degenerate_sizes_clamp_to_visible_radius() {
        assert_eq!(node_radius(0.0), MIN_NODE_RADIUS);
        assert_eq!(node_radius(-5.0), MIN_NODE_RADIUS);
        assert_eq!(node_radius(f32::NAN), MIN_NODE_RADIUS);
        assert_eq!(node_radius(12.0), 12.0);
    }

    #[test]
    fn bad_color_strings_fall_back() {
        assert_eq!(parse_node_color(""), DEFAULT_NODE_COLOR);
        assert_eq!(parse_node_color("teal-ish"), DEFAULT_NODE_COLOR);
        assert_eq!(parse_node_color("#ff0000"), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn diamond_hit_tests_the_silhouette_not_the_bounding_box() {
        let center = pos2(100.0, 100.0);
        // bounding-box corner: inside the box, outside the diamond
        assert!(!hit_test_shape(
            NodeShape::Diamond,
            center,
            10.0,
            pos2(108.0, 108.0)
        ));
        assert!(hit_test_shape(
            NodeShape::Diamond,
            center,
            10.0,
            pos2(104.0, 104.0)
        ));
        assert!(hit_test_shape(
            NodeShape::Diamond,
            center,
            10.0,
            pos2(109.9, 100.0)
        ));
    }

    #[test]
    fn square_hit_tests_its_half_side() {
        let center = pos2(0.0, 0.0);
        assert!(hit_test_shape(NodeShape::Square, center, 10.0, pos2(3.9, 3.9)));
        assert!(!hit_test_shape(NodeShape::Square, center, 10.0, pos2(4.1, 0.0)));
    }

    #[test]
    fn circle_hit_tests_its_radius() {
        let center = pos2(0.0, 0.0);
        assert!(hit_test_shape(NodeShape::Circle, center, 10.0, pos2(7.0, 7.0)));
        assert!(!hit_test_shape(NodeShape::Circle, center, 10.0, pos2(7.2, 7.2)));
    }

    #[test]
    fn only_subnet_edges_are_dashed() {
        assert!(edge_is_dashed(EdgeKind::Subnet));
        assert!(!edge_is_dashed(EdgeKind::Gateway));
        assert!(!edge_is_dashed(EdgeKind::Switch));
        assert!(!edge_is_dashed(EdgeKind::Other));
    }

    #[test]
    fn fade_scales_only_the_alpha() {
        let faded = fade(Color32::from_rgb(200, 100, 50), 0.25);
        assert_eq!(faded.r(), 200);
        assert_eq!(faded.g(), 100);
        assert_eq!(faded.b(), 50);
        assert_eq!(faded.a(), 63);
    }
}
