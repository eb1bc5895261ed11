use eframe::egui::{Color32, Sense, Shape, Stroke, StrokeKind, Ui, Vec2, pos2, vec2};

use crate::snapshot::{EdgeKind, NodeKind};

use super::super::render_utils::{
    EDGE_DASH_LENGTH, EDGE_GAP_LENGTH, NODE_FILL_OPACITY, NodeShape, diamond_points, edge_color,
    edge_is_dashed, fade, shape_for, square_rect,
};

const SWATCH_SIZE: f32 = 18.0;

fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Gateway => Color32::from_rgb(242, 190, 92),
        NodeKind::Switch => Color32::from_rgb(106, 198, 255),
        NodeKind::Device => Color32::from_rgb(154, 167, 184),
        NodeKind::Subnet => Color32::from_rgb(127, 208, 143),
    }
}

fn shape_swatch(ui: &mut Ui, kind: NodeKind) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let size = SWATCH_SIZE * 0.42;

    let color = kind_color(kind);
    let fill = fade(color, NODE_FILL_OPACITY);
    let stroke = Stroke::new(1.5, color);

    match shape_for(kind) {
        NodeShape::Diamond => {
            painter.add(Shape::convex_polygon(
                diamond_points(center, size),
                fill,
                stroke,
            ));
        }
        NodeShape::Square => {
            let square = square_rect(center, size * 1.6);
            painter.rect_filled(square, 2.0, fill);
            painter.rect_stroke(square, 2.0, stroke, StrokeKind::Middle);
        }
        NodeShape::Circle => {
            painter.circle_filled(center, size, fill);
            painter.circle_stroke(center, size, stroke);
        }
    }
}

fn edge_swatch(ui: &mut Ui, kind: EdgeKind) {
    let (rect, _) = ui.allocate_exact_size(vec2(SWATCH_SIZE * 1.6, SWATCH_SIZE), Sense::hover());
    let painter = ui.painter_at(rect);

    let y = rect.center().y;
    let start = pos2(rect.left() + 2.0, y);
    let end = pos2(rect.right() - 2.0, y);
    let stroke = Stroke::new(1.5, edge_color(kind));

    if edge_is_dashed(kind) {
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

fn edge_kind_label(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Gateway => "gateway link",
        EdgeKind::Switch => "switch link",
        EdgeKind::Subnet => "subnet (dashed)",
        EdgeKind::Other => "other link",
    }
}

pub(in crate::app) fn draw_legend(ui: &mut Ui) {
    ui.heading("Legend");
    ui.add_space(4.0);

    for kind in NodeKind::ALL {
        ui.horizontal(|ui| {
            shape_swatch(ui, kind);
            ui.label(kind.label());
        });
    }

    ui.add_space(6.0);
    for kind in [
        EdgeKind::Gateway,
        EdgeKind::Switch,
        EdgeKind::Subnet,
        EdgeKind::Other,
    ] {
        ui.horizontal(|ui| {
            edge_swatch(ui, kind);
            ui.label(edge_kind_label(kind));
        });
    }
}
