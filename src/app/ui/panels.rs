use eframe::egui::{self, Align, Context, Layout};

use crate::snapshot::TopologySnapshot;

use super::super::camera::Camera;
use super::super::graph::InteractionController;
use super::super::highlight::HighlightStyle;
use super::super::physics::SimulationConfig;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(snapshot: TopologySnapshot) -> Self {
        Self {
            snapshot,
            search: String::new(),
            selected: None,
            camera: Camera::default(),
            interaction: InteractionController::new(),
            simulation: SimulationConfig::default(),
            highlight_style: HighlightStyle::default(),
            live_physics: true,
            show_legend: true,
            graph_dirty: true,
            graph_revision: 0,
            graph_cache: None,
            search_match_cache: None,
            dropped_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        snapshot_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("toposcope");
                    ui.separator();

                    let [gateways, switches, devices, subnets] = self.snapshot.kind_counts();
                    ui.label(format!("nodes: {}", self.snapshot.node_count()));
                    ui.label(format!("gateways: {gateways}"));
                    ui.label(format!("switches: {switches}"));
                    ui.label(format!("devices: {devices}"));
                    ui.label(format!("subnets: {subnets}"));
                    ui.label(format!("edges: {}", self.snapshot.edge_count()));
                    if self.dropped_edge_count > 0 {
                        ui.label(format!("dropped edges: {}", self.dropped_edge_count));
                    }

                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload snapshot"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("zoom: {:.0}%", self.camera.zoom * 100.0));
                        ui.label(format!("snapshot: {snapshot_path}"));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading topology snapshot...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        if let Some(id) = &selected {
            tracing::debug!(node = %id, "node selected");
        }
        self.selected = selected;
    }

    /// Swaps in a freshly loaded snapshot: retained ids keep their settled
    /// positions, everything else is rebuilt, and the view transform
    /// animates back to identity.
    pub(in crate::app) fn replace_snapshot(&mut self, snapshot: TopologySnapshot, now: f64) {
        self.snapshot = snapshot;

        if let Some(id) = &self.selected
            && !self.snapshot.nodes.iter().any(|node| &node.id == id)
        {
            self.selected = None;
        }

        self.graph_dirty = true;
        self.camera.begin_reset(now);
    }
}
