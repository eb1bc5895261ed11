use eframe::egui::Ui;

use super::super::ViewModel;
use super::legend;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View");
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            if !self.search.is_empty() && ui.small_button("✕").clicked() {
                self.search.clear();
            }
        });
        ui.small("Matching nodes stay bright, the rest dim.");

        ui.add_space(8.0);
        ui.checkbox(&mut self.live_physics, "Live layout");
        ui.checkbox(&mut self.show_legend, "Show legend");

        ui.add_space(8.0);
        if ui.button("Reset view").clicked() {
            let now = ui.input(|input| input.time);
            self.camera.begin_reset(now);
            ui.ctx().request_repaint();
        }

        if self.show_legend {
            ui.separator();
            legend::draw_legend(ui);
        }
    }
}
