use eframe::egui::{RichText, Ui};

use crate::util::{format_confidence, format_ports};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the topology to inspect it.");
            return;
        };

        let Some(record) = self
            .snapshot
            .nodes
            .iter()
            .find(|node| node.id == selected_id)
        else {
            ui.label("Selected node is no longer present in the snapshot.");
            return;
        };

        let label = record.display_label().to_owned();
        let id = record.id.clone();
        let kind = record.kind.label();
        let category = record.bigr_category.clone();
        let confidence = record.confidence;
        let ip = record.ip.clone();
        let mac = record.mac.clone();
        let hostname = record.hostname.clone();
        let vendor = record.vendor.clone();
        let subnet = record.subnet.clone();
        let switch_port = record.switch_port.clone();
        let ports = format_ports(&record.open_ports);

        let neighbor_count = self.graph_cache.as_ref().and_then(|cache| {
            let index = cache.index_by_id.get(&id)?;
            cache.neighbors.get(*index).map(Vec::len)
        });

        ui.label(RichText::new(label).strong());
        ui.small(id);
        ui.add_space(6.0);

        ui.label(format!("Type: {kind}"));
        if !category.is_empty() {
            ui.label(format!(
                "Category: {category} ({} confidence)",
                format_confidence(confidence)
            ));
        }
        if let Some(ip) = ip {
            ui.label(format!("IP: {ip}"));
        }
        if let Some(mac) = mac {
            ui.label(format!("MAC: {mac}"));
        }
        if let Some(hostname) = hostname {
            ui.label(format!("Hostname: {hostname}"));
        }
        if let Some(vendor) = vendor {
            ui.label(format!("Vendor: {vendor}"));
        }
        if let Some(subnet) = subnet {
            ui.label(format!("Subnet: {subnet}"));
        }
        if let Some(switch_port) = switch_port {
            ui.label(format!("Switch port: {switch_port}"));
        }
        ui.label(format!("Open ports: {ports}"));
        if let Some(neighbor_count) = neighbor_count {
            ui.label(format!("Direct links: {neighbor_count}"));
        }

        ui.add_space(10.0);
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        }
    }
}
