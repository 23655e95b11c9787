use eframe::egui::{self, Ui};

use crate::config::ViewerConfig;

use super::super::ViewModel;

const DEFAULT_OVERRIDE_STIFFNESS: f32 = 0.5;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, config: &ViewerConfig) {
        ui.heading("Forces");
        ui.separator();

        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut self.forces.charge, -1000.0..=0.0).text("charge"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut self.forces.link_distance, 10.0..=400.0)
                    .text("link distance"),
            )
            .changed();

        let mut override_stiffness = self.forces.link_stiffness.is_some();
        if ui
            .checkbox(&mut override_stiffness, "Fixed link stiffness")
            .on_hover_text("Otherwise each link uses 1 / min(degree) of its endpoints")
            .changed()
        {
            self.forces.link_stiffness = override_stiffness.then_some(DEFAULT_OVERRIDE_STIFFNESS);
            changed = true;
        }
        if let Some(stiffness) = self.forces.link_stiffness.as_mut() {
            changed |= ui
                .add(egui::Slider::new(stiffness, 0.0..=2.0).text("stiffness"))
                .changed();
        }

        changed |= ui
            .add(
                egui::Slider::new(&mut self.forces.velocity_decay, 0.05..=0.95)
                    .text("velocity decay"),
            )
            .changed();

        if changed {
            self.apply_forces();
        }

        ui.horizontal(|ui| {
            if ui.button("Reheat").clicked() {
                self.apply_forces();
            }
            if ui.button("Reset forces").clicked() {
                self.forces = self.preset.force_config(config.canvas);
                self.apply_forces();
            }
        });

        ui.add_space(4.0);
        let state = if self.engine.is_running() {
            "running"
        } else {
            "settled"
        };
        ui.label(format!("alpha {:.3} ({state})", self.engine.alpha()));
        if let Some(index) = self.interaction.dragging()
            && let Some(node) = self.model.node(index)
        {
            ui.label(format!("dragging: {}", node.id));
        }

        ui.add_space(10.0);
        ui.heading("Search");
        ui.separator();
        if ui
            .add(egui::TextEdit::singleline(&mut self.search).hint_text("node name"))
            .changed()
        {
            self.refresh_search();
        }

        if !self.search.trim().is_empty() {
            ui.label(format!("{} matching nodes", self.search_matches.len()));
            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    let mut matches = self.search_matches.iter().copied().collect::<Vec<_>>();
                    matches.sort_unstable();
                    for index in matches {
                        let Some(node) = self.model.node(index) else {
                            continue;
                        };
                        let response = ui.selectable_label(false, node.id.as_str());
                        if response.clicked() {
                            let anchor = node.position;
                            self.inspector.click(&self.model, Some(index), anchor);
                        }
                    }
                });
        }
    }
}
