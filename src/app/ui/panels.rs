use eframe::egui::{self, Align, Context, Layout, Ui};
use log::warn;

use crate::config::Preset;

use super::super::{AppState, RelmapApp};

impl RelmapApp {
    pub(in crate::app) fn draw_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relmap");
                    ui.separator();

                    self.draw_dataset_picker(ui);
                    ui.separator();
                    self.draw_preset_picker(ui);
                    ui.separator();

                    let has_view = !matches!(self.state, AppState::Empty) || self.pending.is_some();
                    if ui
                        .add_enabled(has_view, egui::Button::new("Clear view"))
                        .clicked()
                    {
                        self.clear_view();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps.display_text() {
                            ui.label(fps_text);
                        }
                        if let AppState::Ready(view) = &self.state {
                            ui.label(format!("alpha {:.3}", view.engine.alpha()));
                            ui.label(format!(
                                "{}: {} nodes / {} links",
                                view.dataset,
                                view.model.node_count(),
                                view.model.link_count()
                            ));
                        }
                    });
                });
            });
    }

    fn draw_dataset_picker(&mut self, ui: &mut Ui) {
        let categories = self
            .config
            .catalog
            .categories()
            .iter()
            .map(|category| category.name.clone())
            .collect::<Vec<_>>();

        let mut chosen = self.selection.category.clone();
        egui::ComboBox::from_id_salt("category")
            .selected_text(chosen.clone().unwrap_or_else(|| "Category".to_owned()))
            .show_ui(ui, |ui| {
                for name in categories {
                    let label = name.clone();
                    ui.selectable_value(&mut chosen, Some(name), label);
                }
            });
        self.selection.set_category(chosen);

        let Some(category) = self.selection.category.clone() else {
            ui.add_enabled(false, egui::Button::new("Diagram"));
            return;
        };
        let diagrams = match self.config.catalog.diagrams(&category) {
            Ok(diagrams) => diagrams
                .iter()
                .map(|diagram| diagram.name.clone())
                .collect::<Vec<_>>(),
            Err(error) => {
                warn!("{error}");
                Vec::new()
            }
        };

        let mut chosen = self.selection.diagram.clone();
        egui::ComboBox::from_id_salt("diagram")
            .selected_text(chosen.clone().unwrap_or_else(|| "Diagram".to_owned()))
            .show_ui(ui, |ui| {
                for name in diagrams {
                    let label = name.clone();
                    ui.selectable_value(&mut chosen, Some(name), label);
                }
            });
        if let Some(dataset) = self.selection.set_diagram(chosen) {
            self.request_load(dataset);
        }
    }

    fn draw_preset_picker(&mut self, ui: &mut Ui) {
        let previous = self.preset;
        egui::ComboBox::from_id_salt("preset")
            .selected_text(self.preset.label())
            .show_ui(ui, |ui| {
                for preset in Preset::ALL {
                    ui.selectable_value(&mut self.preset, preset, preset.label());
                }
            });
        if self.preset != previous
            && let AppState::Ready(view) = &mut self.state
        {
            view.apply_preset(self.preset, &self.config);
        }
    }
}
