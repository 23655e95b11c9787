use std::collections::HashSet;
use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui::{self, Context};
use log::{info, warn};

use crate::catalog::DatasetId;
use crate::config::{Preset, ViewerConfig};
use crate::graph::GraphModel;
use crate::inspect::Inspector;
use crate::interaction::InteractionController;
use crate::loader::spawn_load;
use crate::scene::Scene;
use crate::simulation::{ForceConfig, ForceSimulation};

mod canvas;
mod ui;
mod view;

pub struct RelmapApp {
    config: ViewerConfig,
    selection: Selection,
    preset: Preset,
    state: AppState,
    pending: Option<PendingLoad>,
    fps: ui::FpsCounter,
}

#[derive(Default)]
struct Selection {
    category: Option<String>,
    diagram: Option<String>,
}

impl Selection {
    fn set_category(&mut self, category: Option<String>) {
        if self.category != category {
            self.category = category;
            self.diagram = None;
        }
    }

    /// Returns the dataset to load when the diagram actually changed.
    fn set_diagram(&mut self, diagram: Option<String>) -> Option<DatasetId> {
        if self.diagram == diagram {
            return None;
        }
        self.diagram = diagram;
        Some(DatasetId::new(self.category.clone()?, self.diagram.clone()?))
    }
}

struct PendingLoad {
    dataset: DatasetId,
    rx: Receiver<Result<GraphModel, String>>,
}

enum AppState {
    Empty,
    Ready(Box<ViewModel>),
    Error { dataset: DatasetId, message: String },
}

struct ViewModel {
    dataset: DatasetId,
    preset: Preset,
    model: GraphModel,
    engine: ForceSimulation,
    scene: Scene,
    interaction: InteractionController,
    inspector: Inspector,
    forces: ForceConfig,
    search: String,
    search_matches: HashSet<usize>,
}

impl RelmapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        Self::from_config(config)
    }

    fn from_config(config: ViewerConfig) -> Self {
        let preset = config.preset;
        let initial = config.initial_dataset.clone();
        let mut app = Self {
            config,
            selection: Selection::default(),
            preset,
            state: AppState::Empty,
            pending: None,
            fps: ui::FpsCounter::default(),
        };

        if let Some(dataset) = initial {
            app.selection.category = Some(dataset.category.clone());
            app.selection.diagram = Some(dataset.diagram.clone());
            app.request_load(dataset);
        }
        app
    }

    /// Starts loading `dataset`; a load already in flight is superseded and
    /// its result ignored.
    fn request_load(&mut self, dataset: DatasetId) {
        let relative = match self.config.catalog.resolve(&dataset) {
            Ok(path) => path,
            Err(error) => {
                warn!("cannot load {dataset}: {error}");
                self.pending = None;
                self.state = AppState::Error {
                    dataset,
                    message: error.to_string(),
                };
                return;
            }
        };

        let path = self.config.data_dir.join(relative);
        info!("loading {dataset} from {}", path.display());
        let origin = (self.config.canvas * 0.5).to_pos2();
        self.pending = Some(PendingLoad {
            dataset,
            rx: spawn_load(path, origin),
        });
    }

    fn clear_view(&mut self) {
        info!("clearing view");
        self.pending = None;
        self.state = AppState::Empty;
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(model)) => {
                self.state = AppState::Ready(Box::new(ViewModel::new(
                    pending.dataset,
                    model,
                    self.preset,
                    &self.config,
                )));
            }
            Ok(Err(message)) => {
                self.state = AppState::Error {
                    dataset: pending.dataset,
                    message,
                };
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                self.state = AppState::Error {
                    dataset: pending.dataset,
                    message: "background load worker disconnected".to_owned(),
                };
            }
        }
    }
}

impl eframe::App for RelmapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.fps.record(ctx);
        self.poll_pending();
        if self.pending.is_some() {
            ctx.request_repaint();
        }

        self.draw_top_bar(ctx);

        if let AppState::Ready(view) = &mut self.state {
            egui::SidePanel::left("forces")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| view.draw_controls(ui, &self.config));
        }

        let mut retry = None;
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.state {
            AppState::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    if self.pending.is_some() {
                        ui.heading("Loading relationship graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    } else {
                        ui.heading("Pick a category and a diagram to begin.");
                    }
                });
            }
            AppState::Error { dataset, message } => {
                ui.heading(format!("Failed to load {dataset}"));
                ui.add_space(6.0);
                ui.label(message.as_str());
                ui.add_space(10.0);
                if ui.button("Retry").clicked() {
                    retry = Some(dataset.clone());
                }
            }
            AppState::Ready(view) => {
                if view.advance() {
                    ui.ctx().request_repaint();
                }
                view.draw_canvas(ui, self.config.canvas);
            }
        });

        if let Some(dataset) = retry {
            self.request_load(dataset);
        }
    }
}
