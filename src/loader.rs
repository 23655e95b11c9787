use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use eframe::egui::Pos2;
use log::{info, warn};

use crate::graph::{GraphModel, parse_graph_data};

pub fn load_graph(path: &Path, origin: Pos2) -> Result<GraphModel> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let data = parse_graph_data(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    let model = GraphModel::from_data(data, origin)
        .with_context(|| format!("dataset {} is inconsistent", path.display()))?;

    info!(
        "loaded {}: {} nodes, {} links",
        path.display(),
        model.node_count(),
        model.link_count()
    );
    Ok(model)
}

/// Loads on a worker thread; the result arrives once, complete or failed.
pub fn spawn_load(path: PathBuf, origin: Pos2) -> Receiver<Result<GraphModel, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = load_graph(&path, origin).map_err(|error| {
            warn!("{error:#}");
            format!("{error:#}")
        });
        let _ = tx.send(result);
    });

    rx
}
