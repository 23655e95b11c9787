use eframe::egui::Pos2;
use log::{debug, warn};
use thiserror::Error;

use crate::graph::{GraphModel, Pin};
use crate::simulation::ForceSimulation;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("no node with index {0}")]
    UnknownNode(usize),
    #[error("node {0} is already being dragged")]
    AlreadyDragging(usize),
    #[error("node {0} is not being dragged")]
    NotDragging(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSettings {
    pub alpha_target: f32,
    /// Below this warmth a drag start re-activates the simulation.
    pub reactivation_alpha: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            alpha_target: 0.3,
            reactivation_alpha: 0.3,
        }
    }
}

/// A node is `dragging` exactly while it is the active drag; its pin is set
/// on start, follows the pointer on every move and is cleared on end.
#[derive(Debug, Default)]
pub struct InteractionController {
    settings: DragSettings,
    dragging: Option<usize>,
}

impl InteractionController {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            dragging: None,
        }
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn drag_start(
        &mut self,
        model: &mut GraphModel,
        engine: &mut ForceSimulation,
        index: usize,
    ) -> Result<(), InteractionError> {
        if let Some(active) = self.dragging {
            return Err(InteractionError::AlreadyDragging(active));
        }
        let node = model
            .node_mut(index)
            .ok_or(InteractionError::UnknownNode(index))?;

        let cold = !engine.is_running()
            || engine.alpha() < self.settings.reactivation_alpha
            || engine.alpha_target() < self.settings.alpha_target;
        if cold {
            engine.restart(self.settings.alpha_target);
        }

        debug!("drag start on `{}`", node.id);
        node.pin = Pin::Pinned(node.position);
        self.dragging = Some(index);
        Ok(())
    }

    pub fn drag_move(
        &mut self,
        model: &mut GraphModel,
        index: usize,
        pointer: Pos2,
    ) -> Result<(), InteractionError> {
        if self.dragging != Some(index) {
            return Err(InteractionError::NotDragging(index));
        }
        let node = model
            .node_mut(index)
            .ok_or(InteractionError::UnknownNode(index))?;
        node.pin = Pin::Pinned(pointer);
        Ok(())
    }

    pub fn drag_end(
        &mut self,
        model: &mut GraphModel,
        engine: &mut ForceSimulation,
        index: usize,
    ) -> Result<(), InteractionError> {
        if self.dragging != Some(index) {
            return Err(InteractionError::NotDragging(index));
        }
        self.dragging = None;

        let node = model
            .node_mut(index)
            .ok_or(InteractionError::UnknownNode(index))?;
        debug!("drag end on `{}`", node.id);
        node.pin = Pin::Free;
        engine.cool();
        Ok(())
    }

    /// Ends whatever drag is active, e.g. when the pointer leaves the canvas.
    pub fn release_all(&mut self, model: &mut GraphModel, engine: &mut ForceSimulation) {
        if let Some(index) = self.dragging
            && let Err(error) = self.drag_end(model, engine, index)
        {
            warn!("dropping drag state: {error}");
            self.dragging = None;
        }
    }
}

/// Topmost node whose circle contains `point`. Later nodes are drawn on top.
pub fn node_at(model: &GraphModel, point: Pos2, radius: f32) -> Option<usize> {
    let radius_sq = radius * radius;
    model
        .nodes()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| node.position.distance_sq(point) <= radius_sq)
        .map(|(index, _)| index)
}
