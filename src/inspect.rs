use eframe::egui::{Pos2, Vec2};

use crate::graph::GraphModel;

const POPUP_OFFSET: Vec2 = Vec2::new(20.0, -20.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
    pub node: usize,
    pub title: String,
    pub description: String,
    pub anchor: Pos2,
}

#[derive(Debug, Default)]
pub struct Inspector {
    current: Option<Inspection>,
}

impl Inspector {
    pub fn current(&self) -> Option<&Inspection> {
        self.current.as_ref()
    }

    /// A click on a node opens its popup next to the pointer; a click on
    /// empty canvas closes it.
    pub fn click(&mut self, model: &GraphModel, hit: Option<usize>, pointer: Pos2) {
        self.current = hit.and_then(|index| {
            model.node(index).map(|node| Inspection {
                node: index,
                title: node.id.clone(),
                description: node.description.clone(),
                anchor: pointer + POPUP_OFFSET,
            })
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
