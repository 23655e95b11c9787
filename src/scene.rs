use eframe::egui::Pos2;

use crate::geometry::{ArrowMarker, label_position};
use crate::graph::GraphModel;
use crate::simulation::TickObserver;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    pub node_radius: f32,
    pub arrow_width: f32,
    pub arrows: bool,
    /// Push link labels off the line by one node radius instead of
    /// centering them on it.
    pub offset_labels: bool,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            node_radius: 20.0,
            arrow_width: 12.0,
            arrows: true,
            offset_labels: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
    pub from: Pos2,
    pub to: Pos2,
    pub label: String,
    pub label_position: Pos2,
    pub arrow: Option<[Pos2; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
    pub label: String,
    pub center: Pos2,
    pub label_anchor: Pos2,
}

pub struct Scene {
    style: SceneStyle,
    marker: ArrowMarker,
    links: Vec<LinkVisual>,
    nodes: Vec<NodeVisual>,
}

impl Scene {
    pub fn build(model: &GraphModel, style: SceneStyle) -> Self {
        let links = model
            .links()
            .iter()
            .map(|link| LinkVisual {
                from: Pos2::ZERO,
                to: Pos2::ZERO,
                label: link.relationship.clone(),
                label_position: Pos2::ZERO,
                arrow: None,
            })
            .collect();
        let nodes = model
            .nodes()
            .iter()
            .map(|node| NodeVisual {
                label: node.id.clone(),
                center: Pos2::ZERO,
                label_anchor: Pos2::ZERO,
            })
            .collect();

        let mut scene = Self {
            style,
            marker: ArrowMarker::new(style.node_radius, style.arrow_width),
            links,
            nodes,
        };
        scene.update(model);
        scene
    }

    pub fn style(&self) -> SceneStyle {
        self.style
    }

    pub fn links(&self) -> &[LinkVisual] {
        &self.links
    }

    pub fn nodes(&self) -> &[NodeVisual] {
        &self.nodes
    }

    pub fn update(&mut self, model: &GraphModel) {
        let nodes = model.nodes();

        for (visual, link) in self.links.iter_mut().zip(model.links()) {
            let from = nodes[link.source].position;
            let to = nodes[link.target].position;
            visual.from = from;
            visual.to = to;
            visual.label_position = if self.style.offset_labels {
                label_position(from, to, self.style.node_radius)
            } else {
                from.lerp(to, 0.5)
            };
            visual.arrow = if self.style.arrows {
                self.marker.triangle(from, to)
            } else {
                None
            };
        }

        for (visual, node) in self.nodes.iter_mut().zip(nodes) {
            visual.center = node.position;
            visual.label_anchor = node.position;
        }
    }
}

impl TickObserver for Scene {
    fn on_tick(&mut self, model: &GraphModel) {
        self.update(model);
    }
}
