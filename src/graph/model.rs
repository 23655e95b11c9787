use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2, vec2};
use thiserror::Error;

use super::data::GraphData;

const INITIAL_RADIUS: f32 = 10.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("node id `{0}` appears more than once")]
    DuplicateNode(String),
    #[error("link #{link} has unknown source node `{id}`")]
    UnknownSource { link: usize, id: String },
    #[error("link #{link} has unknown target node `{id}`")]
    UnknownTarget { link: usize, id: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pin {
    Free,
    Pinned(Pos2),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub description: String,
    pub position: Pos2,
    pub velocity: Vec2,
    pub pin: Pin,
}

impl Node {
    pub fn fixed_position(&self) -> Option<Pos2> {
        match self.pin {
            Pin::Free => None,
            Pin::Pinned(position) => Some(position),
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.pin, Pin::Pinned(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub relationship: String,
}

/// Construction validates that node ids are unique and that every link
/// endpoint names a node of this model, so later stages never look ids up.
#[derive(Clone, Debug)]
pub struct GraphModel {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl GraphModel {
    pub fn from_data(data: GraphData, origin: Pos2) -> Result<Self, ModelError> {
        let mut index_by_id = HashMap::with_capacity(data.nodes.len());
        let mut nodes = Vec::with_capacity(data.nodes.len());

        for (index, record) in data.nodes.into_iter().enumerate() {
            if index_by_id.contains_key(&record.id) {
                return Err(ModelError::DuplicateNode(record.id));
            }
            index_by_id.insert(record.id.clone(), index);
            nodes.push(Node {
                id: record.id,
                description: record.description,
                position: origin + spiral_offset(index),
                velocity: Vec2::ZERO,
                pin: Pin::Free,
            });
        }

        let mut links = Vec::with_capacity(data.links.len());
        for (link, record) in data.links.into_iter().enumerate() {
            let source = *index_by_id
                .get(&record.source)
                .ok_or_else(|| ModelError::UnknownSource {
                    link,
                    id: record.source.clone(),
                })?;
            let target = *index_by_id
                .get(&record.target)
                .ok_or_else(|| ModelError::UnknownTarget {
                    link,
                    id: record.target.clone(),
                })?;

            links.push(Link {
                source,
                target,
                relationship: record.relationship.unwrap_or_default(),
            });
        }

        Ok(Self { nodes, links })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of link endpoints touching each node, self-links counted twice.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for link in &self.links {
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }
        degrees
    }
}

fn spiral_offset(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::graph::{LinkRecord, NodeRecord};

    fn node(id: &str) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            description: format!("{id} description"),
        }
    }

    fn link(source: &str, target: &str, relationship: Option<&str>) -> LinkRecord {
        LinkRecord {
            source: source.to_owned(),
            target: target.to_owned(),
            relationship: relationship.map(str::to_owned),
        }
    }

    #[test]
    fn resolves_links_to_indices() {
        let data = GraphData {
            nodes: vec![node("A"), node("B"), node("C")],
            links: vec![link("A", "C", Some("suspects")), link("C", "B", None)],
        };
        let model = GraphModel::from_data(data, pos2(0.0, 0.0)).unwrap();

        assert_eq!(model.node_count(), 3);
        assert_eq!(
            model.links()[0],
            Link {
                source: 0,
                target: 2,
                relationship: "suspects".to_owned()
            }
        );
        assert_eq!(model.links()[1].relationship, "");
        assert_eq!(model.node(1).map(|node| node.id.as_str()), Some("B"));
        assert_eq!(model.degrees(), vec![1, 1, 2]);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let data = GraphData {
            nodes: vec![node("A")],
            links: vec![link("ghost", "A", None)],
        };
        let error = GraphModel::from_data(data, pos2(0.0, 0.0)).unwrap_err();
        assert_eq!(
            error,
            ModelError::UnknownSource {
                link: 0,
                id: "ghost".to_owned()
            }
        );
    }

    #[test]
    fn unknown_target_is_rejected() {
        let data = GraphData {
            nodes: vec![node("A"), node("B")],
            links: vec![link("A", "B", None), link("B", "nowhere", None)],
        };
        let error = GraphModel::from_data(data, pos2(0.0, 0.0)).unwrap_err();
        assert!(matches!(error, ModelError::UnknownTarget { link: 1, .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let data = GraphData {
            nodes: vec![node("A"), node("A")],
            links: Vec::new(),
        };
        let error = GraphModel::from_data(data, pos2(0.0, 0.0)).unwrap_err();
        assert_eq!(error, ModelError::DuplicateNode("A".to_owned()));
    }

    #[test]
    fn nodes_start_free_and_distinct_around_origin() {
        let data = GraphData {
            nodes: vec![node("A"), node("B"), node("C"), node("D")],
            links: Vec::new(),
        };
        let origin = pos2(480.0, 300.0);
        let model = GraphModel::from_data(data, origin).unwrap();

        for (index, node) in model.nodes().iter().enumerate() {
            assert_eq!(node.pin, Pin::Free);
            assert_eq!(node.velocity, Vec2::ZERO);
            assert!(node.position.distance(origin) < 30.0);
            for other in &model.nodes()[index + 1..] {
                assert!(node.position.distance(other.position) > 1.0);
            }
        }
    }
}
