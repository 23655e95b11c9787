mod data;
mod model;

pub use data::{GraphData, LinkRecord, NodeRecord, parse_graph_data};
pub use model::{GraphModel, Link, ModelError, Node, Pin};
