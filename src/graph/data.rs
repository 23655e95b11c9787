use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

pub fn parse_graph_data(raw: &str) -> Result<GraphData> {
    serde_json::from_str(raw).context("invalid graph JSON")
}
