use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::model::EntityKind;

/// An entity as it appears in the network payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Entity id, unique within a payload.
	pub id: String,
	/// Display name.
	#[serde(rename = "name")]
	pub label: String,
	/// Entity kind.
	#[serde(rename = "type")]
	pub kind: EntityKind,
}

/// Connection between two entities; `strength` is in `[0, 1]`, precomputed by
/// the backend from co-occurrence counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Id of one endpoint.
	#[serde(rename = "source")]
	pub source_id: String,
	/// Id of the other endpoint.
	#[serde(rename = "target")]
	pub target_id: String,
	/// Normalized co-occurrence weight.
	pub strength: f64,
}

/// The `/network` payload: entities and their connections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Entities.
	pub nodes: Vec<GraphNode>,
	/// Connections; may be absent.
	#[serde(rename = "connections", default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Decode the `/network` payload. Node ids must be unique; edges are not
	/// checked here, the layout skips the ones it cannot place.
	pub fn from_json(json: &str) -> Result<Self> {
		let data: GraphData = serde_json::from_str(json)?;
		let mut seen = HashSet::with_capacity(data.nodes.len());
		for node in &data.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(DataError::DuplicateNode(node.id.clone()));
			}
		}
		Ok(data)
	}
}
