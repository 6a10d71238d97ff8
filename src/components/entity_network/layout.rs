//! Force-directed layout for the entity network.
//!
//! Every pair of nodes repels with `repulsion / d²`; every edge pulls its ends
//! together with `strength · attraction / d`. Velocities take the summed force,
//! decay by `damping`, and move the nodes (explicit Euler). The result only has
//! to settle into something readable, not to be physically accurate.
//!
//! [`Layout::step`] is pure with respect to its inputs: the same graph and the
//! same sequence of `dt` values always produce bit-identical positions. The
//! animation loop in the component is the only thing that touches the clock.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use log::{debug, warn};

use super::types::GraphData;
use crate::model::EntityKind;

/// A 2D point or vector in simulation space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal component.
	pub x: f64,
	/// Vertical component, growing downwards like the canvas.
	pub y: f64,
}

impl Vec2 {
	/// The origin.
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	/// Vector from its components.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean length.
	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Vec2) -> f64 {
		(other - self).length()
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Vec2;
	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;
	fn mul(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		*self = *self + rhs;
	}
}

impl SubAssign for Vec2 {
	fn sub_assign(&mut self, rhs: Vec2) {
		*self = *self - rhs;
	}
}

/// Tunables for the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
	/// Numerator of the pairwise `k / d²` repulsion.
	pub repulsion: f64,
	/// Scale of the `strength · k / d` edge attraction.
	pub attraction: f64,
	/// Force to velocity factor per reference frame.
	pub step_scale: f64,
	/// Velocity kept per reference frame.
	pub damping: f64,
	/// Distances below this are treated as this, so forces stay finite.
	pub min_distance: f64,
	/// Radius of the circle nodes are seeded on.
	pub seed_radius: f64,
	/// Pointer distance, in simulation units, that counts as a hit.
	pub hit_radius: f64,
	/// Frame length the other constants are tuned for.
	pub reference_dt: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			repulsion: 300.0,
			attraction: 50.0,
			step_scale: 0.005,
			damping: 0.99,
			min_distance: 1.0,
			seed_radius: 200.0,
			hit_radius: 8.0,
			reference_dt: 1.0 / 60.0,
		}
	}
}

/// Pan and zoom applied when drawing: `screen = graph · k + (x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Screen x of the graph origin.
	pub x: f64,
	/// Screen y of the graph origin.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Inverse of [`ViewTransform::graph_to_screen`].
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Vec2 {
		Vec2::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Canvas coordinates of a simulation-space point.
	pub fn graph_to_screen(&self, point: Vec2) -> (f64, f64) {
		(point.x * self.k + self.x, point.y * self.k + self.y)
	}
}

/// A simulated node. Identity fields come from the backend; position and
/// velocity belong to the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	/// Entity id.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Entity kind, used for coloring.
	pub kind: EntityKind,
	/// Current position in simulation space.
	pub position: Vec2,
	/// Velocity, in units per reference frame.
	pub velocity: Vec2,
}

/// An edge between two nodes, by index into [`Layout::nodes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEdge {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Pull strength in `[0, 1]`.
	pub strength: f64,
}

/// `Running` until the view goes away. There is no way back: a new session
/// builds a new [`Layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
	/// Ticking every frame.
	Running,
	/// Frozen for good.
	Stopped,
}

/// Positions and velocities of a network being laid out.
pub struct Layout {
	params: LayoutParams,
	nodes: Vec<LayoutNode>,
	edges: Vec<LayoutEdge>,
	forces: Vec<Vec2>,
	status: LayoutStatus,
}

impl Layout {
	/// Layout with [`LayoutParams::default`].
	pub fn new(data: &GraphData) -> Self {
		Self::with_params(data, LayoutParams::default())
	}

	/// Seed nodes evenly on a circle around the origin, at rest, and keep the
	/// edges whose endpoints both exist.
	pub fn with_params(data: &GraphData, params: LayoutParams) -> Self {
		let n = data.nodes.len();
		let mut index = HashMap::with_capacity(n);
		let nodes: Vec<LayoutNode> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				index.entry(node.id.as_str()).or_insert(i);
				let angle = 2.0 * PI * i as f64 / n as f64;
				LayoutNode {
					id: node.id.clone(),
					label: node.label.clone(),
					kind: node.kind,
					position: Vec2::new(
						params.seed_radius * angle.cos(),
						params.seed_radius * angle.sin(),
					),
					velocity: Vec2::ZERO,
				}
			})
			.collect();

		let mut edges = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			match (
				index.get(edge.source_id.as_str()),
				index.get(edge.target_id.as_str()),
			) {
				(Some(&source), Some(&target)) => edges.push(LayoutEdge {
					source,
					target,
					strength: edge.strength,
				}),
				_ => warn!(
					"skipping connection {} -> {}: unknown node",
					edge.source_id, edge.target_id
				),
			}
		}

		debug!("layout created: {} nodes, {} edges", nodes.len(), edges.len());
		Self {
			params,
			forces: vec![Vec2::ZERO; nodes.len()],
			nodes,
			edges,
			status: LayoutStatus::Running,
		}
	}

	/// Constants this layout was built with.
	pub fn params(&self) -> &LayoutParams {
		&self.params
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	/// Edges that survived construction.
	pub fn edges(&self) -> &[LayoutEdge] {
		&self.edges
	}

	/// Node with the given entity id.
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Current status.
	pub fn status(&self) -> LayoutStatus {
		self.status
	}

	/// Shorthand for `status() == LayoutStatus::Running`.
	pub fn is_running(&self) -> bool {
		self.status == LayoutStatus::Running
	}

	/// Indices of the nodes sharing an edge with `idx`.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.edges.iter().filter_map(move |e| {
			if e.source == idx {
				Some(e.target)
			} else if e.target == idx {
				Some(e.source)
			} else {
				None
			}
		})
	}

	/// Advance the simulation by `dt` seconds. Does nothing once stopped.
	///
	/// All forces are computed from the positions at the start of the step, so
	/// each pair force is applied with exactly opposite signs.
	pub fn step(&mut self, dt: f64) -> bool {
		if !self.is_running() {
			return false;
		}
		let p = &self.params;
		let frames = dt / p.reference_dt;

		self.forces.iter_mut().for_each(|f| *f = Vec2::ZERO);

		for i in 0..self.nodes.len() {
			for j in i + 1..self.nodes.len() {
				let (dir, dist) =
					direction(self.nodes[j].position - self.nodes[i].position, p.min_distance);
				let push = dir * (p.repulsion / (dist * dist));
				self.forces[i] -= push;
				self.forces[j] += push;
			}
		}

		for edge in &self.edges {
			let (dir, dist) = direction(
				self.nodes[edge.target].position - self.nodes[edge.source].position,
				p.min_distance,
			);
			let pull = dir * (edge.strength * p.attraction / dist);
			self.forces[edge.source] += pull;
			self.forces[edge.target] -= pull;
		}

		let decay = p.damping.powf(frames);
		let gain = p.step_scale * frames;
		for (node, force) in self.nodes.iter_mut().zip(&self.forces) {
			node.velocity = (node.velocity + *force * gain) * decay;
			node.position += node.velocity * frames;
		}
		true
	}

	/// Freeze every node in place. Stopping is final.
	pub fn stop(&mut self) {
		if self.is_running() {
			self.status = LayoutStatus::Stopped;
			debug!("layout stopped");
		}
	}

	/// Index of the first node, in input order, within the hit radius of the
	/// screen point. Overlapping nodes are not ranked by distance.
	pub fn node_at(&self, transform: &ViewTransform, sx: f64, sy: f64) -> Option<usize> {
		let point = transform.screen_to_graph(sx, sy);
		self.nodes
			.iter()
			.position(|n| n.position.distance(point) < self.params.hit_radius)
	}

	/// Id of the node under the screen point. See [`Layout::node_at`].
	pub fn hit_test(&self, transform: &ViewTransform, sx: f64, sy: f64) -> Option<&str> {
		self.node_at(transform, sx, sy)
			.map(|idx| self.nodes[idx].id.as_str())
	}
}

// Unit vector from a delta and the floored distance. Coincident points get a
// fixed axis so they still separate instead of producing NaN.
fn direction(delta: Vec2, min_distance: f64) -> (Vec2, f64) {
	let len = delta.length();
	if len == 0.0 {
		return (Vec2::new(1.0, 0.0), min_distance);
	}
	(delta * (1.0 / len), len.max(min_distance))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::entity_network::types::{GraphEdge, GraphNode};

	const DT: f64 = 1.0 / 60.0;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			kind: EntityKind::Person,
		}
	}

	fn edge(source: &str, target: &str, strength: f64) -> GraphEdge {
		GraphEdge {
			source_id: source.into(),
			target_id: target.into(),
			strength,
		}
	}

	fn graph(ids: &[&str], edges: Vec<GraphEdge>) -> GraphData {
		GraphData {
			nodes: ids.iter().map(|id| node(id)).collect(),
			edges,
		}
	}

	fn positions(layout: &Layout) -> Vec<(u64, u64)> {
		layout
			.nodes()
			.iter()
			.map(|n| (n.position.x.to_bits(), n.position.y.to_bits()))
			.collect()
	}

	#[test]
	fn seeds_nodes_on_a_circle_at_rest() {
		let layout = Layout::new(&graph(&["a", "b", "c", "d"], vec![]));
		for (i, n) in layout.nodes().iter().enumerate() {
			assert!((n.position.length() - 200.0).abs() < 1e-9);
			assert_eq!(n.velocity, Vec2::ZERO);
			let angle = 2.0 * PI * i as f64 / 4.0;
			assert!((n.position.x - 200.0 * angle.cos()).abs() < 1e-9);
		}
	}

	#[test]
	fn empty_graph_steps_without_nodes() {
		let mut layout = Layout::new(&GraphData::default());
		assert!(layout.step(DT));
		assert!(layout.nodes().is_empty());
	}

	#[test]
	fn edges_to_unknown_nodes_are_skipped() {
		let layout = Layout::new(&graph(
			&["a", "b"],
			vec![edge("a", "b", 1.0), edge("a", "ghost", 1.0), edge("nobody", "b", 0.5)],
		));
		assert_eq!(layout.edges().len(), 1);
		assert_eq!(layout.neighbors(0).collect::<Vec<_>>(), vec![1]);
	}

	#[test]
	fn identical_inputs_give_identical_runs() {
		let data = graph(
			&["a", "b", "c", "d", "e"],
			vec![edge("a", "b", 1.0), edge("b", "c", 0.3), edge("d", "a", 0.6)],
		);
		let dts = [DT, DT, 0.02, 0.01, DT, 0.033];
		let mut first = Layout::new(&data);
		let mut second = Layout::new(&data);
		for _ in 0..50 {
			for &dt in &dts {
				first.step(dt);
				second.step(dt);
				assert_eq!(positions(&first), positions(&second));
			}
		}
	}

	#[test]
	fn connected_nodes_draw_together_without_collapsing() {
		let mut layout = Layout::new(&graph(&["a", "b", "c"], vec![edge("a", "b", 1.0)]));
		let initial = layout.nodes()[0].position.distance(layout.nodes()[1].position);

		let mut sum = 0.0;
		let ticks = 300;
		for _ in 0..ticks {
			layout.step(DT);
			let d = layout.nodes()[0].position.distance(layout.nodes()[1].position);
			assert!(d > 0.0);
			assert!(d.is_finite());
			sum += d;
		}
		assert!(sum / (ticks as f64) < initial);
	}

	#[test]
	fn unconnected_pair_drifts_apart() {
		let mut layout = Layout::new(&graph(&["a", "b"], vec![]));
		let initial = layout.nodes()[0].position.distance(layout.nodes()[1].position);
		for _ in 0..100 {
			layout.step(DT);
		}
		let after = layout.nodes()[0].position.distance(layout.nodes()[1].position);
		assert!(after > initial);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let params = LayoutParams {
			seed_radius: 0.0,
			..LayoutParams::default()
		};
		let mut layout =
			Layout::with_params(&graph(&["a", "b"], vec![edge("a", "b", 1.0)]), params);
		layout.step(DT);
		for n in layout.nodes() {
			assert!(n.position.x.is_finite() && n.position.y.is_finite());
		}
		assert!(layout.nodes()[0].position.distance(layout.nodes()[1].position) > 0.0);
	}

	#[test]
	fn stopped_layout_no_longer_moves() {
		let mut layout = Layout::new(&graph(&["a", "b"], vec![edge("a", "b", 1.0)]));
		layout.step(DT);
		layout.stop();
		let frozen = positions(&layout);
		assert!(!layout.step(DT));
		assert_eq!(positions(&layout), frozen);
		assert_eq!(layout.status(), LayoutStatus::Stopped);
	}

	#[test]
	fn hit_test_uses_inverse_transform() {
		let mut layout = Layout::new(&graph(&["solo"], vec![]));
		for _ in 0..10 {
			layout.step(DT);
		}
		let at = layout.nodes()[0].position;
		let transform = ViewTransform {
			x: 400.0,
			y: 300.0,
			k: 2.0,
		};
		let (sx, sy) = transform.graph_to_screen(at);
		let r = layout.params().hit_radius;

		assert_eq!(layout.hit_test(&transform, sx, sy), Some("solo"));
		// Half the radius in graph space is a full radius on screen at k = 2.
		assert_eq!(layout.hit_test(&transform, sx + r, sy), Some("solo"));
		assert_eq!(layout.hit_test(&transform, sx + 2.0 * r * transform.k, sy), None);
	}

	#[test]
	fn hit_test_returns_first_in_input_order() {
		let params = LayoutParams {
			seed_radius: 2.0,
			..LayoutParams::default()
		};
		let layout = Layout::with_params(&graph(&["first", "second"], vec![]), params);
		let transform = ViewTransform::default();
		assert_eq!(layout.hit_test(&transform, 0.0, 0.0), Some("first"));
	}

	#[test]
	fn neighbors_cover_both_directions() {
		let layout = Layout::new(&graph(
			&["a", "b", "c"],
			vec![edge("a", "b", 1.0), edge("c", "a", 0.2)],
		));
		let mut around_a: Vec<_> = layout.neighbors(0).collect();
		around_a.sort_unstable();
		assert_eq!(around_a, vec![1, 2]);
		assert_eq!(layout.neighbors(1).collect::<Vec<_>>(), vec![0]);
	}
}
