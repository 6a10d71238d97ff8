use std::collections::HashSet;

use super::layout::{Layout, LayoutParams, ViewTransform};
use super::types::GraphData;

pub const NODE_RADIUS: f64 = 6.0;
pub const HOVER_RADIUS: f64 = 8.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
}

/// Everything the network view needs between frames: the simulation, the
/// viewport, and pointer interaction.
pub struct NetworkState {
	pub layout: Layout,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl NetworkState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		Self::with_params(data, LayoutParams::default(), width, height)
	}

	pub fn with_params(data: &GraphData, params: LayoutParams, width: f64, height: f64) -> Self {
		Self {
			layout: Layout::with_params(data, params),
			transform: home_transform(width, height),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		self.layout.node_at(&self.transform, sx, sy)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			self.hover.neighbors.extend(self.layout.neighbors(idx));
		}
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.is_hovered(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.highlight_t > 0.0
	}

	pub fn start_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx != 0.0 || dy != 0.0 {
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Ends a pan; returns true when the pointer actually moved, so the caller
	/// can tell a drag from a click.
	pub fn end_pan(&mut self) -> bool {
		let moved = self.pan.active && self.pan.moved;
		self.pan.active = false;
		self.pan.moved = false;
		moved
	}

	/// Zoom by `factor` keeping the graph point under `(x, y)` fixed on screen.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn reset_view(&mut self) {
		self.transform = home_transform(self.width, self.height);
	}

	/// One frame: advance the layout and ease the hover highlight.
	/// Returns false once the layout has been stopped.
	pub fn tick(&mut self, dt: f64) -> bool {
		if !self.layout.step(dt) {
			return false;
		}
		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 8.0)
		} else {
			(0.0, 6.0)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
		true
	}

	pub fn stop(&mut self) {
		self.layout.stop();
		self.pan.active = false;
		self.set_hover(None);
	}
}

fn home_transform(width: f64, height: f64) -> ViewTransform {
	ViewTransform {
		x: width / 2.0,
		y: height / 2.0,
		k: 1.0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::entity_network::types::{GraphEdge, GraphNode};
	use crate::model::EntityKind;

	fn data() -> GraphData {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			kind: EntityKind::Habit,
		};
		GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			edges: vec![GraphEdge {
				source_id: "a".into(),
				target_id: "b".into(),
				strength: 0.8,
			}],
		}
	}

	#[test]
	fn starts_centred_in_the_canvas() {
		let state = NetworkState::new(&data(), 800.0, 400.0);
		assert_eq!(state.transform, ViewTransform { x: 400.0, y: 200.0, k: 1.0 });
		// Node "a" is seeded at (200, 0) in graph space.
		assert_eq!(state.node_at_position(600.0, 200.0), Some(0));
		assert_eq!(state.node_at_position(400.0, 200.0), None);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = NetworkState::new(&data(), 800.0, 400.0);
		state.set_hover(Some(1));
		assert!(state.is_hovered(1));
		assert!(state.is_highlighted(0));
		assert!(!state.is_highlighted(2));
		state.set_hover(None);
		assert!(state.hover.neighbors.is_empty());
	}

	#[test]
	fn highlight_eases_in_and_out() {
		let mut state = NetworkState::new(&data(), 800.0, 400.0);
		state.set_hover(Some(0));
		for _ in 0..120 {
			state.tick(1.0 / 60.0);
		}
		assert!(state.hover.highlight_t > 0.9);
		state.set_hover(None);
		for _ in 0..240 {
			state.tick(1.0 / 60.0);
		}
		assert_eq!(state.hover.highlight_t, 0.0);
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn zoom_keeps_pointer_anchor() {
		let mut state = NetworkState::new(&data(), 800.0, 400.0);
		let before = state.transform.screen_to_graph(500.0, 250.0);
		state.zoom_at(500.0, 250.0, 1.1);
		let after = state.transform.screen_to_graph(500.0, 250.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);

		for _ in 0..100 {
			state.zoom_at(0.0, 0.0, 0.5);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn pan_moves_transform_and_reports_drag() {
		let mut state = NetworkState::new(&data(), 800.0, 400.0);
		state.start_pan(10.0, 10.0);
		state.pan_to(30.0, 5.0);
		assert_eq!((state.transform.x, state.transform.y), (420.0, 195.0));
		assert!(state.end_pan());

		state.start_pan(10.0, 10.0);
		assert!(!state.end_pan());

		state.reset_view();
		assert_eq!(state.transform, ViewTransform { x: 400.0, y: 200.0, k: 1.0 });
	}

	#[test]
	fn stop_is_terminal() {
		let mut state = NetworkState::new(&data(), 800.0, 400.0);
		assert!(state.tick(1.0 / 60.0));
		state.set_hover(Some(0));
		state.stop();
		assert!(!state.tick(1.0 / 60.0));
		assert!(!state.layout.is_running());
		assert_eq!(state.hover.node, None);
	}
}
