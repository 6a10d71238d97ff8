use continuum_web::components::entity_network::{GraphData, Layout, ViewTransform};

const NETWORK: &str = r#"{
	"nodes": [
		{"id": "a", "name": "Ana", "type": "person"},
		{"id": "b", "name": "Bruno", "type": "person"},
		{"id": "c", "name": "Corrida", "type": "habit"},
		{"id": "d", "name": "Diário", "type": "project"}
	],
	"connections": [
		{"source": "a", "target": "b", "strength": 0.9},
		{"source": "b", "target": "c", "strength": 0.4},
		{"source": "c", "target": "zzz", "strength": 1.0}
	]
}"#;

fn run(data: &GraphData, dts: &[f64]) -> Vec<Vec<(f64, f64)>> {
	let mut layout = Layout::new(data);
	dts.iter()
		.map(|&dt| {
			layout.step(dt);
			layout
				.nodes()
				.iter()
				.map(|n| (n.position.x, n.position.y))
				.collect()
		})
		.collect()
}

#[test]
fn decoded_network_simulates_reproducibly() {
	let data = GraphData::from_json(NETWORK).unwrap();
	let dts: Vec<f64> = (0..240).map(|i| if i % 3 == 0 { 0.02 } else { 1.0 / 60.0 }).collect();

	let first = run(&data, &dts);
	let second = run(&data, &dts);
	assert_eq!(first.len(), 240);
	for (a, b) in first.iter().zip(&second) {
		for (p, q) in a.iter().zip(b) {
			assert_eq!(p.0.to_bits(), q.0.to_bits());
			assert_eq!(p.1.to_bits(), q.1.to_bits());
		}
	}
}

#[test]
fn dangling_connection_is_dropped_not_fatal() {
	let data = GraphData::from_json(NETWORK).unwrap();
	let layout = Layout::new(&data);
	assert_eq!(layout.nodes().len(), 4);
	assert_eq!(layout.edges().len(), 2);
}

#[test]
fn node_found_after_ticks_within_hit_radius_only() {
	let data = GraphData::from_json(NETWORK).unwrap();
	let mut layout = Layout::new(&data);
	for _ in 0..60 {
		layout.step(1.0 / 60.0);
	}
	let transform = ViewTransform {
		x: 400.0,
		y: 200.0,
		k: 1.0,
	};
	let d = layout.node("d").unwrap().position;
	let (sx, sy) = transform.graph_to_screen(d);
	let r = layout.params().hit_radius;

	assert_eq!(layout.hit_test(&transform, sx, sy), Some("d"));
	assert_eq!(layout.hit_test(&transform, sx, sy + r * 0.5), Some("d"));
	assert_eq!(layout.hit_test(&transform, sx, sy + 2.0 * r), None);
}
