//! Force layout for circular marks: anchor attraction plus collision avoidance.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;

use crate::config::ForceParameters;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationStatus {
	#[default]
	Idle,
	Simulating,
}

/// What a chart wants on screen for one country; the layout decides where.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
	pub code: String,
	pub country: String,
	pub value: f64,
	pub radius: f64,
	pub target: [f64; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	pub code: String,
	pub country: String,
	pub value: f64,
	pub radius: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub target_x: f64,
	pub target_y: f64,
}

/// Iterative solver that keeps its node set across data refreshes, keyed by country
/// code, so marks glide between frames instead of jumping.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	params: ForceParameters,
	nodes: Vec<LayoutNode>,
	index: HashMap<String, usize>,
	alpha: f64,
	status: SimulationStatus,
}

impl ForceLayout {
	pub fn new(params: ForceParameters) -> Self {
		Self {
			params,
			nodes: Vec::new(),
			index: HashMap::new(),
			alpha: 0.0,
			status: SimulationStatus::Idle,
		}
	}

	pub fn status(&self) -> SimulationStatus {
		self.status
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	#[cfg(test)]
	pub fn node(&self, code: &str) -> Option<&LayoutNode> {
		self.index.get(code).map(|&i| &self.nodes[i])
	}

	/// Replaces the node set. Codes already present keep their position and velocity,
	/// new codes are seeded near their anchor, missing codes are dropped. Always
	/// reheats the solver.
	pub fn set_nodes(&mut self, specs: impl IntoIterator<Item = NodeSpec>) {
		let mut previous: HashMap<String, LayoutNode> = self
			.nodes
			.drain(..)
			.map(|node| (node.code.clone(), node))
			.collect();
		self.index.clear();

		for spec in specs {
			if self.index.contains_key(&spec.code) {
				warn!("duplicate layout node {}, keeping the first", spec.code);
				continue;
			}
			let node = match previous.remove(&spec.code) {
				Some(old) => LayoutNode {
					country: spec.country,
					value: spec.value,
					radius: spec.radius,
					target_x: spec.target[0],
					target_y: spec.target[1],
					..old
				},
				None => {
					let [dx, dy] = seed_offset(&spec.code, self.params.seed_radius);
					LayoutNode {
						x: spec.target[0] + dx,
						y: spec.target[1] + dy,
						vx: 0.0,
						vy: 0.0,
						target_x: spec.target[0],
						target_y: spec.target[1],
						code: spec.code,
						country: spec.country,
						value: spec.value,
						radius: spec.radius,
					}
				}
			};
			self.index.insert(node.code.clone(), self.nodes.len());
			self.nodes.push(node);
		}
		self.reheat();
	}

	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.status = if self.nodes.is_empty() {
			SimulationStatus::Idle
		} else {
			SimulationStatus::Simulating
		};
	}

	/// One relaxation pass over every node.
	pub fn tick(&mut self) -> SimulationStatus {
		if self.status == SimulationStatus::Idle {
			return self.status;
		}
		let p = self.params;
		self.alpha *= 1.0 - p.alpha_decay;

		let pull = p.anchor_strength * self.alpha;
		let keep = 1.0 - p.velocity_decay;
		for node in &mut self.nodes {
			node.vx += (node.target_x - node.x) * pull;
			node.vy += (node.target_y - node.y) * pull;
			node.vx *= keep;
			node.vy *= keep;
			node.x += node.vx;
			node.y += node.vy;
		}
		for _ in 0..p.collide_iterations {
			self.collide();
		}

		if self.alpha < p.alpha_min {
			self.status = SimulationStatus::Idle;
		}
		self.status
	}

	/// Runs up to `max_ticks` synchronously; returns how many ran.
	pub fn settle(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.status == SimulationStatus::Simulating {
			self.tick();
			ticks += 1;
		}
		ticks
	}

	/// Topmost node under the point; later nodes paint above earlier ones.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&LayoutNode> {
		self.nodes
			.iter()
			.rev()
			.find(|n| (n.x - x).hypot(n.y - y) <= n.radius.max(1.0))
	}

	/// Pushes overlapping pairs apart along their center line. The larger mark moves
	/// less, in proportion to its area.
	fn collide(&mut self) {
		let padding = self.params.collide_padding;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (head, tail) = self.nodes.split_at_mut(j);
				let (a, b) = (&mut head[i], &mut tail[0]);
				let min = a.radius + b.radius + padding;
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let dist = dx.hypot(dy);
				if dist >= min {
					continue;
				}
				let (ux, uy) = if dist < 1e-9 {
					let angle = jiggle_angle(i, j);
					(angle.cos(), angle.sin())
				} else {
					(dx / dist, dy / dist)
				};
				let overlap = min - dist;
				let (ra, rb) = (a.radius * a.radius, b.radius * b.radius);
				let share_a = if ra + rb > 0.0 { rb / (ra + rb) } else { 0.5 };
				a.x -= ux * overlap * share_a;
				a.y -= uy * overlap * share_a;
				b.x += ux * overlap * (1.0 - share_a);
				b.y += uy * overlap * (1.0 - share_a);
			}
		}
	}
}

/// FNV-1a over the code's bytes.
fn code_hash(code: &str) -> u64 {
	code.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
		(acc ^ b as u64).wrapping_mul(1_099_511_628_211)
	})
}

/// Offset from the anchor at which a country first appears. Stable per code.
pub fn seed_offset(code: &str, seed_radius: f64) -> [f64; 2] {
	let h = code_hash(code);
	let angle = (h & 0xffff) as f64 / 65536.0 * 2.0 * PI;
	let distance = seed_radius * (0.5 + ((h >> 16) & 0xffff) as f64 / 65536.0 * 0.5);
	[distance * angle.cos(), distance * angle.sin()]
}

fn jiggle_angle(i: usize, j: usize) -> f64 {
	let h = (((i as u64) << 32) | j as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
	(h >> 11) as f64 / (1u64 << 53) as f64 * 2.0 * PI
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(code: &str, radius: f64, target: [f64; 2]) -> NodeSpec {
		NodeSpec {
			code: code.into(),
			country: code.to_lowercase(),
			value: radius * radius,
			radius,
			target,
		}
	}

	#[test]
	fn new_layout_is_idle_until_nodes_arrive() {
		let mut layout = ForceLayout::new(ForceParameters::default());
		assert_eq!(layout.status(), SimulationStatus::Idle);
		assert_eq!(layout.tick(), SimulationStatus::Idle);
		layout.set_nodes(Vec::new());
		assert_eq!(layout.status(), SimulationStatus::Idle);
		layout.set_nodes(vec![spec("AAA", 5.0, [0.0, 0.0])]);
		assert_eq!(layout.status(), SimulationStatus::Simulating);
	}

	#[test]
	fn seeding_is_deterministic_per_code() {
		let mut a = ForceLayout::new(ForceParameters::default());
		let mut b = ForceLayout::new(ForceParameters::default());
		a.set_nodes(vec![spec("USA", 10.0, [100.0, 100.0])]);
		b.set_nodes(vec![
			spec("CHN", 10.0, [0.0, 0.0]),
			spec("USA", 10.0, [100.0, 100.0]),
		]);
		let (na, nb) = (a.node("USA").unwrap(), b.node("USA").unwrap());
		assert_eq!((na.x, na.y), (nb.x, nb.y));
		assert_ne!(seed_offset("USA", 40.0), seed_offset("CHN", 40.0));
		let [dx, dy] = seed_offset("USA", 40.0);
		let d = dx.hypot(dy);
		assert!((20.0..=40.0).contains(&d));
	}

	#[test]
	fn converges_to_idle_with_vanishing_velocity() {
		let mut layout = ForceLayout::new(ForceParameters::default());
		let codes = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH"];
		layout.set_nodes(codes.iter().map(|c| spec(c, 12.0, [200.0, 150.0])));
		let ticks = layout.settle(10_000);
		assert!(ticks < 10_000);
		assert_eq!(layout.status(), SimulationStatus::Idle);
		let speed = layout.nodes.iter().map(|n| n.vx.hypot(n.vy)).fold(0.0, f64::max);
		assert!(speed < 0.05, "speed {speed}");
	}

	#[test]
	fn isolated_pair_ends_separated() {
		let params = ForceParameters {
			anchor_strength: 0.0,
			..ForceParameters::default()
		};
		let mut layout = ForceLayout::new(params);
		layout.set_nodes(vec![spec("AAA", 30.0, [0.0, 0.0]), spec("BBB", 20.0, [0.0, 0.0])]);
		layout.settle(10_000);
		let (a, b) = (layout.node("AAA").unwrap(), layout.node("BBB").unwrap());
		let dist = (a.x - b.x).hypot(a.y - b.y);
		assert!(dist >= 30.0 + 20.0 + params.collide_padding - 1e-9, "dist {dist}");
	}

	#[test]
	fn coincident_nodes_are_pulled_apart() {
		let params = ForceParameters {
			anchor_strength: 0.0,
			seed_radius: 0.0,
			..ForceParameters::default()
		};
		let mut layout = ForceLayout::new(params);
		layout.set_nodes(vec![spec("AAA", 5.0, [0.0, 0.0]), spec("BBB", 5.0, [0.0, 0.0])]);
		layout.tick();
		let (a, b) = (layout.node("AAA").unwrap(), layout.node("BBB").unwrap());
		let dist = (a.x - b.x).hypot(a.y - b.y);
		assert!((dist - 11.0).abs() < 1e-9);
		assert!(a.x.is_finite() && b.y.is_finite());
	}

	#[test]
	fn positions_persist_across_updates_and_missing_codes_drop() {
		let mut layout = ForceLayout::new(ForceParameters::default());
		layout.set_nodes(vec![spec("AAA", 5.0, [0.0, 0.0]), spec("BBB", 5.0, [50.0, 0.0])]);
		for _ in 0..20 {
			layout.tick();
		}
		let before = layout.node("AAA").cloned().unwrap();

		layout.set_nodes(vec![spec("AAA", 9.0, [10.0, 10.0]), spec("CCC", 5.0, [0.0, 0.0])]);
		let after = layout.node("AAA").unwrap();
		assert_eq!((after.x, after.y), (before.x, before.y));
		assert_eq!(after.radius, 9.0);
		assert_eq!((after.target_x, after.target_y), (10.0, 10.0));
		assert!(layout.node("BBB").is_none());
		assert_eq!(layout.nodes().len(), 2);
		assert_eq!(layout.alpha(), 1.0);
		assert_eq!(layout.status(), SimulationStatus::Simulating);
	}

	#[test]
	fn duplicate_specs_keep_the_first() {
		let mut layout = ForceLayout::new(ForceParameters::default());
		layout.set_nodes(vec![spec("AAA", 5.0, [0.0, 0.0]), spec("AAA", 50.0, [0.0, 0.0])]);
		assert_eq!(layout.nodes().len(), 1);
		assert_eq!(layout.node("AAA").unwrap().radius, 5.0);
	}

	#[test]
	fn anchors_attract_nodes() {
		let mut layout = ForceLayout::new(ForceParameters::default());
		layout.set_nodes(vec![spec("AAA", 2.0, [0.0, 0.0])]);
		layout.set_nodes(vec![spec("AAA", 2.0, [500.0, 0.0])]);
		layout.settle(10_000);
		let node = layout.node("AAA").unwrap();
		assert!(node.x > 100.0, "x {}", node.x);
		assert!(layout.node_at(node.x, node.y).is_some());
		assert!(layout.node_at(-1000.0, -1000.0).is_none());
	}
}
