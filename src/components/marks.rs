//! Retained mark model, diffed by key on every data change.

use std::collections::{HashMap, HashSet};

use log::warn;

pub trait Lerp: Clone + PartialEq {
	fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		self + (to - self) * t
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug, PartialEq)]
struct Mark<A> {
	from: A,
	to: A,
	elapsed: f64,
}

impl<A: Lerp> Mark<A> {
	fn current(&self, duration: f64) -> A {
		if duration <= 0.0 || self.elapsed >= duration {
			return self.to.clone();
		}
		self.from.lerp(&self.to, ease_out_cubic(self.elapsed / duration))
	}

	fn animating(&self, duration: f64) -> bool {
		self.elapsed < duration && self.from != self.to
	}
}

/// What an update did to the mark set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkDiff {
	pub entered: Vec<String>,
	pub updated: usize,
	pub exited: Vec<String>,
}

/// Marks keyed by country code, each easing from its last drawn state to its latest
/// target over `duration` seconds.
#[derive(Clone, Debug)]
pub struct MarkSet<A> {
	marks: HashMap<String, Mark<A>>,
	order: Vec<String>,
	duration: f64,
}

impl<A: Lerp> MarkSet<A> {
	pub fn new(duration: f64) -> Self {
		Self {
			marks: HashMap::new(),
			order: Vec::new(),
			duration,
		}
	}

	/// Diffs `targets` against the current marks. Entering marks start from
	/// `enter_from(target)`, existing ones restart from where they are drawn now, and
	/// marks whose key is absent are removed. Paint order follows `targets`.
	pub fn apply<I>(&mut self, targets: I, enter_from: impl Fn(&A) -> A) -> MarkDiff
	where
		I: IntoIterator<Item = (String, A)>,
	{
		let mut diff = MarkDiff::default();
		let mut order = Vec::new();
		let mut seen = HashSet::new();

		for (key, target) in targets {
			if !seen.insert(key.clone()) {
				warn!("duplicate mark key {key}, keeping the first");
				continue;
			}
			match self.marks.get_mut(&key) {
				Some(mark) => {
					if mark.to != target {
						mark.from = mark.current(self.duration);
						mark.to = target;
						mark.elapsed = 0.0;
					}
					diff.updated += 1;
				}
				None => {
					self.marks.insert(
						key.clone(),
						Mark {
							from: enter_from(&target),
							to: target,
							elapsed: 0.0,
						},
					);
					diff.entered.push(key.clone());
				}
			}
			order.push(key);
		}

		for key in &self.order {
			if !seen.contains(key) {
				self.marks.remove(key);
				diff.exited.push(key.clone());
			}
		}
		self.order = order;
		diff
	}

	/// Advances every transition; true while any is still running.
	pub fn tick(&mut self, dt: f64) -> bool {
		let mut animating = false;
		for mark in self.marks.values_mut() {
			if mark.animating(self.duration) {
				mark.elapsed += dt;
				animating |= mark.animating(self.duration);
			}
		}
		animating
	}

	/// Jumps every mark to its target.
	pub fn finish(&mut self) {
		for mark in self.marks.values_mut() {
			mark.from = mark.to.clone();
			mark.elapsed = self.duration;
		}
	}

	pub fn get(&self, key: &str) -> Option<A> {
		self.marks.get(key).map(|m| m.current(self.duration))
	}

	pub fn target(&self, key: &str) -> Option<&A> {
		self.marks.get(key).map(|m| &m.to)
	}

	/// Current values in paint order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, A)> + '_ {
		self.order.iter().filter_map(|key| {
			self.marks
				.get(key)
				.map(|m| (key.as_str(), m.current(self.duration)))
		})
	}

	#[cfg(test)]
	pub fn keys(&self) -> &[String] {
		&self.order
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn clear(&mut self) {
		self.marks.clear();
		self.order.clear();
	}
}
