use std::fmt;

use glam::Vec3;
use itertools::Itertools;

/// A point of interest that a closed stroke may enclose.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosableTarget<K> {
	pub id: K,
	pub position: Vec3,
	enclosed: bool,
}

impl<K> EnclosableTarget<K> {
	pub fn new(id: K, position: Vec3) -> Self {
		Self {
			id,
			position,
			enclosed: false,
		}
	}

	pub fn is_enclosed(&self) -> bool {
		self.enclosed
	}

	pub(crate) fn set_enclosed(&mut self, enclosed: bool) {
		self.enclosed = enclosed;
	}
}

/// Targets registered by the host, in registration order.
#[derive(Debug, Clone)]
pub struct TargetSet<K> {
	targets: Vec<EnclosableTarget<K>>,
}

impl<K> Default for TargetSet<K> {
	fn default() -> Self {
		Self {
			targets: Vec::new(),
		}
	}
}

impl<K: PartialEq> TargetSet<K> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a target, or moves it if `id` is already known.
	pub fn insert(&mut self, id: K, position: Vec3) {
		match self.get_mut(&id) {
			Some(target) => target.position = position,
			None => self.targets.push(EnclosableTarget::new(id, position)),
		}
	}

	pub fn remove(&mut self, id: &K) -> Option<EnclosableTarget<K>> {
		let index = self.targets.iter().position(|t| &t.id == id)?;
		Some(self.targets.remove(index))
	}

	pub fn get(&self, id: &K) -> Option<&EnclosableTarget<K>> {
		self.targets.iter().find(|t| &t.id == id)
	}

	fn get_mut(&mut self, id: &K) -> Option<&mut EnclosableTarget<K>> {
		self.targets.iter_mut().find(|t| &t.id == id)
	}

	pub fn is_enclosed(&self, id: &K) -> Option<bool> {
		self.get(id).map(EnclosableTarget::is_enclosed)
	}

	pub fn iter(&self) -> impl Iterator<Item = &EnclosableTarget<K>> {
		self.targets.iter()
	}

	pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnclosableTarget<K>> {
		self.targets.iter_mut()
	}

	pub fn enclosed(&self) -> impl Iterator<Item = &EnclosableTarget<K>> {
		self.targets.iter().filter(|t| t.enclosed)
	}

	pub fn clear_flags(&mut self) {
		for target in &mut self.targets {
			target.enclosed = false;
		}
	}

	pub fn len(&self) -> usize {
		self.targets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}
}

impl<K: Clone + PartialEq> TargetSet<K> {
	pub fn report(&self) -> EnclosureReport<K> {
		EnclosureReport {
			enclosed: self.enclosed().map(|t| t.id.clone()).collect(),
		}
	}
}

/// The ids of every enclosed target, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnclosureReport<K> {
	pub enclosed: Vec<K>,
}

impl<K> EnclosureReport<K> {
	pub fn is_empty(&self) -> bool {
		self.enclosed.is_empty()
	}
}

impl<K: fmt::Display> fmt::Display for EnclosureReport<K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.enclosed.is_empty() {
			return f.write_str("no objects enclosed");
		}
		write!(f, "{}", self.enclosed.iter().format(", "))
	}
}
