use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geom::{polygon_contains, AABox, ProjectionPlane};

/// One accepted sample of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokePoint {
	position: Vec3,
}

impl StrokePoint {
	pub fn position(&self) -> Vec3 {
		self.position
	}
}

impl From<Vec3> for StrokePoint {
	fn from(position: Vec3) -> Self {
		Self { position }
	}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
	#[default]
	Empty,
	Open,
	Sealed,
}

/// Closure and containment queries over a borrowed run of points.
#[derive(Debug, Clone, Copy)]
pub struct StrokeView<'a> {
	points: &'a [StrokePoint],
	close_threshold: f32,
	plane: ProjectionPlane,
}

impl<'a> StrokeView<'a> {
	pub fn points(&self) -> &'a [StrokePoint] {
		self.points
	}

	/// Whether the first and last points are within the closing threshold.
	///
	/// Strokes with fewer than two points are never closed.
	pub fn is_closed(&self) -> bool {
		let [first, .., last] = self.points else {
			return false;
		};
		first.position.distance(last.position) <= self.close_threshold
	}

	/// Whether `target` lies inside the closed stroke projected on its plane.
	///
	/// Always `false` for open strokes and strokes with fewer than three points.
	pub fn contains_point(&self, target: Vec2) -> bool {
		if self.points.len() < 3 || !self.is_closed() {
			return false;
		}
		if !self.bounds().contains(target) {
			return false;
		}
		polygon_contains(self.projected(), target)
	}

	pub fn bounds(&self) -> AABox {
		AABox::containing(self.projected())
	}

	fn projected(&self) -> impl ExactSizeIterator<Item = Vec2> + Clone + 'a {
		let (points, plane) = (self.points, self.plane);
		points.iter().map(move |p| plane.project(p.position))
	}
}

/// The ordered points of one gesture.
#[derive(Debug, Clone)]
pub struct Stroke {
	points: Vec<StrokePoint>,
	state: StrokeState,
	close_threshold: f32,
	plane: ProjectionPlane,
}

impl Stroke {
	pub fn new(close_threshold: f32) -> Self {
		Self {
			points: Vec::new(),
			state: StrokeState::Empty,
			close_threshold,
			plane: ProjectionPlane::default(),
		}
	}

	pub fn with_plane(self, plane: ProjectionPlane) -> Self {
		Self { plane, ..self }
	}

	/// Appends a point. Sealed strokes are frozen and ignore further points.
	pub fn add_point(&mut self, position: Vec3) {
		if self.state == StrokeState::Sealed {
			tracing::warn!(%position, "point added to a sealed stroke");
			return;
		}
		self.points.push(StrokePoint::from(position));
		self.state = StrokeState::Open;
	}

	/// Freezes the stroke. Sealing an empty stroke leaves it empty.
	pub fn seal(&mut self) {
		if self.state == StrokeState::Open {
			self.state = StrokeState::Sealed;
		}
	}

	pub fn reset(&mut self) {
		self.points.clear();
		self.state = StrokeState::Empty;
	}

	pub fn state(&self) -> StrokeState {
		self.state
	}

	pub fn is_sealed(&self) -> bool {
		self.state == StrokeState::Sealed
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn close_threshold(&self) -> f32 {
		self.close_threshold
	}

	pub fn plane(&self) -> ProjectionPlane {
		self.plane
	}

	pub fn view(&self) -> StrokeView<'_> {
		StrokeView {
			points: &self.points,
			close_threshold: self.close_threshold,
			plane: self.plane,
		}
	}

	pub fn points(&self) -> &[StrokePoint] {
		&self.points
	}

	pub fn is_closed(&self) -> bool {
		self.view().is_closed()
	}

	pub fn contains_point(&self, target: Vec2) -> bool {
		self.view().contains_point(target)
	}

	/// Copies the current points into an immutable value that can be handed to
	/// another thread.
	pub fn snapshot(&self) -> StrokeSnapshot {
		StrokeSnapshot {
			points: self.points.as_slice().into(),
			close_threshold: self.close_threshold,
			plane: self.plane,
		}
	}
}

#[derive(Debug, Clone)]
pub struct StrokeSnapshot {
	points: Arc<[StrokePoint]>,
	close_threshold: f32,
	plane: ProjectionPlane,
}

static_assertions::assert_impl_all!(StrokeSnapshot: Send, Sync);

impl StrokeSnapshot {
	pub fn view(&self) -> StrokeView<'_> {
		StrokeView {
			points: &self.points,
			close_threshold: self.close_threshold,
			plane: self.plane,
		}
	}

	pub fn is_closed(&self) -> bool {
		self.view().is_closed()
	}

	pub fn contains_point(&self, target: Vec2) -> bool {
		self.view().contains_point(target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test::*;
	use glam::{vec2, vec3};

	#[test]
	fn test_closure_needs_two_points() {
		let mut stroke = Stroke::new(1.0);
		assert!(!stroke.is_closed());
		stroke.add_point(Vec3::ZERO);
		assert!(!stroke.is_closed());
		stroke.add_point(Vec3::ZERO);
		assert!(stroke.is_closed());
	}

	#[test]
	fn test_closure_threshold_is_inclusive() {
		let mut stroke = Stroke::new(0.5);
		stroke.add_point(Vec3::ZERO);
		stroke.add_point(vec3(3.0, 0.0, 0.0));
		stroke.add_point(vec3(0.0, 0.5, 0.0));
		assert!(stroke.is_closed());

		let mut stroke = Stroke::new(0.5);
		stroke.add_point(Vec3::ZERO);
		stroke.add_point(vec3(3.0, 0.0, 0.0));
		stroke.add_point(vec3(0.0, 0.0, 0.5001));
		assert!(!stroke.is_closed());
	}

	#[test]
	fn test_closure_uses_all_three_axes() {
		let mut stroke = Stroke::new(0.1);
		stroke.add_point(Vec3::ZERO);
		stroke.add_point(vec3(1.0, 0.0, 0.0));
		stroke.add_point(vec3(0.0, 0.0, 1.0));
		assert!(!stroke.is_closed());
	}

	#[test]
	fn test_unit_square() {
		let stroke = stroke_from(unit_square(), 0.0);
		assert!(stroke.is_closed());
		assert!(stroke.contains_point(vec2(0.5, 0.5)));
		assert!(!stroke.contains_point(vec2(2.0, 2.0)));
	}

	#[test]
	fn test_containment_needs_three_points() {
		let mut stroke = Stroke::new(10.0);
		stroke.add_point(Vec3::ZERO);
		stroke.add_point(vec3(1.0, 1.0, 0.0));
		assert!(stroke.is_closed());
		assert!(!stroke.contains_point(vec2(0.5, 0.5)));
	}

	#[test]
	fn test_open_stroke_contains_nothing() {
		let mut points = unit_square();
		points.pop();
		let stroke = stroke_from(points, 0.5);
		assert!(!stroke.is_closed());
		assert!(!stroke.contains_point(vec2(0.5, 0.5)));
	}

	#[test]
	fn test_projection_drops_depth() {
		// The same square drawn on a slanted surface still encloses its center.
		let points = unit_square()
			.into_iter()
			.map(|p| vec3(p.x, p.y, p.x * 0.3 + p.y * 0.1))
			.collect();
		let stroke = stroke_from(points, 0.0);
		assert!(stroke.contains_point(vec2(0.5, 0.5)));
	}

	#[test]
	fn test_other_planes() {
		let points: Vec<Vec3> = unit_square()
			.into_iter()
			.map(|p| vec3(p.x, 5.0, p.y))
			.collect();
		let stroke = stroke_from(points.clone(), 0.0);
		assert!(!stroke.contains_point(vec2(0.5, 0.5)));
		let stroke = stroke_from(points, 0.0).with_plane(ProjectionPlane::Xz);
		assert!(stroke.contains_point(vec2(0.5, 0.5)));
	}

	#[test]
	fn test_sealed_stroke_is_frozen() {
		let mut stroke = stroke_from(unit_square(), 0.0);
		assert_eq!(stroke.state(), StrokeState::Sealed);
		stroke.add_point(vec3(9.0, 9.0, 9.0));
		assert_eq!(stroke.len(), 5);
		assert!(stroke.is_closed());
	}

	#[test]
	fn test_lifecycle() {
		let mut stroke = Stroke::new(0.1);
		assert_eq!(stroke.state(), StrokeState::Empty);
		stroke.seal();
		assert_eq!(stroke.state(), StrokeState::Empty);
		stroke.add_point(Vec3::ZERO);
		assert_eq!(stroke.state(), StrokeState::Open);
		stroke.seal();
		assert!(stroke.is_sealed());
		stroke.reset();
		assert_eq!(stroke.state(), StrokeState::Empty);
		assert!(stroke.is_empty());
	}

	#[test]
	fn test_snapshot_matches_stroke() {
		let stroke = stroke_from(unit_square(), 0.0);
		let snapshot = stroke.snapshot();
		let handle = std::thread::spawn(move || {
			(
				snapshot.is_closed(),
				snapshot.contains_point(vec2(0.25, 0.75)),
				snapshot.contains_point(vec2(1.5, 0.5)),
			)
		});
		assert_eq!(handle.join().unwrap(), (true, true, false));
	}

	#[test]
	fn test_random_containment_matches_circle() {
		fastrand::seed(0x13371337);
		let points = circle(vec3(0.0, 0.0, 0.0), 1.0, 256);
		let stroke = stroke_from(points, 1e-3);
		for _ in 0..500 {
			let p = 3.0 * (vec2(fastrand::f32(), fastrand::f32()) - 0.5);
			// Stay clear of the polygon's chords.
			if (p.length() - 1.0).abs() < 0.01 {
				continue;
			}
			assert_eq!(stroke.contains_point(p), p.length() < 1.0, "{p}");
		}
	}
}
