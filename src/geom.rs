use glam::{vec2, Vec2, Vec3};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Bounds of a projected stroke, half-open on their upper side so that points
/// on a right or top edge fall outside, as they do in [`polygon_contains`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABox {
	min: Vec2,
	max: Vec2,
}

impl AABox {
	/// The smallest box around `points`. Contains nothing when `points` is empty.
	pub fn containing(points: impl Iterator<Item = Vec2>) -> Self {
		points.fold(
			Self {
				min: Vec2::MAX,
				max: Vec2::MIN,
			},
			|bounds, p| Self {
				min: bounds.min.min(p),
				max: bounds.max.max(p),
			},
		)
	}

	pub fn contains(&self, point: Vec2) -> bool {
		point.cmpge(self.min).all() && point.cmplt(self.max).all()
	}
}

/// The plane stroke points are flattened onto before containment tests.
#[derive(
	Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionPlane {
	/// Drops `z`.
	#[default]
	#[display("xy")]
	Xy,
	/// Drops `y`.
	#[display("xz")]
	Xz,
	/// Drops `x`.
	#[display("yz")]
	Yz,
}

impl ProjectionPlane {
	pub fn project(self, point: Vec3) -> Vec2 {
		match self {
			Self::Xy => vec2(point.x, point.y),
			Self::Xz => vec2(point.x, point.z),
			Self::Yz => vec2(point.y, point.z),
		}
	}
}

/// Even-odd crossing test of `point` against the closed polygon through `polygon`.
///
/// Edges are half-open: an edge straddles the query row only when exactly one of
/// its endpoints lies strictly above it, so a vertex on the row is counted once.
/// The crossing must lie strictly to the right of `point`. As a consequence,
/// points on a left or bottom edge test as inside and points on a right or top
/// edge test as outside.
pub fn polygon_contains<I>(polygon: I, point: Vec2) -> bool
where
	I: IntoIterator<Item = Vec2>,
	I::IntoIter: Clone + ExactSizeIterator,
{
	let polygon = polygon.into_iter();
	if polygon.len() < 3 {
		return false;
	}
	polygon
		.circular_tuple_windows::<(Vec2, Vec2)>()
		.filter(|&(prev, next)| (next.y > point.y) != (prev.y > point.y))
		.filter(|&(prev, next)| {
			let crossing_x = (prev.x - next.x) * (point.y - next.y) / (prev.y - next.y) + next.x;
			point.x < crossing_x
		})
		.count() % 2
		== 1
}
