use glam::{Quat, Vec3};

use crate::config::DrawConfig;

/// A run of trace points rendered as one variable-width line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
	orientation: Quat,
	positions: Vec<Vec3>,
	widths: Vec<f32>,
}

impl Segment {
	fn new(orientation: Quat) -> Self {
		Self {
			orientation,
			positions: Vec::new(),
			widths: Vec::new(),
		}
	}

	fn push(&mut self, position: Vec3, width: f32) {
		self.positions.push(position);
		self.widths.push(width);
	}

	/// Orientation of the surface the segment was started on.
	pub fn orientation(&self) -> Quat {
		self.orientation
	}

	pub fn positions(&self) -> &[Vec3] {
		&self.positions
	}

	pub fn widths(&self) -> &[f32] {
		&self.widths
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

/// The visible line left behind by a stroke.
///
/// Kept separate from [`Stroke`](super::Stroke): segments break whenever the
/// line width jumps or a segment grows too long, which has no bearing on closure.
#[derive(Debug, Clone)]
pub struct Trace {
	segments: Vec<Segment>,
	last_point: Option<Vec3>,
	last_width: Option<f32>,
	line_width: f32,
	reuse_tolerance: f32,
	segment_point_limit: usize,
}

impl Trace {
	pub fn new(config: &DrawConfig) -> Self {
		Self {
			segments: Vec::new(),
			last_point: None,
			last_width: None,
			line_width: config.line_width(),
			reuse_tolerance: config.reuse_tolerance(),
			segment_point_limit: config.segment_point_limit(),
		}
	}

	/// Appends an accepted sample drawn with `intensity` in `[0, 1]`.
	///
	/// `new_segment` comes from the sampler and marks the first point after the
	/// probe touched the surface; such segments start fresh at `position`. Any
	/// other break carries the previous point over so the line stays connected.
	pub fn record(&mut self, position: Vec3, orientation: Quat, intensity: f32, new_segment: bool) {
		let width = self.line_width * intensity.clamp(0.0, 1.0);
		let width_changed = self
			.last_width
			.is_some_and(|last| (last - width).abs() > self.reuse_tolerance);
		let full = self
			.segments
			.last()
			.map_or(true, |segment| segment.len() >= self.segment_point_limit);

		if new_segment || width_changed || full {
			let mut segment = Segment::new(orientation);
			if !new_segment {
				if let Some(last_point) = self.last_point {
					segment.push(last_point, width);
				}
			}
			self.segments.push(segment);
		}
		if let Some(segment) = self.segments.last_mut() {
			segment.push(position, width);
		}
		self.last_point = Some(position);
		self.last_width = Some(width);
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	pub fn point_count(&self) -> usize {
		self.segments.iter().map(Segment::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}
