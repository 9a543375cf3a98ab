use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{DrawConfig, Reacquire};

/// How far drawn points are pulled back off the surface along the probe.
const SURFACE_OFFSET: f32 = 0.0005;

/// A surface contact reported by the pointing sensor for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
	pub position: Vec3,
	#[serde(default)]
	pub orientation: Quat,
	/// Proximity of the probe tip to the surface, 1 when touching.
	#[serde(default = "full_intensity")]
	pub intensity: f32,
}

fn full_intensity() -> f32 {
	1.0
}

impl Contact {
	pub fn new(position: Vec3) -> Self {
		Self {
			position,
			orientation: Quat::IDENTITY,
			intensity: full_intensity(),
		}
	}

	/// Derives a contact from a probe ray of length `reach` fired from `origin`
	/// along `direction` that hit `hit_point` on a surface with `hit_normal`.
	pub fn from_probe(
		origin: Vec3,
		direction: Vec3,
		hit_point: Vec3,
		hit_normal: Vec3,
		reach: f32,
	) -> Self {
		let tip_fraction = if reach > 0.0 {
			(origin.distance(hit_point) / reach).clamp(0.0, 1.0)
		} else {
			0.0
		};
		let normal = hit_normal.normalize_or_zero();
		let orientation = if normal == Vec3::ZERO {
			Quat::IDENTITY
		} else {
			Quat::from_rotation_arc(Vec3::NEG_Z, normal)
		};
		Self {
			position: hit_point - direction.normalize_or_zero() * SURFACE_OFFSET,
			orientation,
			intensity: 1.0 - tip_fraction,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
pub enum Rejection {
	#[display("no surface contact")]
	NoContact,
	#[display("no stroke in progress")]
	Idle,
	#[display("moved {distance} which is within the minimum draw distance")]
	TooClose { distance: f32 },
	#[display("jumped {distance} which exceeds the maximum point delta")]
	Jump { distance: f32 },
}

/// The decision for one sampling tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
	Accepted {
		position: Vec3,
		/// The point starts a new visual segment of the trace.
		new_segment: bool,
	},
	Rejected(Rejection),
}

impl Sample {
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted { .. })
	}

	pub fn accepted(&self) -> Option<Vec3> {
		match *self {
			Self::Accepted { position, .. } => Some(position),
			Self::Rejected(_) => None,
		}
	}
}

/// Filters the raw per-tick contacts of a gesture down to the points worth keeping.
#[derive(Debug, Clone)]
pub struct StrokeSampler {
	min_draw_distance: f32,
	max_point_delta: f32,
	reacquire: Reacquire,
	reference: Option<Vec3>,
	lifted: bool,
}

impl StrokeSampler {
	/// A zero `max_point_delta` disables the jump filter.
	pub fn new(min_draw_distance: f32, max_point_delta: f32) -> Self {
		Self {
			min_draw_distance,
			max_point_delta,
			reacquire: Reacquire::default(),
			reference: None,
			lifted: false,
		}
	}

	pub fn from_config(config: &DrawConfig) -> Self {
		Self::new(config.min_draw_distance(), config.max_point_delta())
			.with_reacquire(config.reacquire())
	}

	pub fn with_reacquire(self, reacquire: Reacquire) -> Self {
		Self { reacquire, ..self }
	}

	/// Forgets the reference point so the next contact is accepted unconditionally.
	pub fn begin(&mut self) {
		self.reference = None;
		self.lifted = false;
	}

	pub fn reference(&self) -> Option<Vec3> {
		self.reference
	}

	pub fn sample(&mut self, contact: Option<&Contact>) -> Sample {
		let Some(contact) = contact else {
			self.lifted = true;
			tracing::trace!("sample rejected: no contact");
			return Sample::Rejected(Rejection::NoContact);
		};
		let position = contact.position;

		let reference = match self.reference {
			Some(_) if self.lifted && self.reacquire == Reacquire::Rebase => None,
			reference => reference,
		};
		let Some(reference) = reference else {
			return self.accept(position, true);
		};

		let distance = reference.distance(position);
		if self.max_point_delta > 0.0 && distance > self.max_point_delta {
			tracing::trace!(distance, "sample rejected as a jump");
			Sample::Rejected(Rejection::Jump { distance })
		} else if distance > self.min_draw_distance {
			let new_segment = self.lifted;
			self.accept(position, new_segment)
		} else {
			Sample::Rejected(Rejection::TooClose { distance })
		}
	}

	fn accept(&mut self, position: Vec3, new_segment: bool) -> Sample {
		tracing::trace!(%position, new_segment, "sample accepted");
		self.reference = Some(position);
		self.lifted = false;
		Sample::Accepted {
			position,
			new_segment,
		}
	}
}
