use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::ProjectionPlane;

pub const DEFAULT_MIN_DRAW_DISTANCE: f32 = 0.02;
pub const DEFAULT_MAX_POINT_DELTA: f32 = 0.1;
pub const DEFAULT_CLOSE_THRESHOLD: f32 = 0.05;
pub const DEFAULT_LINE_WIDTH: f32 = 0.02;
pub const DEFAULT_REUSE_TOLERANCE: f32 = 0.001;
pub const DEFAULT_SEGMENT_POINT_LIMIT: usize = 100;
pub const DEFAULT_ERASE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// What the sampler does with the first contact after the probe left the surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reacquire {
	/// Judge it against the last accepted point like any other sample.
	Guarded,
	/// Accept it unconditionally and make it the new reference point.
	#[default]
	Rebase,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("`{field}` must be finite and non-negative, got {value}")]
	InvalidDistance { field: &'static str, value: f32 },
	#[error("`close_threshold` must be positive, got {0}")]
	NonPositiveCloseThreshold(f32),
	#[error("`max_point_delta` ({max_point_delta}) is smaller than `min_draw_distance` ({min_draw_distance}), every movement would be rejected")]
	DeltaBelowDrawDistance {
		max_point_delta: f32,
		min_draw_distance: f32,
	},
	#[error("`segment_point_limit` must be at least 2, got {0}")]
	SegmentPointLimit(usize),
	#[error("invalid configuration json")]
	Json(#[from] serde_json::Error),
}

/// Tunables of the drawing tool.
///
/// Values are validated on construction; use [`DrawConfig::builder`] or
/// [`DrawConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawConfig {
	min_draw_distance: f32,
	max_point_delta: f32,
	close_threshold: f32,
	line_width: f32,
	reuse_tolerance: f32,
	segment_point_limit: usize,
	#[serde(with = "seconds")]
	erase_delay: Duration,
	#[serde(with = "seconds")]
	sample_interval: Duration,
	plane: ProjectionPlane,
	reacquire: Reacquire,
}

impl Default for DrawConfig {
	fn default() -> Self {
		Self {
			min_draw_distance: DEFAULT_MIN_DRAW_DISTANCE,
			max_point_delta: DEFAULT_MAX_POINT_DELTA,
			close_threshold: DEFAULT_CLOSE_THRESHOLD,
			line_width: DEFAULT_LINE_WIDTH,
			reuse_tolerance: DEFAULT_REUSE_TOLERANCE,
			segment_point_limit: DEFAULT_SEGMENT_POINT_LIMIT,
			erase_delay: DEFAULT_ERASE_DELAY,
			sample_interval: DEFAULT_SAMPLE_INTERVAL,
			plane: ProjectionPlane::default(),
			reacquire: Reacquire::default(),
		}
	}
}

#[bon::bon]
impl DrawConfig {
	#[builder]
	pub fn new(
		#[builder(default = DEFAULT_MIN_DRAW_DISTANCE)] min_draw_distance: f32,
		#[builder(default = DEFAULT_MAX_POINT_DELTA)] max_point_delta: f32,
		#[builder(default = DEFAULT_CLOSE_THRESHOLD)] close_threshold: f32,
		#[builder(default = DEFAULT_LINE_WIDTH)] line_width: f32,
		#[builder(default = DEFAULT_REUSE_TOLERANCE)] reuse_tolerance: f32,
		#[builder(default = DEFAULT_SEGMENT_POINT_LIMIT)] segment_point_limit: usize,
		#[builder(default = DEFAULT_ERASE_DELAY)] erase_delay: Duration,
		#[builder(default = DEFAULT_SAMPLE_INTERVAL)] sample_interval: Duration,
		#[builder(default)] plane: ProjectionPlane,
		#[builder(default)] reacquire: Reacquire,
	) -> Result<Self, ConfigError> {
		Self {
			min_draw_distance,
			max_point_delta,
			close_threshold,
			line_width,
			reuse_tolerance,
			segment_point_limit,
			erase_delay,
			sample_interval,
			plane,
			reacquire,
		}
		.validated()
	}
}

impl DrawConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		serde_json::from_str::<Self>(json)?.validated()
	}

	/// Rejects configurations that would silently degrade sampling or closure.
	pub fn validated(self) -> Result<Self, ConfigError> {
		for (field, value) in [
			("min_draw_distance", self.min_draw_distance),
			("max_point_delta", self.max_point_delta),
			("close_threshold", self.close_threshold),
			("line_width", self.line_width),
			("reuse_tolerance", self.reuse_tolerance),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(ConfigError::InvalidDistance { field, value });
			}
		}
		if self.close_threshold <= 0.0 {
			return Err(ConfigError::NonPositiveCloseThreshold(self.close_threshold));
		}
		// A zero delta disables the jump filter instead.
		if self.max_point_delta > 0.0 && self.max_point_delta < self.min_draw_distance {
			return Err(ConfigError::DeltaBelowDrawDistance {
				max_point_delta: self.max_point_delta,
				min_draw_distance: self.min_draw_distance,
			});
		}
		if self.segment_point_limit < 2 {
			return Err(ConfigError::SegmentPointLimit(self.segment_point_limit));
		}
		Ok(self)
	}

	pub fn min_draw_distance(&self) -> f32 {
		self.min_draw_distance
	}

	pub fn max_point_delta(&self) -> f32 {
		self.max_point_delta
	}

	pub fn close_threshold(&self) -> f32 {
		self.close_threshold
	}

	pub fn line_width(&self) -> f32 {
		self.line_width
	}

	pub fn reuse_tolerance(&self) -> f32 {
		self.reuse_tolerance
	}

	pub fn segment_point_limit(&self) -> usize {
		self.segment_point_limit
	}

	pub fn erase_delay(&self) -> Duration {
		self.erase_delay
	}

	pub fn sample_interval(&self) -> Duration {
		self.sample_interval
	}

	pub fn plane(&self) -> ProjectionPlane {
		self.plane
	}

	pub fn reacquire(&self) -> Reacquire {
		self.reacquire
	}
}

/// Durations as fractional seconds.
pub(crate) mod seconds {
	use serde::{Deserialize, Deserializer, Serializer};
	use std::time::Duration;

	pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_f64(duration.as_secs_f64())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		let secs = f64::deserialize(deserializer)?;
		Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
	}
}
