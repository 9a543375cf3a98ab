//! Recorded gestures that can be played back through a [`DrawingSession`].

use std::time::{Duration, Instant};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
	config::{ConfigError, DrawConfig},
	engine::{Contact, DrawingSession, EnclosureReport, StrokeResult, TargetSet},
};

#[derive(Debug, Error)]
pub enum ReplayError {
	#[error("invalid recording")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTarget {
	pub name: String,
	pub position: Vec3,
}

/// One gesture: a contact (or `null` for no contact) per sampling tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recording {
	#[serde(default)]
	pub config: DrawConfig,
	pub ticks: Vec<Option<Contact>>,
	#[serde(default)]
	pub targets: Vec<RecordedTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayOutcome {
	pub result: StrokeResult,
	pub accepted: usize,
	/// Gesture length at one tick per `sample_interval`.
	#[serde(serialize_with = "crate::config::seconds::serialize")]
	pub duration: Duration,
	pub report: EnclosureReport<String>,
}

impl Recording {
	pub fn from_json(json: &str) -> Result<Self, ReplayError> {
		let mut recording: Self = serde_json::from_str(json)?;
		recording.config = recording.config.validated()?;
		Ok(recording)
	}

	/// Draws the whole gesture, releases the trigger and evaluates every target.
	pub fn replay(&self) -> ReplayOutcome {
		let mut session = DrawingSession::new(self.config.clone());
		let mut targets = TargetSet::new();
		for target in &self.targets {
			targets.insert(target.name.clone(), target.position);
		}

		let start = Instant::now();
		let mut now = start;
		let mut accepted = 0;
		session.begin_stroke();
		for contact in &self.ticks {
			if session.submit(*contact).is_accepted() {
				accepted += 1;
			}
			now = now.checked_add(self.config.sample_interval()).unwrap_or(now);
		}
		let result = session.end_stroke(now);
		session.enclose(&mut targets);
		let report = session.take_enclosure_report(&targets);
		let duration = now.saturating_duration_since(start);
		tracing::debug!(ticks = self.ticks.len(), accepted, ?duration, "replayed recording");

		ReplayOutcome {
			result,
			accepted,
			duration,
			report,
		}
	}
}
