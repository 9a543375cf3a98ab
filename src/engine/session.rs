use std::{
	collections::HashMap,
	fmt::Debug,
	hash::Hash,
	time::{Duration, Instant},
};

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::{Contact, EnclosureReport, Sample, Stroke, StrokeSampler, TargetSet, Trace};
use crate::{
	config::DrawConfig,
	util::{ListenerId, Listeners},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrokeResult {
	pub closed: bool,
	pub points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EraseReason {
	/// The stroke did not close and its grace period ran out.
	#[display("expired")]
	Expired,
	/// The host collected the enclosure results.
	#[display("cleared")]
	Cleared,
	/// The host discarded the stroke.
	#[display("discarded")]
	Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
	StrokeBegan,
	PointAccepted { position: Vec3, new_segment: bool },
	StrokeEnded(StrokeResult),
	StrokeDiscarded,
	TraceErased(EraseReason),
}

/// The trace of an ended stroke.
#[derive(Debug)]
struct FinishedTrace {
	generation: u64,
	/// `None` keeps the trace until it is cleared or discarded.
	deadline: Option<Instant>,
	trace: Trace,
}

/// Drives one drawing tool: sampling while the trigger is held, closure and
/// enclosure once it is released, and cleanup of the traces left behind.
///
/// Every call happens on the thread that owns the session. Evaluation borrows
/// the session immutably, so it can never overlap with [`DrawingSession::submit`].
#[derive(Debug)]
pub struct DrawingSession {
	config: DrawConfig,
	sampler: StrokeSampler,
	stroke: Stroke,
	generation: u64,
	drawing: bool,
	trace: Option<Trace>,
	finished: Vec<FinishedTrace>,
	listeners: Listeners<SessionEvent>,
}

impl Default for DrawingSession {
	fn default() -> Self {
		Self::new(DrawConfig::default())
	}
}

impl DrawingSession {
	pub fn new(config: DrawConfig) -> Self {
		Self {
			sampler: StrokeSampler::from_config(&config),
			stroke: Stroke::new(config.close_threshold()).with_plane(config.plane()),
			generation: 0,
			drawing: false,
			trace: None,
			finished: Vec::new(),
			listeners: Listeners::default(),
			config,
		}
	}

	pub fn config(&self) -> &DrawConfig {
		&self.config
	}

	pub fn stroke(&self) -> &Stroke {
		&self.stroke
	}

	pub fn is_drawing(&self) -> bool {
		self.drawing
	}

	pub fn subscribe(&mut self, f: impl FnMut(&SessionEvent) + 'static) -> ListenerId {
		self.listeners.subscribe(f)
	}

	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		self.listeners.unsubscribe(id)
	}

	/// Starts a new stroke, abandoning one that is still being drawn.
	pub fn begin_stroke(&mut self) {
		if self.drawing {
			self.abandon();
		}
		self.stroke.reset();
		self.sampler.begin();
		self.generation += 1;
		self.drawing = true;
		self.trace = Some(Trace::new(&self.config));
		tracing::debug!(generation = self.generation, "stroke began");
		self.listeners.emit(&SessionEvent::StrokeBegan);
	}

	/// Feeds one sampling tick. `None` means the probe is not touching a surface.
	pub fn submit(&mut self, contact: Option<Contact>) -> Sample {
		if !self.drawing {
			return Sample::Rejected(super::Rejection::Idle);
		}
		let sample = self.sampler.sample(contact.as_ref());
		if let (
			Sample::Accepted {
				position,
				new_segment,
			},
			Some(contact),
		) = (sample, contact)
		{
			self.stroke.add_point(position);
			if let Some(trace) = &mut self.trace {
				trace.record(position, contact.orientation, contact.intensity, new_segment);
			}
			self.listeners.emit(&SessionEvent::PointAccepted {
				position,
				new_segment,
			});
		}
		sample
	}

	/// Seals the stroke and reports whether it closed.
	///
	/// The trace of a closed stroke is kept until the enclosure results are
	/// collected; an unclosed one is erased once `now + erase_delay` passes.
	pub fn end_stroke(&mut self, now: Instant) -> StrokeResult {
		if !self.drawing {
			return self.result();
		}
		self.drawing = false;
		self.stroke.seal();
		let result = self.result();
		tracing::info!(closed = result.closed, points = result.points, "stroke ended");

		if let Some(trace) = self.trace.take().filter(|t| !t.is_empty()) {
			let deadline = if result.closed {
				None
			} else {
				let erase_delay = self.config.erase_delay();
				let deadline = now.checked_add(erase_delay);
				if deadline.is_none() {
					tracing::warn!(?erase_delay, "erase delay out of range, keeping trace");
				}
				deadline
			};
			self.finished.push(FinishedTrace {
				generation: self.generation,
				deadline,
				trace,
			});
		}
		self.listeners.emit(&SessionEvent::StrokeEnded(result));
		result
	}

	fn result(&self) -> StrokeResult {
		StrokeResult {
			closed: self.stroke.is_sealed() && self.stroke.is_closed(),
			points: self.stroke.len(),
		}
	}

	/// Tests each `(id, point)` against the sealed stroke.
	///
	/// Every target maps to `false` while the stroke is still being drawn or when
	/// it did not close.
	pub fn evaluate_targets<K, I>(&self, targets: I) -> HashMap<K, bool>
	where
		K: Eq + Hash,
		I: IntoIterator<Item = (K, Vec2)>,
	{
		let sealed = self.stroke.is_sealed();
		if !sealed {
			tracing::debug!("evaluating targets against an unsealed stroke");
		}
		let view = self.stroke.view();
		targets
			.into_iter()
			.map(|(id, point)| (id, sealed && view.contains_point(point)))
			.collect()
	}

	/// Updates the enclosure flag of every target from the sealed stroke, returning
	/// how many are enclosed.
	///
	/// Flags are left untouched unless the stroke is sealed and closed.
	pub fn enclose<K: PartialEq + Debug>(&self, targets: &mut TargetSet<K>) -> usize {
		if !self.result().closed {
			return 0;
		}
		let plane = self.config.plane();
		let view = self.stroke.view();
		let mut count = 0;
		for target in targets.iter_mut() {
			let enclosed = view.contains_point(plane.project(target.position));
			if enclosed {
				tracing::info!(id = ?target.id, "target enclosed");
				count += 1;
			}
			target.set_enclosed(enclosed);
		}
		count
	}

	/// Reports the enclosed targets and erases every finished trace.
	pub fn take_enclosure_report<K: Clone + PartialEq + Debug>(
		&mut self,
		targets: &TargetSet<K>,
	) -> EnclosureReport<K> {
		let report = targets.report();
		tracing::info!(enclosed = ?report.enclosed, "enclosure report");
		self.clear_traces();
		if self.stroke.is_sealed() {
			self.stroke.reset();
		}
		report
	}

	/// Drops the current stroke's points and its trace, closed or not.
	pub fn discard_stroke(&mut self) {
		if self.drawing {
			self.abandon();
		} else {
			let had_points = !self.stroke.is_empty();
			let before = self.finished.len();
			self.finished.retain(|f| f.generation != self.generation);
			let erased = self.finished.len() != before;
			if erased {
				self
					.listeners
					.emit(&SessionEvent::TraceErased(EraseReason::Discarded));
			}
			if had_points || erased {
				tracing::debug!(generation = self.generation, "stroke discarded");
				self.listeners.emit(&SessionEvent::StrokeDiscarded);
			}
		}
		self.stroke.reset();
		self.sampler.begin();
	}

	fn abandon(&mut self) {
		self.drawing = false;
		if self.trace.take().is_some_and(|t| !t.is_empty()) {
			self
				.listeners
				.emit(&SessionEvent::TraceErased(EraseReason::Discarded));
		}
		tracing::debug!(generation = self.generation, "stroke discarded");
		self.listeners.emit(&SessionEvent::StrokeDiscarded);
	}

	/// Erases unclosed traces whose grace period ended at or before `now`.
	pub fn collect_expired(&mut self, now: Instant) -> usize {
		let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.finished)
			.into_iter()
			.partition(|f| f.deadline.is_some_and(|deadline| deadline <= now));
		self.finished = kept;
		for erased in &expired {
			if erased.generation == self.generation && self.stroke.is_sealed() {
				self.stroke.reset();
			}
			tracing::debug!(generation = erased.generation, "unclosed trace erased");
			self
				.listeners
				.emit(&SessionEvent::TraceErased(EraseReason::Expired));
		}
		expired.len()
	}

	/// How long until the next unclosed trace expires.
	pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
		self
			.finished
			.iter()
			.filter_map(|f| f.deadline)
			.map(|deadline| deadline.saturating_duration_since(now))
			.min()
	}

	pub fn clear_traces(&mut self) {
		let count = self.finished.len();
		self.finished.clear();
		for _ in 0..count {
			self
				.listeners
				.emit(&SessionEvent::TraceErased(EraseReason::Cleared));
		}
	}

	/// Every trace still visible: the one being drawn, then those of ended
	/// strokes that were not yet collected, expired or discarded.
	pub fn traces(&self) -> impl Iterator<Item = &Trace> {
		self
			.trace
			.iter()
			.chain(self.finished.iter().map(|f| &f.trace))
	}
}
