use std::time::{Duration, Instant};

use enclose::{
	config::{ConfigError, DrawConfig},
	engine::{Contact, DrawingSession, Rejection, Sample, Stroke, TargetSet},
	geom::ProjectionPlane,
	replay::Recording,
};
use glam::{vec2, vec3, Vec3};

fn stroke(points: &[Vec3], close_threshold: f32) -> Stroke {
	let mut stroke = Stroke::new(close_threshold);
	for &p in points {
		stroke.add_point(p);
	}
	stroke.seal();
	stroke
}

fn square() -> [Vec3; 5] {
	[
		vec3(0.0, 0.0, 0.0),
		vec3(1.0, 0.0, 0.0),
		vec3(1.0, 1.0, 0.0),
		vec3(0.0, 1.0, 0.0),
		vec3(0.0, 0.0, 0.0),
	]
}

#[test]
fn unit_square_is_closed_and_contains_center() {
	let stroke = stroke(&square(), 0.0);
	assert!(stroke.is_closed());
	assert!(stroke.contains_point(vec2(0.5, 0.5)));
	assert!(!stroke.contains_point(vec2(2.0, 2.0)));
}

#[test]
fn closure_threshold_is_inclusive() {
	let points = [Vec3::ZERO, vec3(1.0, 0.0, 0.0), vec3(0.5, 0.0, 0.0)];
	assert!(stroke(&points, 0.5).is_closed());
	assert!(!stroke(&points, 0.25).is_closed());
	assert!(!stroke(&[Vec3::ZERO], 10.0).is_closed());
}

#[test]
fn short_strokes_contain_nothing() {
	let stroke = stroke(&[Vec3::ZERO, vec3(1.0, 1.0, 0.0)], 10.0);
	assert!(stroke.is_closed());
	assert!(!stroke.contains_point(vec2(0.5, 0.5)));
}

#[test]
fn edges_follow_half_open_rule() {
	let stroke = stroke(&square(), 0.0);
	assert!(stroke.contains_point(vec2(0.0, 0.5)));
	assert!(stroke.contains_point(vec2(0.5, 0.0)));
	assert!(!stroke.contains_point(vec2(1.0, 0.5)));
	assert!(!stroke.contains_point(vec2(0.5, 1.0)));
}

#[test]
fn sampler_filters_noise_and_sub_threshold_moves() {
	let mut session = DrawingSession::new(
		DrawConfig::builder()
			.min_draw_distance(0.1)
			.max_point_delta(1.0)
			.build()
			.unwrap(),
	);
	session.begin_stroke();
	let mut x = 0.0;
	let mut accepted = vec![session.submit(Some(Contact::new(Vec3::ZERO))).is_accepted()];
	for step in [0.05, 0.15, 5.0, 0.2] {
		let sample = session.submit(Some(Contact::new(vec3(x + step, 0.0, 0.0))));
		if sample.is_accepted() {
			x += step;
		}
		accepted.push(sample.is_accepted());
	}
	assert_eq!(accepted, [true, false, true, false, true]);
	assert_eq!(session.stroke().len(), 3);
}

#[test]
fn evaluation_is_sequenced_after_drawing() {
	let mut session = DrawingSession::default();
	session.begin_stroke();
	for p in [
		vec3(0.0, 0.0, 0.0),
		vec3(0.05, 0.0, 0.0),
		vec3(0.1, 0.0, 0.0),
		vec3(0.1, 0.05, 0.0),
		vec3(0.1, 0.1, 0.0),
		vec3(0.05, 0.1, 0.0),
		vec3(0.0, 0.1, 0.0),
		vec3(0.0, 0.05, 0.0),
		vec3(0.0, 0.01, 0.0),
	] {
		session.submit(Some(Contact::new(p)));
	}
	let target = [("beaker", vec2(0.05, 0.05))];
	assert_eq!(session.evaluate_targets(target)["beaker"], false);

	assert!(session.end_stroke(Instant::now()).closed);
	assert_eq!(session.evaluate_targets(target)["beaker"], true);
	assert_eq!(
		session.submit(Some(Contact::new(Vec3::ZERO))),
		Sample::Rejected(Rejection::Idle)
	);
}

#[test]
fn targets_project_onto_configured_plane() {
	let mut session = DrawingSession::new(
		DrawConfig::builder()
			.min_draw_distance(0.1)
			.max_point_delta(1.0)
			.plane(ProjectionPlane::Xz)
			.build()
			.unwrap(),
	);
	let mut targets = TargetSet::new();
	targets.insert(1, vec3(0.5, 7.0, 0.5));
	targets.insert(2, vec3(0.5, 0.5, 7.0));

	session.begin_stroke();
	for p in [
		vec3(0.0, 0.0, 0.0),
		vec3(0.5, 0.0, 0.0),
		vec3(1.0, 0.0, 0.0),
		vec3(1.0, 0.0, 0.5),
		vec3(1.0, 0.0, 1.0),
		vec3(0.5, 0.0, 1.0),
		vec3(0.0, 0.0, 1.0),
		vec3(0.0, 0.0, 0.5),
		vec3(0.0, 0.0, 0.0),
	] {
		session.submit(Some(Contact::new(p)));
	}
	assert!(session.end_stroke(Instant::now()).closed);
	assert_eq!(session.enclose(&mut targets), 1);
	assert_eq!(targets.report().enclosed, [1]);
}

#[test]
fn unclosed_trace_is_erased_after_delay() {
	let mut session = DrawingSession::default();
	let start = Instant::now();
	session.begin_stroke();
	for x in [0.0, 0.05, 0.1] {
		session.submit(Some(Contact::new(vec3(x, 0.0, 0.0))));
	}
	assert!(!session.end_stroke(start).closed);
	assert_eq!(session.collect_expired(start + Duration::from_millis(100)), 0);
	assert_eq!(session.collect_expired(start + Duration::from_secs(1)), 1);
	assert_eq!(session.traces().count(), 0);
}

#[test]
fn invalid_config_is_rejected() {
	assert!(matches!(
		DrawConfig::builder().close_threshold(0.0).build(),
		Err(ConfigError::NonPositiveCloseThreshold(_))
	));
	assert!(DrawConfig::from_json(r#"{ "unknown": 1 }"#).is_err());
}

#[test]
fn demo_recording_replays() {
	let recording = Recording::from_json(include_str!("../demos/square.json")).unwrap();
	let outcome = recording.replay();
	assert!(outcome.result.closed);
	assert_eq!(outcome.accepted, 17);
	assert_eq!(outcome.duration, Duration::from_millis(400));
	assert_eq!(outcome.report.to_string(), "flask, burette");
}
