use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use enclose::{replay::Recording, ResultExt};

/// Replays a recorded drawing gesture and reports what it enclosed.
#[derive(Parser, Debug)]
#[command(name = "enclose")]
#[command(version, about, long_about = None)]
struct Cli {
	/// Recording in JSON: `{ "config": {..}, "ticks": [..], "targets": [..] }`
	recording: PathBuf,

	/// Print the outcome as JSON
	#[arg(long)]
	json: bool,

	/// Logging verbosity level
	#[arg(short, long, default_value = "info")]
	log_level: tracing::Level,
}

fn configure_tracing(max_level: tracing::Level) -> anyhow::Result<()> {
	tracing::subscriber::set_global_default(
		tracing_subscriber::FmtSubscriber::builder()
			.with_max_level(max_level)
			.with_writer(std::io::stderr)
			.finish(),
	)?;
	Ok(())
}

fn configure_logging(max_level: tracing::Level) -> anyhow::Result<()> {
	configure_tracing(max_level)?;

	// Redirect `log` to `tracing`.
	#[cfg(feature = "log")]
	tracing_log::LogTracer::init()?;
	Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
	let json = std::fs::read_to_string(&cli.recording)
		.with_context(|| format!("reading {}", cli.recording.display()))?;
	let recording = Recording::from_json(&json)
		.with_context(|| format!("parsing {}", cli.recording.display()))?;

	let outcome = recording.replay();
	if cli.json {
		println!("{}", serde_json::to_string_pretty(&outcome)?);
	} else {
		println!(
			"{} after {} of {} samples ({} points, {:.2}s)",
			if outcome.result.closed { "closed" } else { "not closed" },
			outcome.accepted,
			recording.ticks.len(),
			outcome.result.points,
			outcome.duration.as_secs_f32(),
		);
		println!("enclosed: {}", outcome.report);
	}
	Ok(())
}

fn main() -> std::process::ExitCode {
	let cli = Cli::parse();

	// We can continue without logging.
	configure_logging(cli.log_level).ok_or_log();

	match run(&cli) {
		Ok(()) => std::process::ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!("{error:#}");
			std::process::ExitCode::FAILURE
		}
	}
}
