//! toolfocus - focus check for tool-changer inspection cameras
//!
//! Fetches a snapshot, measures focus inside the alignment ring and writes
//! the annotated frame.
//! Run with: cargo run --bin toolfocus -- --width 588 --height 441

use anyhow::{anyhow, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use toolfocus::pipeline::{DEFAULT_R1, DEFAULT_R2};
use toolfocus::{
    AnnotatedFrame, DiagnosticRequest, FileSource, FramePipeline, ImageSource, Settings,
};

const USAGE: &str = "\
Usage: toolfocus --width <px> --height <px> [options]

Options:
  --r1 <px>            inner ring radius (default 50)
  --r2 <px>            outer ring radius (default 100)
  --file <path>        read the frame from a file instead of the camera
  --output <path>      annotated PNG path (default focus.png)
  --json               print the focus report as JSON
  --data-url           print the annotated image as a data: URL
  --repeat <n>         take n measurements (default 1)
  --interval-ms <ms>   pause between measurements (default 1000)
  --save-settings      persist the effective settings and exit

Environment:
  TOOLFOCUS_CAMERA_URL, TOOLFOCUS_FETCH_TIMEOUT_MS, TOOLFOCUS_FONT";

/// Value following `flag`, if present.
fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> anyhow::Result<Option<T>> {
    match arg_value(args, flag) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("invalid value for {}: {}", flag, value)),
        None => Ok(None),
    }
}

struct Options {
    request: DiagnosticRequest,
    output: PathBuf,
    json: bool,
    data_url: bool,
    repeat: u32,
    interval: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing (RUST_LOG=toolfocus=debug shows per-request details)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let settings = Settings::load().with_env_overrides();

    if args.iter().any(|arg| arg == "--save-settings") {
        let path = settings.save()?;
        println!("Settings saved to {}", path.display());
        return Ok(());
    }

    let width = parse_arg::<u32>(&args, "--width")?
        .ok_or_else(|| anyhow!("--width is required\n\n{}", USAGE))?;
    let height = parse_arg::<u32>(&args, "--height")?
        .ok_or_else(|| anyhow!("--height is required\n\n{}", USAGE))?;
    let r1 = parse_arg::<u32>(&args, "--r1")?.unwrap_or(DEFAULT_R1);
    let r2 = parse_arg::<u32>(&args, "--r2")?.unwrap_or(DEFAULT_R2);

    let options = Options {
        request: DiagnosticRequest::new(width, height).with_radii(r1, r2),
        output: arg_value(&args, "--output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("focus.png")),
        json: args.iter().any(|arg| arg == "--json"),
        data_url: args.iter().any(|arg| arg == "--data-url"),
        repeat: parse_arg::<u32>(&args, "--repeat")?.unwrap_or(1).max(1),
        interval: Duration::from_millis(parse_arg::<u64>(&args, "--interval-ms")?.unwrap_or(1000)),
    };
    options.request.validate()?;

    match arg_value(&args, "--file") {
        Some(path) => {
            let pipeline = FramePipeline::new(FileSource::new(path), settings.overlay()?);
            run(&pipeline, &options).await
        }
        None => {
            eprintln!("Camera: {}", settings.camera_url);
            let pipeline = settings.pipeline()?;
            run(&pipeline, &options).await
        }
    }
}

async fn run<S: ImageSource>(pipeline: &FramePipeline<S>, options: &Options) -> anyhow::Result<()> {
    for sample in 1..=options.repeat {
        let frame = pipeline.produce_diagnostic_image(&options.request).await?;
        report(&frame, options, sample)?;

        if sample < options.repeat {
            tokio::time::sleep(options.interval).await;
        }
    }
    Ok(())
}

fn report(frame: &AnnotatedFrame, options: &Options, sample: u32) -> anyhow::Result<()> {
    std::fs::write(&options.output, &frame.png)
        .with_context(|| format!("failed to write {}", options.output.display()))?;

    if options.json {
        println!("{}", serde_json::to_string(&frame.report)?);
    } else if options.repeat > 1 {
        println!("[{}/{}] var: {:.0}", sample, options.repeat, frame.score());
    } else {
        println!("var: {:.0}", frame.score());
    }

    if options.data_url {
        println!("{}", frame.to_data_url());
    }
    Ok(())
}
