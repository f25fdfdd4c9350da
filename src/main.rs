mod args;

use args::Args;

use std::fmt::Write;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use tracing_subscriber::EnvFilter;
use zenith_upscaler::{submit, Backend, Error, JobHandle, Pipeline, Progress, Settings};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{eta_precise}] [{wide_bar:.white/green}] {pos}/{len} {percent} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░-")
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "({:.0}%)", state.fraction() * 100.0);
        })
}

/// Mirrors job progress onto a terminal bar until the progress channel
/// disconnects.
fn follow(handle: &JobHandle) {
    let progress_bar = ProgressBar::new_spinner();
    let start_time = Instant::now();

    for event in handle.progress().iter() {
        match event {
            Progress::Started { kind } => progress_bar.set_message(format!("upscaling {}", kind)),
            Progress::Extracted { frames } => {
                progress_bar.set_style(progress_style());
                progress_bar.set_length(frames as u64);
                progress_bar.set_message(format!("[frames: {}]", frames));
            }
            Progress::Upscaled { frame, .. } => {
                progress_bar.set_position(frame as u64);
                let fps = frame as f64 / start_time.elapsed().as_secs_f64();
                progress_bar.set_message(format!("[fps: {:.1}]", fps));
            }
            Progress::Merging => progress_bar.set_message("merging"),
        }
    }
    progress_bar.finish_and_clear();
}

fn print_resolution(args: &Args, backend: &Backend, settings: &Settings) -> Result<(), Error> {
    let original = Pipeline::new(backend, settings).dimensions(&args.input)?;
    println!("Original resolution: {}", original);
    println!("Output resolution:   {}", original.scaled(args.scale));
    Ok(())
}

fn run(args: Args) -> Result<(), Error> {
    let settings = args.settings();
    args.validate(&settings)?;
    args.print_options();

    let backend = args.backend(&settings);
    if args.preview {
        return print_resolution(&args, &backend, &settings);
    }
    if args.reads_resolution_up_front() {
        if let Err(e) = print_resolution(&args, &backend, &settings) {
            tracing::warn!("Could not read the resolution of {}: {}", args.input.display(), e);
        }
    }

    let handle = submit(args.job(), backend, settings);
    follow(&handle);
    let result = handle.wait()?;
    println!("Output:     {}", result.output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {
            println!("Completed!");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
