//! Headless pre-labelling entry point.
//!
//! Loads a batch of images, optionally runs the stub predictor on each one,
//! and writes the per-image and COCO exports into an output folder.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Pre-label UI screenshots and export their annotations.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "uiat")]
#[command(version, about)]
struct Args {
    /// Image files or folders (folders are scanned non-recursively).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output folder for the exported files.
    #[arg(long, default_value = uiat::constants::DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// Configuration file (defaults to the per-user config).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the stub predictor on every image before exporting.
    #[arg(long)]
    predict: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logger(level: uiat::config::LogLevel) {
    let mut builder = env_logger::Builder::new();

    // RUST_LOG wins over the configured level
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        builder.filter_level(level.to_level_filter());
    }
    builder.init();
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(args: &Args) -> Result<uiat::AppConfig, Box<dyn std::error::Error>> {
    Ok(match &args.config {
        Some(path) => uiat::AppConfig::load(path)?,
        None => uiat::AppConfig::load_or_default(),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args, config: uiat::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    use uiat::format::DirectorySink;
    use uiat::state::Direction;
    use uiat::{Message, Session};

    let images = uiat::data::load_paths(&args.inputs)?;
    let mut session = Session::new(config);
    session.load(images);

    if args.predict {
        // No simulated latency for batch runs
        let mut rng = rand::rng();
        for index in 0..session.images().len() {
            if index > 0 {
                session.update(Message::Navigate(Direction::Next))?;
            }
            session.predict_with(&mut rng)?;
        }
    }

    let mut sink = DirectorySink::new(&args.out);

    let documents = session.deliver_all(&mut sink)?;
    let coco = session.deliver_coco(&mut sink)?;
    log::info!(
        "Wrote {} annotation files and {} into {:?} ({} boxes)",
        documents.delivered.len(),
        session.config().export.coco_file_name,
        args.out,
        coco.annotations
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let result = load_config(&args).and_then(|config| {
        init_logger(config.preferences.log_level);
        run(&args, config)
    });

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

// The library is embedded by a host page on WASM; there is no CLI
#[cfg(target_arch = "wasm32")]
fn main() {}
