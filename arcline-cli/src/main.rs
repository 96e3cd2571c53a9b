//! arcline — lay out text along an arc from a JSON config.
//!
//! ```text
//! arcline <config.json> [--instances]
//! ```
//!
//! Prints the computed frame (placements, line metrics, debug overlay)
//! as pretty JSON on stdout. With `--instances` the GPU instance records
//! are printed instead. Set `RUST_LOG=debug` for shaping and cache logs.

use std::process::ExitCode;

use log::{error, info};

use arcline_core::ArcTextConfig;
use arcline_text::{ArcTextFrame, ArcTextView, GlyphInstance, TextEngine};

const USAGE: &str = "usage: arcline <config.json> [--instances]";

/// Parsed command line.
struct Args {
    config_path: String,
    instances: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Option<Self> {
        let mut config_path = None;
        let mut instances = false;
        for arg in args {
            match arg.as_str() {
                "--instances" => instances = true,
                "-h" | "--help" => return None,
                _ if config_path.is_none() => config_path = Some(arg),
                _ => return None,
            }
        }
        Some(Self {
            config_path: config_path?,
            instances,
        })
    }
}

fn frame_json(frame: &ArcTextFrame) -> serde_json::Value {
    serde_json::json!({
        "placements": frame.placements.as_ref(),
        "line": frame.line,
        "color": frame.color,
        "overlay": frame.overlay,
        "ink_bounds": frame.ink_bounds.as_ref(),
    })
}

fn instances_json(frame: &ArcTextFrame) -> serde_json::Value {
    let instances: Vec<serde_json::Value> = GlyphInstance::from_frame(frame)
        .iter()
        .map(|i| {
            serde_json::json!({
                "position": i.position,
                "rotation": i.rotation,
                "advance": i.advance,
                "color": i.color,
            })
        })
        .collect();
    serde_json::Value::Array(instances)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ArcTextConfig::load(&args.config_path)?;
    info!(
        "Laying out {} chars on radius {} over {}°",
        config.text.chars().count(),
        config.radius,
        config.effective_arc_size()
    );

    let mut engine = TextEngine::new();
    if !engine.has_fonts() {
        log::warn!("No system fonts found; output will be empty");
    }
    let mut view = ArcTextView::new(config);
    let frame = view.frame(&mut engine)?;

    let output = if args.instances {
        instances_json(&frame)
    } else {
        frame_json(&frame)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(args) = Args::parse(std::env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("arcline: {e}");
            ExitCode::FAILURE
        }
    }
}
