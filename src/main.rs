use clap::{Parser, Subcommand};
use pixel_lens::config::{self, RecognitionEngine};
use pixel_lens::imaging::{self, EnhancementSettings, ImageBackend, Quality, RustBackend};
use pixel_lens::overlay::{ImageSurface, OverlayView};
use pixel_lens::{logging, output, recognize};
use std::path::PathBuf;

/// Flags shared by the commands that run text recognition.
#[derive(clap::Args, Clone)]
struct RecognitionArgs {
    /// Recognition engine (overrides config)
    #[arg(long, value_enum)]
    engine: Option<RecognitionEngine>,

    /// Print JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

impl RecognitionArgs {
    /// Recognition settings from config, with `--engine` applied on top.
    fn resolve(&self, app_config: config::AppConfig) -> config::RecognitionConfig {
        let mut rec = app_config.recognition;
        if let Some(engine) = self.engine {
            rec.engine = engine;
        }
        rec
    }
}

#[derive(Parser)]
#[command(name = "pixel-lens")]
#[command(about = "Enhance images, extract text, and map text overlays to display size")]
#[command(long_about = "\
Enhance images, extract text, and map text overlays to display size

Enhancement applies brightness, then contrast, then saturation to every
pixel. Alpha is left untouched. Settings are nominally -100..100.

Text extraction runs a recognizer (tesseract, or a sidecar .txt file) and
lays the words out as approximate boxes in image pixels. The overlay
command rescales those boxes to one or more display sizes, the way a
viewer would when the image loads and the window resizes.

Run 'pixel-lens gen-config' to generate a documented pixel-lens.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log codec and recognizer activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Adjust brightness, contrast and saturation
    Enhance {
        #[arg(value_name = "INPUT")]
        source: PathBuf,
        #[arg(value_name = "OUTPUT")]
        target: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        contrast: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        saturation: Option<i32>,
    },
    /// Apply the one-click preset (brightness 40, contrast 20, saturation 10)
    QuickEnhance {
        #[arg(value_name = "INPUT")]
        source: PathBuf,
        #[arg(value_name = "OUTPUT")]
        target: PathBuf,
    },
    /// Recognize text and print synthetic word boxes
    Ocr {
        #[arg(value_name = "INPUT")]
        source: PathBuf,
        #[command(flatten)]
        recognition: RecognitionArgs,
    },
    /// Recognize text and map its boxes to display sizes
    Overlay {
        #[arg(value_name = "INPUT")]
        source: PathBuf,
        /// Displayed size as WxH; repeat to simulate resizes (last one wins)
        #[arg(long, required = true, value_parser = parse_display)]
        display: Vec<(f64, f64)>,
        #[command(flatten)]
        recognition: RecognitionArgs,
    },
    /// Print a stock pixel-lens.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let load_config = || config::load_config(&cli.config);
    let backend = RustBackend::new();

    match cli.command {
        Command::Enhance {
            source,
            target,
            brightness,
            contrast,
            saturation,
        } => {
            let app_config = load_config()?;
            let defaults = app_config.enhance;
            let settings = EnhancementSettings::new(
                brightness.unwrap_or(defaults.brightness),
                contrast.unwrap_or(defaults.contrast),
                saturation.unwrap_or(defaults.saturation),
            );
            let quality = Quality::new(app_config.output.quality);
            let report = imaging::enhance_file(&backend, &source, &target, settings, quality)?;
            output::print_enhance_report(&report);
        }
        Command::QuickEnhance { source, target } => {
            let quality = Quality::new(load_config()?.output.quality);
            let report = imaging::quick_enhance_file(&backend, &source, &target, quality)?;
            output::print_enhance_report(&report);
        }
        Command::Ocr {
            source,
            recognition,
        } => {
            let recognizer = recognize::from_config(&recognition.resolve(load_config()?));
            let layout = recognize::extract_text(recognizer.as_ref(), &backend, &source)?;
            if recognition.json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                output::print_text_layout(&layout);
            }
        }
        Command::Overlay {
            source,
            display,
            recognition,
        } => {
            let recognizer = recognize::from_config(&recognition.resolve(load_config()?));
            let natural = backend.identify(&source)?;
            let layout = recognize::layout_text(recognizer.as_ref(), &source, natural)?;

            let (first, resizes) = display
                .split_first()
                .ok_or("at least one --display size is required")?;
            let mut surface = ImageSurface::new(*first);
            let view = OverlayView::attach(&mut surface, layout.text_blocks);
            surface.load(natural.width, natural.height);
            for &(w, h) in resizes {
                surface.resize(w, h);
            }

            let dims = surface
                .dimensions()
                .ok_or("image has a zero natural size")?;
            let overlays = view.detach(&mut surface);

            if recognition.json {
                let doc = serde_json::json!({
                    "dimensions": dims,
                    "overlays": overlays,
                    "full_text": layout.full_text,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                output::print_overlays(&dims, &overlays);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Parse a `WxH` display size, e.g. `800x600` or `640.5x480`.
fn parse_display(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| format!("invalid display dimension '{v}' in '{s}'"))
    };
    Ok((parse(w)?, parse(h)?))
}
