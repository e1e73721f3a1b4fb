use clap::{Parser, Subcommand};
use sticker_slicer::archive;
use sticker_slicer::config::{self, SlicerConfig};
use sticker_slicer::export::{self, ExportError, ExportRequest};
use sticker_slicer::i18n::{Language, Messages};
use sticker_slicer::imaging::map_slices;
use sticker_slicer::output;
use sticker_slicer::types::{GridConfig, GridPreset, PanOffset, ViewportMetrics};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sticker-slicer")]
#[command(about = "Slice a sticker sheet into a grid of PNG tiles, packed as a zip")]
#[command(long_about = "\
Slice a sticker sheet into a grid of PNG tiles, packed as a zip

The sheet (PNG, JPEG or WebP) is cut into rows x cols equal tiles, numbered
row by row from 1, and written as <name>_sliced.zip:

  sheet_sliced.zip
  └── stickers/
      ├── sticker_01.png
      ├── sticker_02.png
      └── ...

Pan flags shift the grid over the sheet the way dragging the preview would.
Offsets are in display pixels, so they need --display-width/--display-height
to be scaled to the sheet's native size. Areas dragged off the sheet come out
transparent.

Settings are read from slicer.toml in --config-dir when present. Command-line
flags win over the file. Run 'sticker-slicer gen-config' for a documented one.

Set RUST_LOG=debug to trace every tile.")]
#[command(version)]
struct Cli {
    /// Directory holding slicer.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Message language (overrides config)
    #[arg(long, value_enum, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Command,
}

/// Grid and framing flags shared by `slice` and `plan`.
#[derive(clap::Args, Clone)]
struct SliceArgs {
    /// Sticker sheet to slice
    input: PathBuf,

    /// Grid preset (overridden by --rows/--cols)
    #[arg(long, value_enum)]
    preset: Option<GridPreset>,

    /// Number of rows, 1-20
    #[arg(long)]
    rows: Option<u32>,

    /// Number of columns, 1-20
    #[arg(long)]
    cols: Option<u32>,

    /// Horizontal pan in display pixels (positive = right)
    #[arg(long, allow_hyphen_values = true, requires = "display_width")]
    pan_x: Option<f64>,

    /// Vertical pan in display pixels (positive = down)
    #[arg(long, allow_hyphen_values = true, requires = "display_width")]
    pan_y: Option<f64>,

    /// Width the sheet was displayed at when framing the pan
    #[arg(long, requires = "display_height")]
    display_width: Option<f64>,

    /// Height the sheet was displayed at when framing the pan
    #[arg(long, requires = "display_width")]
    display_height: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Slice a sheet and write <name>_sliced.zip
    Slice {
        #[command(flatten)]
        args: SliceArgs,

        /// Directory the archive is written to
        #[arg(long = "output", short = 'o', default_value = ".")]
        output_dir: PathBuf,
    },
    /// Show the tile rectangles and names without writing anything
    Plan {
        #[command(flatten)]
        args: SliceArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock slicer.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Slice { args, output_dir } => {
            let (config, messages) = load_settings(&cli.config_dir, cli.lang)?;
            let options = config.archive_options();
            let bytes = std::fs::read(&args.input)?;
            let filename = input_filename(&args.input);
            let request = build_request(&args, &config, &filename, &bytes)?;
            log::info!(
                "slicing {} into {}x{}",
                filename,
                request.grid.rows(),
                request.grid.cols()
            );

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", output::format_progress_event(&event, messages));
                }
            });
            let result = export::export(&bytes, &request, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            match result {
                Ok(archive) => {
                    let path = archive::deliver(&archive, &output_dir)?;
                    output::print_export_summary(&archive, &path, messages);
                }
                Err(err) => {
                    log::debug!("export failed: {err:?}");
                    for line in output::format_failure(&err, messages) {
                        eprintln!("{}", line);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Plan { args, json } => {
            let (config, messages) = load_settings(&cli.config_dir, cli.lang)?;
            let options = config.archive_options();
            let bytes = std::fs::read(&args.input)?;
            let filename = input_filename(&args.input);
            let request = build_request(&args, &config, &filename, &bytes)?;
            let metrics = match request.viewport {
                Some(v) if !v.is_valid() => return Err(ExportError::InvalidViewport(v).into()),
                Some(v) => v,
                None => {
                    let (width, height) = sheet_dimensions(&bytes)?;
                    ViewportMetrics::unscaled(width, height)
                }
            };
            if let Some(pan) = request.pan.filter(|p| !p.is_finite()) {
                return Err(ExportError::InvalidPan(pan).into());
            }
            let rects = map_slices(request.grid, &metrics, request.pan);
            if json {
                println!("{}", output::format_plan_json(request.grid, &rects, &options)?);
            } else {
                output::print_plan(request.grid, &rects, &options, messages);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `slicer.toml` and pick the message language (CLI flag over config).
fn load_settings(
    config_dir: &Path,
    lang: Option<Language>,
) -> Result<(SlicerConfig, &'static Messages), config::ConfigError> {
    let config = config::load_config(config_dir)?;
    let messages = lang.unwrap_or(config.language).messages();
    Ok((config, messages))
}

/// Resolve grid and framing: CLI flags over preset over config.
fn build_request<'a>(
    args: &SliceArgs,
    config: &SlicerConfig,
    filename: &'a str,
    bytes: &[u8],
) -> Result<ExportRequest<'a>, Box<dyn std::error::Error>> {
    let base = args.preset.map(GridConfig::from).unwrap_or_else(|| config.grid());
    let grid = GridConfig::new(
        args.rows.unwrap_or(base.rows()),
        args.cols.unwrap_or(base.cols()),
    );

    let pan = match (args.pan_x, args.pan_y) {
        (None, None) => None,
        (x, y) => Some(PanOffset::new(x.unwrap_or(0.0), y.unwrap_or(0.0))),
    };

    let viewport = match (args.display_width, args.display_height) {
        (Some(display_width), Some(display_height)) => {
            let (width, height) = sheet_dimensions(bytes)?;
            Some(ViewportMetrics {
                natural_width: width as f64,
                natural_height: height as f64,
                display_width,
                display_height,
            })
        }
        _ => None,
    };

    Ok(ExportRequest {
        pan,
        viewport,
        ..ExportRequest::new(filename, grid)
    })
}

/// Read the sheet's native size from its header without decoding pixels.
fn sheet_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
}

fn input_filename(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
