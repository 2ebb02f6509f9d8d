use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use collage::doc::{self, CollageDocument, ExportScope};
use collage::engine::{EngineCore, EngineError};
use collage::layout::{Alignment, StitchDirection};
use collage::settings::{GridCount, GridDirection, LayoutScope, SettingUpdate, SettingsError};
use collage::viewport::{self, Point, Size};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("invalid document JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown layer: {0}")]
    UnknownLayer(Uuid),
    #[error("invalid setting: {0}")]
    Settings(#[from] SettingsError),
    #[error("engine rejected command: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Parser, Debug)]
#[command(name = "collage-cli", about = "Headless layout tool for collage documents")]
struct Cli {
    /// Document to read; `-` reads stdin.
    #[arg(long, short, env = "COLLAGE_INPUT", default_value = "-")]
    input: String,

    /// Where to write the resulting document; stdout when omitted.
    #[arg(long, short, env = "COLLAGE_OUTPUT")]
    output: Option<PathBuf>,

    /// Width of the virtual viewport the document is framed in, in pixels.
    #[arg(long, env = "COLLAGE_VIEWPORT_WIDTH", default_value_t = 1920.0)]
    viewport_width: f64,

    /// Height of the virtual viewport the document is framed in, in pixels.
    #[arg(long, env = "COLLAGE_VIEWPORT_HEIGHT", default_value_t = 1080.0)]
    viewport_height: f64,

    /// Restrict selection-scoped commands to these layer ids (repeatable).
    #[arg(long = "select", global = true)]
    select: Vec<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack layers into a grid centered on the content.
    Grid(GridArgs),
    /// Concatenate layers along one axis.
    Stitch(StitchArgs),
    /// Align the selected layers within the canvas page (origin to viewport size).
    Align {
        #[arg(value_enum)]
        alignment: AlignArg,
    },
    /// Print the export bounds and pixel scale.
    Bounds {
        /// Limit to one layer.
        #[arg(long)]
        layer: Option<Uuid>,
    },
    /// Print the viewport that frames every layer.
    Fit,
    /// Print every layer id.
    SelectAll,
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Row count; blank leaves the document's value.
    #[arg(long)]
    rows: Option<String>,
    /// Column count; blank leaves the document's value.
    #[arg(long)]
    cols: Option<String>,
    /// Derive the missing dimension from the layer count.
    #[arg(long)]
    auto: bool,
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,
    #[arg(long)]
    reverse: Option<bool>,
    #[arg(long)]
    gap: Option<u32>,
}

#[derive(Args, Debug)]
struct StitchArgs {
    #[arg(value_enum)]
    direction: AxisArg,
    #[arg(long)]
    gap: Option<u32>,
    /// Normalize widths (vertical) or heights (horizontal) before stitching.
    #[arg(long)]
    smart: Option<bool>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AxisArg {
    Vertical,
    Horizontal,
}

impl From<AxisArg> for StitchDirection {
    fn from(value: AxisArg) -> Self {
        match value {
            AxisArg::Vertical => Self::Vertical,
            AxisArg::Horizontal => Self::Horizontal,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DirectionArg {
    Rows,
    Columns,
}

impl From<DirectionArg> for GridDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Rows => Self::Horizontal,
            DirectionArg::Columns => Self::Vertical,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AlignArg {
    Left,
    CenterH,
    Right,
    Top,
    MiddleV,
    Bottom,
}

impl From<AlignArg> for Alignment {
    fn from(value: AlignArg) -> Self {
        match value {
            AlignArg::Left => Self::Left,
            AlignArg::CenterH => Self::CenterH,
            AlignArg::Right => Self::Right,
            AlignArg::Top => Self::Top,
            AlignArg::MiddleV => Self::MiddleV,
            AlignArg::Bottom => Self::Bottom,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let document = CollageDocument::from_json(&read_input(&cli.input)?)?;
    info!(layers = document.layers.len(), input = %cli.input, "loaded document");
    let size = Size::new(cli.viewport_width, cli.viewport_height);

    match cli.command {
        Command::Bounds { layer } => {
            if let Some(id) = layer {
                ensure_layer(&document, id)?;
            }
            let scope = layer.map_or(ExportScope::All, ExportScope::Layer);
            print_json(&json!({
                "bounds": doc::export_bounds(&document.layers, scope),
                "scale": doc::export_scale(&document.layers, scope),
            }))
        }
        Command::Fit => {
            let bounds = doc::export_bounds(&document.layers, ExportScope::All);
            print_json(&json!(viewport::fit_to_content(bounds, size)))
        }
        Command::SelectAll => {
            let ids: Vec<Uuid> = document.layers.iter().map(|l| l.id).collect();
            print_json(&json!(ids))
        }
        Command::Grid(args) => {
            let mut core = framed_core(document, size, &cli.select)?;
            apply_grid_args(&mut core, &args, !cli.select.is_empty())?;
            core.apply_grid()?;
            write_document(&core, cli.output.as_ref())
        }
        Command::Stitch(args) => {
            let mut core = framed_core(document, size, &cli.select)?;
            if !cli.select.is_empty() {
                core.update_setting(SettingUpdate::StitchScope(LayoutScope::Selected));
            }
            if let Some(gap) = args.gap {
                core.update_setting(SettingUpdate::StitchGap(gap));
            }
            if let Some(smart) = args.smart {
                core.update_setting(SettingUpdate::SmartStitch(smart));
            }
            core.apply_stitch(args.direction.into())?;
            write_document(&core, cli.output.as_ref())
        }
        Command::Align { alignment } => {
            let mut core = framed_core(document, size, &cli.select)?;
            if cli.select.is_empty() {
                core.select_all()?;
            }
            core.align(alignment.into())?;
            write_document(&core, cli.output.as_ref())
        }
    }
}

/// Load `document` into an engine whose viewport frames every layer, with `select` selected.
fn framed_core(document: CollageDocument, size: Size, select: &[Uuid]) -> Result<EngineCore, CliError> {
    for id in select {
        ensure_layer(&document, *id)?;
    }
    let mut core = EngineCore::new();
    core.load_document(document);
    core.set_container(Point::default(), size);
    core.fit_to_content();
    core.ui.selection.replace(select.iter().copied());
    Ok(core)
}

fn apply_grid_args(core: &mut EngineCore, args: &GridArgs, scoped: bool) -> Result<(), CliError> {
    if scoped {
        core.update_setting(SettingUpdate::StitchScope(LayoutScope::Selected));
    }
    if args.auto {
        core.update_setting(SettingUpdate::AutoCalcGrid(true));
    }
    if let Some(direction) = args.direction {
        core.update_setting(SettingUpdate::GridDirection(direction.into()));
    }
    if let Some(reverse) = args.reverse {
        core.update_setting(SettingUpdate::GridReverse(reverse));
    }
    if let Some(gap) = args.gap {
        core.update_setting(SettingUpdate::GridGap(gap));
    }
    if let Some(raw) = &args.rows {
        core.update_setting(SettingUpdate::GridRows(GridCount::parse(raw)?));
    }
    if let Some(raw) = &args.cols {
        core.update_setting(SettingUpdate::GridCols(GridCount::parse(raw)?));
    }
    Ok(())
}

fn ensure_layer(document: &CollageDocument, id: Uuid) -> Result<(), CliError> {
    if document.layers.iter().any(|l| l.id == id) { Ok(()) } else { Err(CliError::UnknownLayer(id)) }
}

fn read_input(path: &str) -> Result<String, CliError> {
    let mut buf = String::new();
    if path == "-" {
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read { path: "stdin".to_owned(), source })?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn write_document(core: &EngineCore, output: Option<&PathBuf>) -> Result<(), CliError> {
    let json = core.to_document().to_json()?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .map_err(|source| CliError::Write { path: path.display().to_string(), source })?;
            info!(path = %path.display(), "wrote document");
            Ok(())
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
