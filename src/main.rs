// src/main.rs

//! `seedglyph` command line: render one frame, run an animation on the frame
//! loop, or animate the word cube.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use seedglyph::{
    animation::{AnimationState, AnimationStyle},
    color::Color,
    config::{Config, GridPreset},
    display::{
        drivers::{HeadlessDisplayDriver, PngDisplayDriver, PngTarget},
        DisplayDriver,
    },
    input::{PatternInput, VisualizationInput},
    matrix::WordCube,
    orchestrator::Orchestrator,
    pattern::{HelixCompositor, Visualization},
    prng::SeededRandom,
    scheduler::VsyncActor,
    session::{Session, SessionConfig, SessionId},
};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "seedglyph")]
#[command(about = "Deterministic DNA-helix glyph art from a seed phrase and two hashes")]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults to $SEEDGLYPH_CONFIG, then built-ins)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single frame to a PNG file
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, value_enum, default_value_t = StyleArg::Combined)]
        style: StyleArg,

        /// Rotation phase in radians
        #[arg(long, default_value_t = 0.0)]
        phase: f64,

        /// Flow offset in rows
        #[arg(long, default_value_t = 0.0)]
        flow: f64,

        #[arg(long, value_enum, default_value_t = GridPreset::Full)]
        preset: GridPreset,

        /// Footer label
        #[arg(long)]
        label: Option<String>,

        #[arg(short, long, default_value = "seedglyph.png")]
        output: PathBuf,

        /// Also print the grid as text
        #[arg(long)]
        ascii: bool,
    },

    /// Run one session per input on the frame loop
    Animate {
        /// Input records; repeat for several sessions
        #[arg(short, long = "input")]
        inputs: Vec<PathBuf>,

        /// Add a session for the built-in reference input
        #[arg(long)]
        with_reference: bool,

        #[arg(short, long, value_enum, default_value_t = StyleArg::Combined)]
        style: StyleArg,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Animate the seed phrase as a rotating word cube
    Cube {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Input record (JSON)
    #[arg(short, long, conflicts_with = "reference")]
    input: Option<PathBuf>,

    /// Use the built-in reference input
    #[arg(long)]
    reference: bool,
}

#[derive(Args)]
struct RunArgs {
    #[arg(long, default_value_t = 90)]
    frames: u64,

    /// Frame rate (defaults to the configured target)
    #[arg(long)]
    fps: Option<u32>,

    #[arg(long, value_enum, default_value_t = GridPreset::Preview)]
    preset: GridPreset,

    /// Write `frame_NNNN.png` sequences here; runs headless when omitted
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Footer label
    #[arg(long)]
    label: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Rotate,
    Flow,
    Combined,
    Pulse,
    Random,
}

impl StyleArg {
    /// `Random` is drawn from the input's primary hash, so it repeats per input.
    fn resolve(self, input: &PatternInput) -> AnimationStyle {
        match self {
            StyleArg::Rotate => AnimationStyle::Rotate,
            StyleArg::Flow => AnimationStyle::Flow,
            StyleArg::Combined => AnimationStyle::Combined,
            StyleArg::Pulse => AnimationStyle::Pulse,
            StyleArg::Random => AnimationStyle::pick(&mut SeededRandom::new(&input.primary_hash)),
        }
    }
}

impl SourceArgs {
    fn load(&self) -> Result<(String, PatternInput)> {
        match (&self.input, self.reference) {
            (Some(path), _) => Ok((display_name(path), load_input(path)?)),
            (None, true) => Ok(("reference".to_string(), reference_input()?)),
            (None, false) => bail!("Either --input <FILE> or --reference is required"),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_input(path: &Path) -> Result<PatternInput> {
    let input = VisualizationInput::from_path(path)
        .with_context(|| format!("Failed to load input {}", path.display()))?;
    input
        .validate()
        .with_context(|| format!("Input {} cannot be generated", path.display()))
}

fn reference_input() -> Result<PatternInput> {
    VisualizationInput::reference()
        .validate()
        .context("Built-in reference input is invalid")
}

fn session_config(
    config: &Config,
    name: String,
    style: AnimationStyle,
    preset: GridPreset,
    input: &PatternInput,
    label: Option<String>,
    initial_state: AnimationState,
) -> SessionConfig {
    SessionConfig {
        name,
        style,
        grid: config.grid.size(preset),
        raster: config.raster.clone(),
        animation: config.animation.clone(),
        background: Color::Named(input.background),
        label,
        initial_state,
    }
}

fn driver_for(out_dir: Option<&Path>, name: &str) -> Box<dyn DisplayDriver> {
    match out_dir {
        Some(dir) => Box::new(PngDisplayDriver::new(PngTarget::Sequence(dir.join(name)))),
        None => Box::new(HeadlessDisplayDriver::counting()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_render(
    config: &Config,
    source: &SourceArgs,
    style: StyleArg,
    state: AnimationState,
    preset: GridPreset,
    label: Option<String>,
    output: &Path,
    ascii: bool,
) -> Result<()> {
    let (name, input) = source.load()?;
    let style = style.resolve(&input);
    let session_config = session_config(config, name, style, preset, &input, label, state);
    let driver = Box::new(PngDisplayDriver::new(PngTarget::Snapshot(output.to_path_buf())));
    let visualization: Box<dyn Visualization> = Box::new(HelixCompositor::new(input));

    let mut session = Session::new(SessionId(1), visualization, session_config, driver)
        .context("Failed to open output surface")?;
    let summary = session.render_frame().context("Failed to render frame")?;
    if ascii {
        print!("{}", session.grid());
    }
    session.cancel();
    info!(
        "Wrote {} ({} glyphs, {} style)",
        output.display(),
        summary.glyphs_drawn,
        style
    );
    Ok(())
}

/// Registers every session, then drives them from the vsync actor.
fn run_frame_loop(
    config: &Config,
    run: &RunArgs,
    sessions: Vec<(String, AnimationStyle, PatternInput, Box<dyn Visualization>)>,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new();
    for (name, style, input, visualization) in sessions {
        let id = orchestrator.allocate_id();
        let label = run.label.clone().or_else(|| Some(name.clone()));
        let session_config = session_config(
            config,
            name.clone(),
            style,
            run.preset,
            &input,
            label,
            AnimationState::default(),
        );
        match Session::new(id, visualization, session_config, driver_for(run.out_dir.as_deref(), &name)) {
            Ok(session) => {
                orchestrator.register(session);
            }
            Err(e) => error!("Skipping '{}': {}", name, e),
        }
    }
    if orchestrator.is_empty() {
        bail!("No session could be started");
    }

    let (tx, rx) = mpsc::channel();
    let fps = run.fps.unwrap_or(config.animation.target_fps);
    let mut vsync = VsyncActor::spawn(tx, fps).context("Failed to spawn VsyncActor")?;
    let frames = orchestrator.run(&rx, Some(run.frames));
    vsync.stop();
    info!("Rendered {} frame(s)", frames);
    Ok(())
}

fn run_animate(
    config: &Config,
    inputs: &[PathBuf],
    with_reference: bool,
    style: StyleArg,
    run: &RunArgs,
) -> Result<()> {
    let mut loaded = Vec::new();
    for path in inputs {
        match load_input(path) {
            Ok(input) => loaded.push((display_name(path), input)),
            // one bad record does not stop the others
            Err(e) => error!("{:#}", e),
        }
    }
    if with_reference || inputs.is_empty() {
        loaded.push(("reference".to_string(), reference_input()?));
    }

    let sessions = loaded
        .into_iter()
        .map(|(name, input)| {
            let style = style.resolve(&input);
            let visualization: Box<dyn Visualization> = Box::new(HelixCompositor::new(input.clone()));
            (name, style, input, visualization)
        })
        .collect();
    run_frame_loop(config, run, sessions)
}

fn run_cube(config: &Config, source: &SourceArgs, run: &RunArgs) -> Result<()> {
    let (name, input) = source.load()?;
    let cube = WordCube::new(&input.seed_phrase).context("Failed to build word cube")?;
    let visualization: Box<dyn Visualization> = Box::new(cube);
    run_frame_loop(
        config,
        run,
        vec![(name, AnimationStyle::Rotate, input, visualization)],
    )
}

/// Main entry point for `seedglyph`.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    info!("Starting seedglyph...");
    let config = Config::load_or_default(cli.config.as_deref());

    let result = match &cli.command {
        Command::Render {
            source,
            style,
            phase,
            flow,
            preset,
            label,
            output,
            ascii,
        } => run_render(
            &config,
            source,
            *style,
            AnimationState::new(*phase, *flow),
            *preset,
            label.clone(),
            output,
            *ascii,
        ),
        Command::Animate {
            inputs,
            with_reference,
            style,
            run,
        } => run_animate(&config, inputs, *with_reference, *style, run),
        Command::Cube { source, run } => run_cube(&config, source, run),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    info!("seedglyph exited.");
    result
}
