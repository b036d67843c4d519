use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use music_visualiser_core::{
    AppConfig, Canvas, DrawingSurface, Primitive, RenderLoop, RenderSettings, SignalGenerator,
    SimulatedBackend, TickOutcome, UiEvent, VisualStyle, Visualiser, VisualiserError,
};
use tracing_subscriber::EnvFilter;

const REPORT_EVERY: Duration = Duration::from_secs(1);

fn main() -> music_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Live(args) => run_live(args),
        Commands::Snapshot(args) => run_snapshot(args),
    }
}

fn load_config(
    path: Option<&Path>,
    style: Option<VisualStyle>,
) -> music_visualiser_core::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::live_defaults(),
    };
    if let Some(style) = style {
        config.style = style;
    }
    Ok(config)
}

fn run_live(args: LiveArgs) -> music_visualiser_core::Result<()> {
    let config = load_config(args.config.as_deref(), args.style)?;
    tracing::info!(style = %config.style, track = ?args.track, "starting live mode");

    let surface = HeadlessSurface::new(args.width, args.height);
    let mut viz = Visualiser::new(&config, SimulatedBackend::new(), surface);
    viz.start();

    if let Some(track) = args.track {
        match viz.handle(UiEvent::Load(track)) {
            Ok(()) => viz.handle(UiEvent::Play)?,
            Err(err) => tracing::error!(error = %err, "continuing without a track"),
        }
    }

    let run_for = Duration::from_secs(args.seconds);
    let cycle_every = args
        .cycle_styles
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);
    let mut next_cycle = cycle_every;
    let mut next_report = REPORT_EVERY;
    let started = Instant::now();

    loop {
        let elapsed = started.elapsed();
        if elapsed >= run_for {
            break;
        }

        if let (Some(every), Some(due)) = (cycle_every, next_cycle) {
            if elapsed >= due {
                let style = viz.settings().style.next();
                viz.handle(UiEvent::StyleSelected(style))?;
                next_cycle = Some(due + every);
            }
        }

        viz.catch_up_to(elapsed);

        if elapsed >= next_report {
            let position = viz.position();
            tracing::info!(
                state = ?viz.playback_state(),
                position = %position.current_text,
                total = %position.total_text,
                style = %viz.settings().style,
                primitives = viz.surface().last_count,
                "tick"
            );
            next_report += REPORT_EVERY;
        }

        let wake = viz.next_deadline().unwrap_or(run_for).min(run_for);
        if let Some(pause) = wake.checked_sub(started.elapsed()) {
            thread::sleep(pause);
        }
    }

    viz.shutdown();
    tracing::info!(
        stats = ?viz.render_stats(),
        frames = viz.surface().frames,
        "live mode finished"
    );
    Ok(())
}

fn run_snapshot(args: SnapshotArgs) -> music_visualiser_core::Result<()> {
    let config = load_config(args.config.as_deref(), args.style)?;
    let at = Duration::try_from_secs_f64(args.time)
        .map_err(|_| VisualiserError::msg(format!("invalid snapshot time {}", args.time)))?;
    tracing::info!(style = %config.style, output = ?args.output, "rendering snapshot");

    let generator = SignalGenerator::with_seed(config.render.buffer_len, args.seed);
    let mut render = RenderLoop::with_generator(&config.render, generator);
    let mut canvas = Canvas::new(args.width, args.height);
    let settings = RenderSettings {
        style: config.style,
        theme: config.theme,
        speed: config.render.speed,
    };

    match render.tick(at, settings, &mut canvas) {
        Ok(TickOutcome::Rendered { primitives, .. }) => {
            tracing::info!(primitives, "frame rendered");
        }
        Ok(TickOutcome::SkippedZeroExtent) => {
            tracing::warn!("canvas has no area, writing an empty frame");
        }
        Err(err) => return Err(VisualiserError::msg(err.to_string())),
    }

    let json = serde_json::to_vec_pretty(canvas.primitives())?;
    std::fs::write(&args.output, json)?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Stand-in for a window: keeps the frame size and counts what it was given.
#[derive(Debug)]
struct HeadlessSurface {
    width: f64,
    height: f64,
    frames: u64,
    last_count: usize,
}

impl HeadlessSurface {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            frames: 0,
            last_count: 0,
        }
    }
}

impl DrawingSurface for HeadlessSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn replace_primitives(&mut self, primitives: Vec<Primitive>) {
        self.frames += 1;
        self.last_count = primitives.len();
        tracing::trace!(frame = self.frames, primitives = self.last_count, "frame replaced");
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Audio-reactive music visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the render loop and position poller in real time.
    Live(LiveArgs),
    /// Render a single frame and write its primitives as JSON.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct LiveArgs {
    /// WAV file to play while visualising.
    #[arg(short, long)]
    track: Option<PathBuf>,
    /// Visual style: bars, dots or grid.
    #[arg(short, long)]
    style: Option<VisualStyle>,
    /// How long to run before exiting.
    #[arg(long, default_value_t = 10)]
    seconds: u64,
    /// Switch to the next style every N seconds.
    #[arg(long)]
    cycle_styles: Option<u64>,
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Where to write the primitive list.
    #[arg(short, long)]
    output: PathBuf,
    /// Visual style: bars, dots or grid.
    #[arg(short, long)]
    style: Option<VisualStyle>,
    /// Frame time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// Seed for the signal's noise term.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}
