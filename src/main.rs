use clap::{Parser, Subcommand};
use roadside_scenery::{
    config::{ConfigError, SceneConfig, StreamSettings},
    export::{write_snapshot, ExportFormat},
    procgen::{base_distance, SceneCache, SceneGenerator, SceneSnapshot, SceneSummary, SpriteTable},
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to scenery.toml configuration file
    #[arg(short, long, default_value = "./scenery.toml")]
    config: String,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the scenery around one track distance and export it
    Generate {
        /// Track distance to generate around
        #[arg(short, long, allow_negative_numbers = true)]
        distance: f64,

        /// Seed for a reproducible scene
        #[arg(long)]
        seed: Option<u64>,

        /// Output encoding (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Walk a window of the track segment by segment and report what appears
    Stream {
        #[arg(long, allow_negative_numbers = true)]
        start: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        end: Option<f64>,

        #[arg(long)]
        step: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        /// Keep up to this many segments cached (0 regenerates every request)
        #[arg(long)]
        cache: Option<usize>,
    },
    /// Print the sprite assigned to each scenery kind
    Sprites,
    /// Write the effective configuration to the --config path
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config is read before tracing starts so it can pick the log sink
    let (config, config_error) = match SceneConfig::load(&args.config) {
        Ok(config) => (config, None),
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => (SceneConfig::default(), None),
        Err(e) => (SceneConfig::default(), Some(e)),
    };

    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.logging.level);
    let _log_guard = init_tracing(log_level, config.logging.file.as_deref())?;

    if let Some(e) = config_error {
        warn!("Failed to load config from {}: {}, using defaults", args.config, e);
    } else {
        debug!("Configuration: {:?}", config);
    }

    match args.command {
        Command::Generate {
            distance,
            seed,
            format,
            output,
        } => {
            let mut generator = make_generator(seed.or(config.generator.seed));
            let snapshot = SceneSnapshot {
                distance,
                base_distance: base_distance(distance),
                objects: generator.generate(distance),
            };
            info!("Generated scenery at {}: {}", distance, snapshot.summary());

            let format = format.unwrap_or(config.output.format);
            let output = output.or_else(|| config.output.path.as_ref().map(PathBuf::from));
            write_snapshot(&snapshot, format, output.as_deref())?;

            if let Some(path) = output {
                info!("Wrote {} snapshot to {}", format.extension(), path.display());
            }
        }
        Command::Stream {
            start,
            end,
            step,
            seed,
            cache,
        } => {
            let window = StreamSettings {
                start: start.unwrap_or(config.stream.start),
                end: end.unwrap_or(config.stream.end),
                step: step.unwrap_or(config.stream.step),
            };
            let effective = SceneConfig {
                stream: window.clone(),
                ..config.clone()
            };
            effective.validate()?;

            let generator = make_generator(seed.or(config.generator.seed));
            let cache_segments = cache.unwrap_or(config.generator.cache_segments);
            run_stream(generator, &window, cache_segments);
        }
        Command::Sprites => {
            let table = SpriteTable::with_overrides(&config.sprites);
            for (kind, sprite) in table.iter() {
                println!("{:<10} {}", kind.as_str(), sprite);
            }
        }
        Command::InitConfig { force } => {
            let path = Path::new(&args.config);
            if path.exists() && !force {
                return Err(format!("{} already exists, pass --force to replace it", path.display()).into());
            }
            config.save(path)?;
            info!("Wrote configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Install the stderr subscriber, plus a file sink when configured
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(
    level: &str,
    log_file: Option<&str>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or("log file path has no file name")?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn make_generator(seed: Option<u64>) -> SceneGenerator {
    match seed {
        Some(seed) => {
            info!("Seeding scenery generator with {}", seed);
            SceneGenerator::seeded(seed)
        }
        None => SceneGenerator::new(),
    }
}

/// Distances visited when walking `window`, end inclusive
fn stream_distances(window: &StreamSettings) -> impl Iterator<Item = f64> + '_ {
    let steps = ((window.end - window.start) / window.step).floor() as u64;
    (0..=steps).map(move |i| window.start + i as f64 * window.step)
}

fn run_stream(generator: SceneGenerator, window: &StreamSettings, cache_segments: usize) {
    info!(
        "Streaming scenery from {} to {} every {}",
        window.start, window.end, window.step
    );

    let mut total = SceneSummary::default();
    let mut requests = 0u64;

    let mut record = |distance: f64, summary: SceneSummary| {
        debug!("Scenery at {}: {}", distance, summary);
        total.merge(&summary);
        requests += 1;
    };

    if cache_segments > 0 {
        let mut scenes = SceneCache::with_capacity(generator, cache_segments);
        for distance in stream_distances(window) {
            record(distance, SceneSummary::from_objects(scenes.scene_at(distance)));
        }
        let (hits, misses) = scenes.stats();
        info!("Scene cache: {} hits, {} misses", hits, misses);
    } else {
        let mut generator = generator;
        for distance in stream_distances(window) {
            record(distance, SceneSummary::from_objects(&generator.generate(distance)));
        }
    }

    info!("Streamed {} requests: {}", requests, total);
}
