//! Pokeview CLI
//!
//! Drive the motion layer from a terminal: sample the orb field, roll
//! particle bursts, step a card flip, look up type colors and warm sprites.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pokeview_animation::{
    AnimatedBackground, FlipAnimationController, FrameScheduler, MotionSettings, OrbFieldModel,
    ParticleBurstGenerator, SequentialIds, MAX_PARTICLE_COUNT, SETTINGS_FILE,
};
use pokeview_image::{HttpImageLoader, ImagePreloader};
use pokeview_platform::{
    EnvMotionPreference, IntervalFrameHost, ManualFrameHost, MotionPreference,
    StaticMotionPreference,
};
use pokeview_theme::{color_for, hex_for};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pokeview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pokeview motion layer CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./pokeview.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the orb field on a simulated frame clock
    Orbs {
        /// Simulated duration in milliseconds
        #[arg(short, long, default_value = "1000")]
        duration: u32,

        /// Simulated frames per second
        #[arg(short, long, default_value = "10")]
        fps: u32,
    },

    /// Run the background on a real-time frame clock
    Watch {
        /// How long to run, in seconds
        #[arg(short, long, default_value = "3")]
        seconds: u64,

        /// Frames per second
        #[arg(short, long, default_value = "60")]
        fps: u32,
    },

    /// Generate a particle burst
    Burst {
        /// Particle count (overrides the settings file)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// RNG seed for a reproducible burst
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Step a card flip from front to back
    Flip {
        /// Force reduced motion instead of reading the environment
        #[arg(long)]
        reduced: bool,

        /// Flip duration in milliseconds (overrides the settings file)
        #[arg(short, long)]
        duration: Option<u32>,

        /// Sampling step in milliseconds
        #[arg(long, default_value = "100")]
        step: u32,
    },

    /// Look up badge colors for type names
    Colors {
        /// Type names, any case
        #[arg(required = true)]
        types: Vec<String>,
    },

    /// Fetch and decode sprite URLs
    Preload {
        /// Image URLs
        urls: Vec<String>,
    },

    /// Show the resolved settings
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Orbs { duration, fps } => cmd_orbs(&settings, duration, fps),
        Commands::Watch { seconds, fps } => cmd_watch(&settings, seconds, fps),
        Commands::Burst { count, seed } => cmd_burst(&settings, count, seed),
        Commands::Flip {
            reduced,
            duration,
            step,
        } => cmd_flip(&settings, reduced, duration, step),
        Commands::Colors { types } => cmd_colors(&types),
        Commands::Preload { urls } => cmd_preload(&urls),
        Commands::Info => cmd_info(&settings),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<MotionSettings> {
    match path {
        Some(path) => MotionSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => MotionSettings::load_or_default(SETTINGS_FILE)
            .with_context(|| format!("Failed to load {}", SETTINGS_FILE)),
    }
}

fn cmd_orbs(settings: &MotionSettings, duration: u32, fps: u32) -> Result<()> {
    if fps == 0 {
        anyhow::bail!("fps must be at least 1");
    }

    let host = Arc::new(ManualFrameHost::new());
    let scheduler = FrameScheduler::new(host.clone());
    let mut background = AnimatedBackground::new(settings.background);

    background.start_with(&scheduler, |frame| {
        let [a, b, c] = frame.orbs.to_array();
        println!(
            "{:>7.1}ms  orb1 ({:>6.1}, {:>6.1}) x{:.3}  orb2 ({:>6.1}, {:>6.1}) x{:.3}  orb3 ({:>6.1}, {:>6.1}) x{:.3}",
            frame.elapsed_ms, a.x, a.y, a.scale, b.x, b.y, b.scale, c.x, c.y, c.scale
        );
    });

    let step = 1000.0 / f64::from(fps);
    let mut ts = 0.0;
    while ts <= f64::from(duration) {
        host.advance(ts);
        ts += step;
    }

    background.stop();
    debug!("Sampled {} frames", background.latest().frame);
    Ok(())
}

fn cmd_watch(settings: &MotionSettings, seconds: u64, fps: u32) -> Result<()> {
    let host = Arc::new(IntervalFrameHost::start(fps).context("Failed to start frame clock")?);
    let scheduler = FrameScheduler::new(host.clone());
    let mut background = AnimatedBackground::new(settings.background);

    info!("Running background at {} fps for {}s", fps, seconds);
    background.start(&scheduler);
    std::thread::sleep(Duration::from_secs(seconds));
    background.stop();
    host.stop();

    let last = background.latest();
    let achieved = if last.elapsed_ms > 0.0 {
        last.frame as f64 / (last.elapsed_ms / 1000.0)
    } else {
        0.0
    };
    info!(
        "Rendered {} frames over {:.0}ms ({:.1} fps)",
        last.frame, last.elapsed_ms, achieved
    );
    Ok(())
}

fn cmd_burst(settings: &MotionSettings, count: Option<usize>, seed: Option<u64>) -> Result<()> {
    if !settings.background.enable_particles {
        warn!("Particles are disabled in the settings file");
        return Ok(());
    }

    let mut config = settings.particle_config();
    config.count = burst_count(settings, count)?;

    let mut generator =
        ParticleBurstGenerator::new(config).with_id_source(SequentialIds::starting_at(1));
    if let Some(seed) = seed {
        generator = generator.with_seed(seed);
    }

    for particle in generator.burst() {
        println!(
            "#{:<3} x {:>5.1}%  y {:>5.1}%  delay {:>6.1}ms",
            particle.id, particle.x, particle.y, particle.delay_ms
        );
    }
    Ok(())
}

fn burst_count(settings: &MotionSettings, count: Option<usize>) -> Result<usize> {
    let count = count.unwrap_or(settings.background.particle_count);
    if count > MAX_PARTICLE_COUNT {
        anyhow::bail!(
            "Particle count {} exceeds the limit of {}",
            count,
            MAX_PARTICLE_COUNT
        );
    }
    Ok(count)
}

fn cmd_flip(
    settings: &MotionSettings,
    reduced: bool,
    duration: Option<u32>,
    step: u32,
) -> Result<()> {
    if step == 0 {
        anyhow::bail!("step must be at least 1ms");
    }

    let motion: Arc<dyn MotionPreference> = if reduced {
        Arc::new(StaticMotionPreference::reduced())
    } else {
        Arc::new(EnvMotionPreference::new())
    };

    let mut overrides = settings.flip;
    if let Some(duration) = duration {
        overrides = overrides.duration_ms(duration);
    }

    let mut controller = FlipAnimationController::new(motion);
    let request = controller.request_flip(&overrides);
    let config = request.config;

    info!(
        "Flip: {}ms {} (reduced motion respected: {})",
        config.duration_ms,
        config.easing.to_css(),
        config.respect_reduced_motion
    );

    let mut elapsed = 0u32;
    loop {
        let state = controller.advance(f64::from(elapsed), &config);
        let transform = config.rotation_at(f64::from(elapsed), request.state);
        println!(
            "{:>5}ms  {:<16} front {:<7} back {:<7}{}",
            elapsed,
            transform.to_css(),
            state.front_visibility().to_css(),
            state.back_visibility().to_css(),
            if state.is_animating() { "" } else { "  settled" }
        );
        if !state.is_animating() {
            break;
        }
        elapsed = elapsed.saturating_add(step);
    }
    Ok(())
}

fn cmd_colors(types: &[String]) -> Result<()> {
    for name in types {
        println!("{:<12} {:<14} #{:06X}", name, color_for(name), hex_for(name));
    }
    Ok(())
}

fn cmd_preload(urls: &[String]) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let preloader = ImagePreloader::new(Arc::new(HttpImageLoader::new()));
    let report = runtime.block_on(preloader.preload(urls));

    info!(
        "Preloaded {} image(s), {} failed, {} already cached",
        report.loaded, report.failed, report.cached
    );
    Ok(())
}

fn cmd_info(settings: &MotionSettings) -> Result<()> {
    let background = &settings.background;
    let particles = settings.particle_config();
    let motion = EnvMotionPreference::new();
    let reduced = motion.prefers_reduced_motion();
    let flip = FlipAnimationController::new(Arc::new(motion)).resolve_config(&settings.flip);

    println!("Pokeview Motion Layer");
    println!("=====================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Background:");
    println!("  - Orb preset: {:?}", background.orb_preset);
    println!("  - Animation speed: {}x", background.animation_speed);
    println!(
        "  - Particles: {}",
        if background.enable_particles {
            format!("{} per burst", background.particle_count)
        } else {
            "disabled".to_string()
        }
    );
    println!();
    println!("Particles:");
    println!("  - Y band: {:.0}%..{:.0}%", particles.y_band.0, particles.y_band.1);
    println!("  - Delay: {:?}", particles.delay);
    println!();
    println!("Flip:");
    println!("  - Duration: {}ms", flip.duration_ms);
    println!("  - Easing: {}", flip.easing.to_css());
    println!(
        "  - Reduced motion: {}{}",
        if reduced { "requested" } else { "not requested" },
        if flip.respect_reduced_motion { "" } else { " (ignored)" }
    );
    println!();
    println!("Orb ranges at speed 1x:");
    for (index, orb) in OrbFieldModel::from_preset(background.orb_preset)
        .orbs()
        .iter()
        .enumerate()
    {
        let (x0, x1) = orb.x.range();
        let (y0, y1) = orb.y.range();
        let (s0, s1) = orb.scale.range();
        println!(
            "  - orb{}: x {:.0}..{:.0}  y {:.0}..{:.0}  scale {:.2}..{:.2}",
            index + 1,
            x0,
            x1,
            y0,
            y1,
            s0,
            s1
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flip_flags() {
        let cli = Cli::parse_from(["pokeview", "flip", "--reduced", "-d", "250"]);
        match cli.command {
            Commands::Flip {
                reduced,
                duration,
                step,
            } => {
                assert!(reduced);
                assert_eq!(duration, Some(250));
                assert_eq!(step, 100);
            }
            _ => panic!("expected flip"),
        }
    }

    #[test]
    fn test_burst_count_is_capped() {
        let settings = MotionSettings::default();
        assert_eq!(burst_count(&settings, None).unwrap(), 8);
        assert_eq!(burst_count(&settings, Some(MAX_PARTICLE_COUNT)).unwrap(), MAX_PARTICLE_COUNT);
        assert!(burst_count(&settings, Some(MAX_PARTICLE_COUNT + 1)).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let path = PathBuf::from("does/not/exist/pokeview.toml");
        assert!(load_settings(Some(&path)).is_err());
    }
}
