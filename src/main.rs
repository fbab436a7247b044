//! Dino Arcade entry point
//!
//! Headless runner: plays one session through the full frame loop with the
//! autopilot at the controls and reports how it went.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use serde::Serialize;

    use dino_arcade::autopilot::{Autopilot, AutopilotConfig};
    use dino_arcade::game::{Game, Host};
    use dino_arcade::platform::{LogHud, NullRender};
    use dino_arcade::settings::Settings;
    use dino_arcade::sim::{AlphaSampler, GamePhase, NoSprites, SpriteSheet, Surface, Variant};

    fn parse_variant(s: &str) -> Result<Variant, String> {
        Variant::parse(s).ok_or_else(|| format!("unknown variant '{s}' (runner, meteors, birds)"))
    }

    #[derive(Parser, Debug)]
    #[command(name = "dino-arcade")]
    #[command(
        about = "Play a dino arcade session headless with the autopilot and report the result"
    )]
    struct Cli {
        #[arg(long, default_value = "runner", value_parser = parse_variant)]
        variant: Variant,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many frames even if the game is still running
        #[arg(long, default_value_t = 18_000)]
        max_frames: u64,
        /// Simulated display refresh interval
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,
        /// Settings JSON; missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        width: Option<f32>,
        #[arg(long)]
        height: Option<f32>,
        /// No sprite alpha: pixel collision never hits
        #[arg(long, default_value_t = false)]
        no_sprites: bool,
        /// Autopilot tuning JSON; missing fields use defaults
        #[arg(long)]
        autopilot_config: Option<PathBuf>,
        /// Print default settings as JSON and exit
        #[arg(long, default_value_t = false)]
        dump_settings: bool,
        /// Write the effective settings to this file before playing
        #[arg(long)]
        save_settings: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        variant: &'static str,
        seed: u64,
        frames: u64,
        ticks: u64,
        phase: GamePhase,
        score: u64,
        distance: f32,
        level: u32,
        room: u32,
        hits_left: i32,
        events: usize,
        jumps: u64,
        dodges: u64,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        if cli.dump_settings {
            println!("{}", Settings::default().to_json()?);
            return Ok(());
        }
        if cli.max_frames == 0 {
            bail!("--max-frames must be > 0");
        }
        if !(cli.frame_ms.is_finite() && cli.frame_ms > 0.0) {
            bail!("--frame-ms must be a positive number, got {}", cli.frame_ms);
        }

        let mut settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if cli.width.is_some() || cli.height.is_some() {
            settings.surface = Surface::new(
                cli.width.unwrap_or(settings.surface.width),
                cli.height.unwrap_or(settings.surface.height),
            );
            settings.validate()?;
        }
        if let Some(path) = &cli.save_settings {
            settings.save(path)?;
        }
        log::info!(
            "Collision: runner {}, meteors {}",
            settings.runner.collision.as_str(),
            settings.meteors.collision.as_str()
        );

        let pilot = match &cli.autopilot_config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let config: AutopilotConfig = serde_json::from_str(&json)
                    .with_context(|| format!("invalid autopilot config in {}", path.display()))?;
                Autopilot::with_config(config)
            }
            None => Autopilot::new(),
        };

        let summary = play(&cli, settings, pilot);

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{} seed {}: {:?} after {} frames, score {}, level {}, room {}, hits left {}",
                summary.variant,
                summary.seed,
                summary.phase,
                summary.frames,
                summary.score,
                summary.level,
                summary.room,
                summary.hits_left
            );
        }
        Ok(())
    }

    fn play(cli: &Cli, settings: Settings, mut pilot: Autopilot) -> RunSummary {
        let variant = cli.variant;
        let surface = settings.surface;
        let sampler: Box<dyn AlphaSampler> = if cli.no_sprites {
            Box::new(NoSprites)
        } else {
            Box::new(SpriteSheet::procedural())
        };

        let mut game = Game::new(variant, settings, cli.seed, sampler);
        let mut render = NullRender::default();
        let mut hud = LogHud::default();

        let mut next = Some(game.start());
        let mut frames = 0;
        while let Some(request) = next {
            if frames >= cli.max_frames {
                game.suspend();
                break;
            }
            let mut host = Host {
                input: &mut pilot,
                surface: &surface,
                render: &mut render,
                hud: &mut hud,
            };
            next = game.frame(request, frames as f64 * cli.frame_ms, &mut host);
            frames += 1;
        }

        let session = game.session();
        let (jumps, dodges) = pilot.stats();
        log::info!("Finished after {} frames ({:?})", frames, session.phase);
        RunSummary {
            variant: variant.as_str(),
            seed: cli.seed,
            frames,
            ticks: session.clock.ticks,
            phase: session.phase,
            score: session.progress.score,
            distance: session.progress.distance,
            level: session.progress.level,
            room: session.progress.room,
            hits_left: session.progress.hits_left,
            events: hud.events_seen,
            jumps,
            dodges,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Dino Arcade (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on this target
}
