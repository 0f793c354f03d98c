mod script;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use halo_core::{EffectConfig, Palette};
use halo_engine::{Effect, ManualScheduler, ThreadScheduler, UiCommand};
use halo_render::{Compositor, Surface};

use crate::script::{parse_script, ScriptEvent};

const DEFAULT_SCRIPT: &str = "start@0.3,tap:195x640@1.4,answer@2.6,stop@3.4";

#[derive(Parser, Debug, Clone)]
#[command(name = "halo", version, about = "Render the listening glow to PNG frames")]
struct Cli {
    #[arg(long, default_value_t = 390)]
    width: u32,

    #[arg(long, default_value_t = 844)]
    height: u32,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long, value_name = "SECONDS", default_value_t = 4.5)]
    duration: f32,

    /// Output directory for numbered PNG frames.
    #[arg(long, value_name = "DIR", default_value = "frames")]
    out: PathBuf,

    /// JSON effect config; defaults are used when absent.
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Gradient palette preset: classic or vivid.
    #[arg(long)]
    palette: Option<String>,

    /// Comma-separated `command@seconds` items, e.g. `start@0.5,tap:120x300@1.2,stop@3`.
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Drive the effect from a real timer thread and pace frames on the wall clock.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Print the effective config as JSON and exit.
    #[arg(long, default_value_t = false)]
    dump_config: bool,

    /// Write the effective config to this file before rendering.
    #[arg(long, value_name = "JSON")]
    save_config: Option<PathBuf>,
}

fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("--width and --height must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if !(args.duration.is_finite() && args.duration > 0.0) {
        bail!("--duration must be > 0 seconds");
    }
    Ok(())
}

fn load_config(args: &Cli) -> Result<EffectConfig> {
    let mut config = match &args.config {
        Some(path) => EffectConfig::load(path).with_context(|| format!("load config {}", path.display()))?,
        None => EffectConfig::default(),
    };
    if let Some(name) = &args.palette {
        config.gradient.palette =
            Palette::by_name(name).ok_or_else(|| anyhow!("unknown palette `{name}` (classic, vivid)"))?;
    }
    config.validate()?;
    Ok(config)
}

fn frame_count(args: &Cli) -> usize {
    ((args.duration * args.fps as f32).ceil() as usize).max(1)
}

/// Applies scripted commands once their time has come.
struct ScriptCursor {
    events: Vec<ScriptEvent>,
    next: usize,
}

impl ScriptCursor {
    fn new(events: Vec<ScriptEvent>) -> Self {
        Self { events, next: 0 }
    }

    fn due(&mut self, now: f32) -> Vec<UiCommand> {
        let mut due = Vec::new();
        while let Some(event) = self.events.get(self.next) {
            if event.at > now {
                break;
            }
            log::info!("{:.2}s: {:?}", event.at, event.command);
            due.push(event.command);
            self.next += 1;
        }
        due
    }
}

fn write_frame(surface: &Surface, dir: &Path, index: usize) -> Result<()> {
    let path = dir.join(format!("frame_{index:05}.png"));
    surface
        .save_png(&path)
        .with_context(|| format!("write {}", path.display()))
}

/// Render as fast as possible, ticking the controller by hand so every frame
/// lands on exact effect time.
fn run_offline(args: &Cli, config: &EffectConfig, mut script: ScriptCursor) -> Result<()> {
    let mut effect = Effect::new(config, ManualScheduler::new());
    let mut compositor = Compositor::new(config);
    let mut surface = Surface::new(args.width, args.height)?;
    let tick = config.tick_seconds();
    effect.activate()?;
    compositor.sync_ripple(&effect.snapshot().ripple);

    let frames = frame_count(args);
    let started = Instant::now();
    let mut fired: u64 = 0;
    for index in 0..frames {
        let now = index as f32 / args.fps as f32;
        for command in script.due(now) {
            effect.handle(command);
        }
        let target_ticks = (now / tick).round() as u64;
        let missing = target_ticks.saturating_sub(fired);
        effect.scheduler_mut().fire_n(missing as usize);
        fired += missing;

        compositor.render(&effect.snapshot(), &mut surface)?;
        write_frame(&surface, &args.out, index)?;
    }
    effect.deactivate();
    log::info!(
        "wrote {frames} frames to {} in {:.2}s",
        args.out.display(),
        started.elapsed().as_secs_f32()
    );
    Ok(())
}

/// Tick on a timer thread and sample the controller at the frame rate.
fn run_realtime(args: &Cli, config: &EffectConfig, mut script: ScriptCursor) -> Result<()> {
    let mut effect = Effect::new(config, ThreadScheduler::new());
    let mut compositor = Compositor::new(config);
    let mut surface = Surface::new(args.width, args.height)?;
    let frame_period = Duration::from_secs_f32(1.0 / args.fps as f32);

    let active = effect.activated()?;
    compositor.sync_ripple(&active.snapshot().ripple);
    let started = Instant::now();
    for index in 0..frame_count(args) {
        let deadline = started + frame_period * index as u32;
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
        for command in script.due(started.elapsed().as_secs_f32()) {
            active.handle(command);
        }
        compositor.render(&active.snapshot(), &mut surface)?;
        write_frame(&surface, &args.out, index)?;
    }
    drop(active);
    log::info!("realtime run finished after {:.2}s", started.elapsed().as_secs_f32());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    if let Some(path) = &args.save_config {
        config.save(path).with_context(|| format!("save config {}", path.display()))?;
        log::info!("saved config to {}", path.display());
    }

    let script = ScriptCursor::new(parse_script(&args.script)?);
    fs::create_dir_all(&args.out).with_context(|| format!("create {}", args.out.display()))?;
    log::info!(
        "rendering {}x{} at {} fps for {:.1}s ({})",
        args.width,
        args.height,
        args.fps,
        args.duration,
        if args.realtime { "realtime" } else { "offline" }
    );

    if args.realtime {
        run_realtime(&args, &config, script)
    } else {
        run_offline(&args, &config, script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(extra: &[&str]) -> Cli {
        let mut argv = vec!["halo"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_validate() {
        let args = cli(&[]);
        validate_args(&args).unwrap();
        assert_eq!(frame_count(&args), 135);
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert!(validate_args(&cli(&["--fps", "0"])).is_err());
    }

    #[test]
    fn test_palette_override() {
        let config = load_config(&cli(&["--palette", "vivid"])).unwrap();
        assert_eq!(config.gradient.palette, Palette::vivid());
        assert!(load_config(&cli(&["--palette", "sepia"])).is_err());
    }

    #[test]
    fn test_script_cursor_fires_in_order() {
        let mut cursor = ScriptCursor::new(parse_script("start@0.1,stop@0.5").unwrap());
        assert!(cursor.due(0.0).is_empty());
        assert_eq!(cursor.due(0.2), vec![UiCommand::Start]);
        assert_eq!(cursor.due(1.0), vec![UiCommand::Stop]);
        assert!(cursor.due(2.0).is_empty());
    }

    #[test]
    fn test_default_script_parses() {
        assert_eq!(parse_script(DEFAULT_SCRIPT).unwrap().len(), 4);
    }
}
