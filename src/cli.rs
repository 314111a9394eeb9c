use crate::config::load_config;
use crate::interaction::{PointerEvent, PointerOutcome};
use crate::model::Viewport;
use crate::provider::JsonFileProvider;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::scene_dump::write_scene_dump;
use crate::viz::Visualization;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "asmnet", version, about = "Drill-down network view of hierarchical assemblies")]
pub struct Args {
    /// Dataset JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (JSON5 accepted)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Node id to drill into, or '..' to go back. Repeatable, applied in order.
    #[arg(short = 'n', long = "navigate")]
    pub navigate: Vec<String>,

    /// JSON list of pointer events to replay after navigation
    #[arg(long = "events")]
    pub events: Option<PathBuf>,

    /// Directory to write every animation frame into
    #[arg(long = "frames")]
    pub frames: Option<PathBuf>,

    /// Frame rate used when sampling transitions
    #[arg(long = "fps", default_value_t = 60)]
    pub fps: u32,

    /// Write the final scene (visible nodes, edges, positions) as JSON
    #[arg(long = "dumpScene")]
    pub dump_scene: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavStep {
    Drill(String),
    Back,
}

impl NavStep {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            ".." => NavStep::Back,
            id => NavStep::Drill(id.to_string()),
        }
    }
}

struct FrameRecorder {
    dir: PathBuf,
    format: OutputFormat,
    next: usize,
}

impl FrameRecorder {
    fn record(&mut self, viz: &Visualization) -> Result<()> {
        self.next += 1;
        let path = frame_path(&self.dir, self.next, self.format);
        write_view(viz, self.format, Some(&path))
    }
}

fn frame_path(dir: &Path, index: usize, format: OutputFormat) -> PathBuf {
    dir.join(format!("frame-{index:04}.{}", format.extension()))
}

struct Clock {
    now: Duration,
    interval: Duration,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let mut viz = Visualization::new(config, Viewport::new(args.width, args.height));
    let input = args.input.clone().unwrap_or_else(|| PathBuf::from("-"));
    let provider = JsonFileProvider::new(input);
    if let Err(err) = futures::executor::block_on(viz.load(&provider)) {
        warn!(%err, input = %provider.path().display(), "rendering error view");
    }

    let mut recorder = match &args.frames {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            Some(FrameRecorder {
                dir: dir.clone(),
                format: args.output_format,
                next: 0,
            })
        }
        None => None,
    };
    let mut clock = Clock {
        now: Duration::ZERO,
        interval: Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1))),
    };

    settle(&mut viz, &mut clock, recorder.as_mut())?;

    for raw in &args.navigate {
        match NavStep::parse(raw) {
            NavStep::Back => viz.go_back().context("cannot go back")?,
            NavStep::Drill(id) => viz
                .drill_into(&id)
                .with_context(|| format!("cannot drill into `{id}`"))?,
        }
        settle(&mut viz, &mut clock, recorder.as_mut())?;
    }

    if let Some(path) = &args.events {
        let events = read_events(path)?;
        info!(count = events.len(), "replaying pointer events");
        for event in events {
            match viz.handle_pointer(event) {
                PointerOutcome::Click(_) => settle(&mut viz, &mut clock, recorder.as_mut())?,
                PointerOutcome::Redraw => {
                    if let Some(recorder) = recorder.as_mut() {
                        recorder.record(&viz)?;
                    }
                }
                PointerOutcome::Ignored => {}
            }
        }
    }

    if let Some(path) = &args.dump_scene {
        write_scene_dump(path, &viz)?;
    }

    match args.output_format {
        OutputFormat::Svg => write_view(&viz, OutputFormat::Svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_view(&viz, OutputFormat::Png, Some(&output))
        }
    }
}

/// Samples the running transition to completion on the virtual clock.
fn settle(viz: &mut Visualization, clock: &mut Clock, mut recorder: Option<&mut FrameRecorder>) -> Result<()> {
    while viz.is_animating() {
        let more = viz.on_frame(clock.now);
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.record(viz)?;
        }
        clock.now += clock.interval;
        if !more {
            break;
        }
    }
    Ok(())
}

fn write_view(viz: &Visualization, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let svg = render_svg(viz);
    match (format, output) {
        (OutputFormat::Svg, output) => write_output_svg(&svg, output),
        (OutputFormat::Png, Some(path)) => {
            let config = viz.config();
            write_output_png(&svg, path, &config.render, &config.theme.font_family)
        }
        (OutputFormat::Png, None) => Err(anyhow::anyhow!("Output path required for png output")),
    }
}

fn read_events(path: &Path) -> Result<Vec<PointerEvent>> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_events(&contents)
}

fn parse_events(contents: &str) -> Result<Vec<PointerEvent>> {
    Ok(serde_json::from_str(contents)?)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::Entity;

    #[test]
    fn parses_navigation_steps() {
        assert_eq!(NavStep::parse(".."), NavStep::Back);
        assert_eq!(NavStep::parse(" 42 "), NavStep::Drill("42".into()));
    }

    #[test]
    fn numbers_frames() {
        let path = frame_path(Path::new("out"), 7, OutputFormat::Png);
        assert_eq!(path, Path::new("out").join("frame-0007.png"));
    }

    #[test]
    fn parses_event_script() {
        let events = parse_events(
            r#"[{"kind":"press","x":10,"y":20},{"kind":"move","x":15,"y":25},{"kind":"release","x":15,"y":25}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], PointerEvent::Move { x: 15.0, y: 25.0 });
    }

    #[test]
    fn settle_runs_transition_on_virtual_clock() {
        let mut viz = Visualization::new(Config::default(), Viewport::new(600.0, 600.0));
        viz.try_set_entities(vec![Entity::new("A", "A", None)]).unwrap();
        let mut clock = Clock {
            now: Duration::ZERO,
            interval: Duration::from_millis(100),
        };
        settle(&mut viz, &mut clock, None).unwrap();
        assert!(!viz.is_animating());
        assert_eq!(clock.now, Duration::from_millis(500));
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
