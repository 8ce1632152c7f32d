mod events;
mod sys;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use events::AppEvent;
use fifths::config::{self, DiagramConfig};
use fifths::view::{self, ApproximateMetrics};
use fifths::{Diagram, PitchClass, Scale, ScaleMode};
use radial::Relayout;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::IntoEnumIterator;

/// Editors tend to save in bursts; wait this long before re-rendering.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Parser, Debug)]
#[command(version, about = "Draws a circle of fifths for a scale", long_about = None)]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the diagram
    Render(RenderArgs),
    /// Print the chords a scale puts on the circle
    Map {
        #[command(flatten)]
        scale: ScaleArgs,
        #[arg(long)]
        json: bool,
    },
    /// Re-render whenever the config file changes
    Watch(RenderArgs),
    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
    /// List the accepted scale modes
    Modes,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config unless one already exists
    Init,
    /// Print where the config is read from
    Path,
}

#[derive(Args, Debug)]
struct ScaleArgs {
    /// Whole scale, e.g. "F# dorian"
    #[arg(short, long, conflicts_with_all = ["root", "mode"])]
    scale: Option<Scale>,
    #[arg(long)]
    root: Option<PitchClass>,
    #[arg(long)]
    mode: Option<ScaleMode>,
}

impl ScaleArgs {
    /// Fills in whatever the command line leaves out from `base`.
    fn resolve(&self, base: Scale) -> Scale {
        self.scale.unwrap_or(Scale::new(
            self.root.unwrap_or(base.root),
            self.mode.unwrap_or(base.mode),
        ))
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scale: ScaleArgs,
    /// Note to highlight
    #[arg(long)]
    select: Option<PitchClass>,
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,
    /// Canvas edge, overriding layout.size
    #[arg(long)]
    size: Option<f64>,
    /// Output file; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Render(args) => {
            let cfg = load(config_path, &args)?;
            let diagram = build(&cfg, &args);
            render(&diagram, args.format, args.output.as_deref())
        }
        Command::Map { scale, json } => {
            let cfg = config::load_config(config_path).context("Failed to load config")?;
            let cfg = DiagramConfig {
                scale: scale.resolve(cfg.scale),
                ..cfg
            };
            print_map(&Diagram::from_config(&cfg), json)
        }
        Command::Watch(args) => watch(config_path, &args),
        Command::Config(ConfigCommand::Init) => {
            let path = config::write_default_config(config_path)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Config(ConfigCommand::Path) => {
            let path = match config_path {
                Some(p) => p.to_path_buf(),
                None => config::get_config_path()?,
            };
            println!("{}", path.display());
            Ok(())
        }
        Command::Modes => {
            for mode in ScaleMode::iter() {
                println!("{mode}");
            }
            Ok(())
        }
    }
}

fn load(path: Option<&Path>, args: &RenderArgs) -> Result<DiagramConfig> {
    let mut cfg = config::load_config(path).context("Failed to load config")?;
    apply_overrides(&mut cfg, args)?;
    Ok(cfg)
}

fn apply_overrides(cfg: &mut DiagramConfig, args: &RenderArgs) -> Result<()> {
    cfg.scale = args.scale.resolve(cfg.scale);
    if let Some(size) = args.size {
        cfg.layout.size = size;
        cfg.validate()?;
    }
    Ok(())
}

fn build(cfg: &DiagramConfig, args: &RenderArgs) -> Diagram {
    let mut diagram = Diagram::from_config(cfg);
    diagram.select(args.select);
    diagram
}

fn render(diagram: &Diagram, format: Format, output: Option<&Path>) -> Result<()> {
    let bytes = match format {
        Format::Svg => {
            let scene = view::scene(diagram, &ApproximateMetrics);
            view::svg::render_svg(&scene).into_bytes()
        }
        Format::Png => render_png(diagram)?,
    };

    match output {
        Some(path) => {
            fs_err::write(path, bytes)?;
            log::info!("Wrote {}", path.display());
        }
        None => std::io::stdout().lock().write_all(&bytes)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn render_png(diagram: &Diagram) -> Result<Vec<u8>> {
    use fifths::view::png::{CairoMetrics, render_png};

    let metrics = CairoMetrics::new(diagram.theme().fonts.family.clone())?;
    let scene = view::scene(diagram, &metrics);
    let mut out = Vec::new();
    render_png(&scene, &mut out)?;
    Ok(out)
}

#[cfg(not(feature = "png"))]
fn render_png(_diagram: &Diagram) -> Result<Vec<u8>> {
    bail!("PNG output needs a build with the `png` feature")
}

fn print_map(diagram: &Diagram, json: bool) -> Result<()> {
    let map = diagram.map();
    if json {
        println!("{}", serde_json::to_string_pretty(map)?);
        return Ok(());
    }

    println!("{}", map.scale);
    for a in map.in_stacking_order() {
        println!(
            "  {} {:<4} {:<11} {}",
            a.position,
            a.root.to_string(),
            a.quality.to_string(),
            a.numeral
        );
    }
    let disabled: Vec<String> = map.disabled().map(|pc| pc.to_string()).collect();
    println!("  off: {}", disabled.join(" "));
    for label in diagram.group_labels() {
        println!("  \"{}\" at {}°", label.run.text, label.run.angle);
    }
    Ok(())
}

fn watch(config_path: Option<&Path>, args: &RenderArgs) -> Result<()> {
    let Some(output) = args.output.as_deref() else {
        bail!("watch needs --output");
    };
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config::get_config_path()?,
    };

    let cfg = load(Some(path.as_path()), args)?;
    let mut diagram = build(&cfg, args);
    render(&diagram, args.format, Some(output))?;

    let (tx, rx) = async_channel::bounded(32);
    sys::runtime::start_background_services(path.clone(), tx);

    while let Ok(event) = rx.recv_blocking() {
        match event {
            AppEvent::Shutdown => break,
            AppEvent::ConfigReload => {
                std::thread::sleep(RELOAD_DEBOUNCE);
                // one render per burst
                let mut shutdown = false;
                while let Ok(next) = rx.try_recv() {
                    shutdown |= next == AppEvent::Shutdown;
                }
                if shutdown {
                    break;
                }

                let cfg = match load(Some(path.as_path()), args) {
                    Ok(cfg) => cfg,
                    Err(e) => {
                        log::error!("Keeping previous diagram: {:#}", e);
                        continue;
                    }
                };
                match diagram.apply_config(&cfg) {
                    Relayout::None => log::debug!("Config change did not affect the diagram"),
                    relayout => {
                        log::debug!("Re-rendering ({:?})", relayout);
                        if let Err(e) = render(&diagram, args.format, Some(output)) {
                            log::error!("Render failed: {:#}", e);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fifths::pitch::PitchClass::*;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let mut full = vec!["fifths", "render"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Render(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scale_args_fall_back_to_config() {
        let base = Scale::new(C, ScaleMode::Minor);
        assert_eq!(render_args(&[]).scale.resolve(base), base);
        assert_eq!(
            render_args(&["--root", "G"]).scale.resolve(base),
            Scale::new(G, ScaleMode::Minor)
        );
        assert_eq!(
            render_args(&["--scale", "Bb lydian"]).scale.resolve(base),
            Scale::new(BFlat, ScaleMode::Lydian)
        );
    }

    #[test]
    fn test_scale_conflicts_with_root() {
        let argv = ["fifths", "render", "--scale", "C major", "--root", "D"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_size_override_is_validated() {
        let mut cfg = DiagramConfig::default();
        assert!(apply_overrides(&mut cfg, &render_args(&["--size", "10"])).is_err());
        let mut cfg = DiagramConfig::default();
        apply_overrides(&mut cfg, &render_args(&["--size", "600", "--select", "f#"])).unwrap();
        assert_eq!(cfg.layout.size, 600.0);
    }

    #[test]
    fn test_select_reaches_the_diagram() {
        let args = render_args(&["--select", "E"]);
        let diagram = build(&DiagramConfig::default(), &args);
        assert_eq!(diagram.selected(), Some(E));
    }
}
