use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "overlay-resolve", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one overlay against an entity and print the result as JSON.
    Resolve(ResolveArgs),
    /// Print the default overlay configuration record.
    Defaults,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Overlay configuration JSON (partial; merged over the defaults).
    #[arg(long)]
    config: PathBuf,

    /// Entity state JSON.
    #[arg(long)]
    entity: PathBuf,

    /// Scene state JSON (stage transform and viewport).
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Viewer state JSON; visibility is reported for this viewer.
    #[arg(long)]
    viewer: Option<PathBuf>,

    /// Intrinsic content size as `WxH`.
    #[arg(long, value_parser = parse_size, default_value = "100x100")]
    content: token_overlay::Size,

    /// Evaluate as an incremental refresh instead of a full one.
    #[arg(long)]
    partial: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn parse_size(s: &str) -> Result<token_overlay::Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) {
        return Err(format!("size must be finite and non-negative, got '{s}'"));
    }
    Ok(token_overlay::Size::new(w, h))
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let patch: serde_json::Value = read_json(&args.config, "overlay config")?;
    let config = token_overlay::OverlayConfig::from_json_value(&patch);
    let entity: token_overlay::EntityState = read_json(&args.entity, "entity")?;
    let scene: token_overlay::SceneState = match &args.scene {
        Some(p) => read_json(p, "scene")?,
        None => token_overlay::SceneState::default(),
    };
    let viewer: token_overlay::ViewerState = match &args.viewer {
        Some(p) => read_json(p, "viewer")?,
        None => token_overlay::ViewerState::default(),
    };

    let transform = token_overlay::resolve_transform(&token_overlay::ResolveInput {
        config: &config,
        entity: &entity,
        scene: &scene,
        parent: None,
        intrinsic: token_overlay::IntrinsicSize {
            texture: args.content,
            shapes: None,
        },
        full_refresh: !args.partial,
        video_ended: false,
    });
    let z_order = token_overlay::resolve_zorder(
        &config,
        &entity,
        token_overlay::LayerOpts::default().sort_offset,
        0,
    );
    let entities = vec![entity.clone()];
    let visible = token_overlay::evaluate_visibility(&token_overlay::VisibilityInput {
        config: &config,
        entity: &entity,
        viewer: &viewer,
        entities: &entities,
        ready: true,
    });

    let out = serde_json::json!({
        "transform": transform,
        "zOrder": z_order,
        "visible": visible,
        "hooks": token_overlay::required_triggers(&config),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize resolution")?
    );
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let config = token_overlay::OverlayConfig::default();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("serialize default config")?
    );
    Ok(())
}
