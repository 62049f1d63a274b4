/// rast3d terminal viewer
///
/// Displays an OBJ or STL mesh (or a built-in cube) in the terminal and lets
/// the camera fly around it. See the `input` module for key bindings.
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rast3d_core::{load_mesh, Mesh};
use rast3d_terminal::{AppConfig, TerminalApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rast3d-terminal", version)]
#[command(about = "Software 3D rasterizer for the terminal", long_about = None)]
struct Args {
    /// Mesh to display (.obj or .stl); a cube when omitted
    mesh: Option<PathBuf>,

    /// TOML file with camera, object and display settings
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Exit after rendering this many frames
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_parser = clap::value_parser!(tracing::Level))]
    log_level: tracing::Level,
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let log_level = args.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rast3d_core={log_level},rast3d_terminal={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let mesh = match &args.mesh {
        Some(path) => load_mesh(path)
            .with_context(|| format!("failed to load mesh {}", path.display()))?,
        None => Mesh::cube(2.0),
    };
    tracing::info!(
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "starting rast3d-terminal v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut app = TerminalApp::new(mesh, &config)?.with_frame_limit(args.frames);
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_validated() {
        let args = Args::try_parse_from(["rast3d-terminal", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level, tracing::Level::DEBUG);

        let args = Args::try_parse_from(["rast3d-terminal"]).unwrap();
        assert_eq!(args.log_level, tracing::Level::INFO);

        assert!(Args::try_parse_from(["rast3d-terminal", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_mesh_and_options() {
        let args =
            Args::try_parse_from(["rast3d-terminal", "teapot.obj", "-c", "view.toml", "--frames", "3"])
                .unwrap();
        assert_eq!(args.mesh, Some(PathBuf::from("teapot.obj")));
        assert_eq!(args.config, Some(PathBuf::from("view.toml")));
        assert_eq!(args.frames, Some(3));
        assert!(args.log_file.is_none());
    }
}
