//! TinyMesh Terminal Viewer
//!
//! Displays an OBJ file, or a built-in shape, with the terminal-based ASCII
//! rasterizer.
//! Controls:
//!   - WASD / Arrow Keys: Orbit the camera
//!   - +/-: Zoom, F: Frame the mesh, Space: Toggle spinning
//!   - Left click: Pick a triangle
//!   - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tinymesh_core::{BoundingBox, Cylinder, Mesh, Sphere, Vector};
use tinymesh_terminal::TerminalApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Built-in shapes shown when no OBJ file is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Cube,
    Sphere,
    Cylinder,
}

/// Terminal mesh viewer
#[derive(Debug, Parser)]
#[command(name = "tinymesh-terminal")]
#[command(about = "View and pick triangle meshes in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// OBJ file to display
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Shape to display when no file is given
    #[arg(long, value_enum, default_value_t = Shape::Cube)]
    shape: Shape,

    /// Segments around the sphere and cylinder
    #[arg(long, default_value_t = 24)]
    resolution: usize,

    /// Replace the normals with smooth vertex normals
    #[arg(long)]
    smooth: bool,

    /// Frame-rate cap
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write the mesh as OBJ to this path and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn build_mesh(cli: &Cli) -> Result<Mesh> {
    if let Some(path) = &cli.path {
        return Mesh::read_obj(path).with_context(|| format!("cannot load {}", path.display()));
    }

    let mesh = match cli.shape {
        Shape::Cube => Mesh::from_box(&BoundingBox::cube(1.0)),
        Shape::Sphere => Mesh::sphere(
            &Sphere::new(Vector::zeros(), 1.0),
            cli.resolution,
            cli.resolution / 2,
        ),
        Shape::Cylinder => Mesh::cylinder(
            &Cylinder::new(Vector::new(0.0, -1.0, 0.0), Vector::new(0.0, 1.0, 0.0), 0.75),
            cli.resolution,
        ),
    };
    Ok(mesh)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut mesh = build_mesh(&cli)?;
    if cli.smooth {
        mesh.smooth_normals();
    }
    mesh.validate().context("mesh indices are inconsistent")?;

    info!(
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        "mesh ready"
    );

    if let Some(path) = &cli.export {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");
        mesh.write_obj(path, name)
            .with_context(|| format!("cannot export {}", path.display()))?;
        println!("Wrote {} triangles to {}", mesh.triangle_count(), path.display());
        return Ok(());
    }

    // Run the terminal app
    let mut app = TerminalApp::new(mesh, cli.fps)?;
    app.run()?;

    Ok(())
}
