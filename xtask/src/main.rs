//! Build automation tasks for the scooter configurator
//!
//! Usage:
//!   cargo xtask build-web                      # Build WASM for web deployment
//!   cargo xtask package-itch                   # Create zip for itch.io upload
//!   cargo xtask extract-parts model.glb        # Dump a glTF node tree as a part table

mod parts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the app binary and its wasm module
const APP_NAME: &str = "scooter-configurator";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the scooter configurator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM for web deployment (GitHub Pages)
    BuildWeb {
        /// Mark as dev build (adds DEV banner to index.html)
        #[arg(long)]
        dev: bool,
    },
    /// Create zip file ready for itch.io upload
    PackageItch,
    /// Write the node tree of a binary glTF file as a RON part table
    ExtractParts {
        /// Binary glTF to read
        glb: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { dev } => build_web(dev),
        Commands::PackageItch => package_itch(),
        Commands::ExtractParts { glb, output } => extract_parts(&glb, output.as_deref()),
    }
}

/// Get the project root directory
fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap_or(manifest).to_path_buf()
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(
        Command::new("curl")
            .args(["-L", "-o"])
            .arg(dest)
            .arg(url),
    )
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Build WASM for web deployment
fn build_web(dev: bool) -> Result<()> {
    let root = project_root();
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown"]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    // Copy WASM binary
    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", APP_NAME);
    std::fs::copy(
        root.join("target/wasm32-unknown-unknown/release").join(&wasm),
        dist.join(&wasm),
    )
    .with_context(|| format!("Missing {}", wasm))?;

    // Copy the page from web/
    std::fs::copy(root.join("web/index.html"), dist.join("index.html")).context("Missing web/index.html")?;

    // Download macroquad JS bundle
    let mq_js = dist.join("mq_js_bundle.js");
    if !mq_js.exists() {
        download_file(
            "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js",
            &mq_js,
        )?;
    }

    // Copy assets
    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    // Apply dev modifications if requested
    if dev {
        println!("Applying DEV build modifications...");
        let index_path = dist.join("index.html");
        let index = std::fs::read_to_string(&index_path)?;
        let index = index
            .replace("Loading configurator", "Loading configurator (DEV)")
            .replace("<title>Scooter Configurator", "<title>[DEV] Scooter Configurator");
        std::fs::write(&index_path, index)?;
    }

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Create zip for itch.io
fn package_itch() -> Result<()> {
    // First build web
    build_web(false)?;

    let root = project_root();
    let dist = root.join("dist");
    let zip_name = format!("{}-itch.zip", APP_NAME);
    let zip_path = dist.join(&zip_name);

    // Remove old zip if exists
    if zip_path.exists() {
        std::fs::remove_file(&zip_path)?;
    }

    println!("Creating itch.io zip...");
    run_cmd(
        Command::new("zip")
            .current_dir(dist.join("web"))
            .arg("-r")
            .arg(format!("../{}", zip_name))
            .arg("."),
    )?;

    println!("itch.io package ready: dist/{}", zip_name);
    Ok(())
}

/// Write the part table for a model
fn extract_parts(glb: &Path, output: Option<&Path>) -> Result<()> {
    let gltf = gltf::Gltf::open(glb).with_context(|| format!("Failed to read {}", glb.display()))?;
    let table = parts::extract(&gltf)?;

    match output {
        Some(path) => {
            std::fs::write(path, &table).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Part table written: {}", path.display());
        }
        None => print!("{}", table),
    }
    Ok(())
}
