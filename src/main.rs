//! Relink command line wrapper.
//!
//! Works on scene description and material library JSON files:
//! - `capture` writes a snapshot of a scene's material assignments
//! - `restore` re-applies a snapshot onto another scene
//! - `pair` prints (and optionally applies) live source/target pairs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use relink::materials::MaterialLibrary;
use relink::relink::{NoopRecorder, RelinkPair};
use relink::scene::serialization::{load_scene_from_file, save_scene_to_file};
use relink::snapshot::load_snapshot_from_file;
use relink::{RelinkConfig, RestoreReport};

#[derive(Parser)]
#[command(name = "relink", version, about = "Carry material assignments between scene hierarchies")]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot every renderer and its materials.
    Capture {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Apply a snapshot onto a scene.
    Restore {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        library: PathBuf,
        /// Where to write the modified scene; overwrites `--scene` when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Pair renderers of two scenes for review.
    Pair {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
        /// Apply every proposed pair to the target.
        #[arg(long, requires = "library")]
        apply: bool,
        #[arg(long)]
        library: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RelinkConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RelinkConfig::default(),
    };

    match cli.command {
        Command::Capture { scene, out } => {
            let graph = load_scene_from_file(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            let snapshot = relink::relink::capture_to_file(&graph, &out, &config)
                .with_context(|| format!("writing snapshot {}", out.display()))?;
            println!("captured {} entries to {}", snapshot.entries.len(), out.display());
        }
        Command::Restore {
            snapshot,
            scene,
            library,
            out,
        } => {
            // Parse before touching anything so a bad document changes nothing.
            let snapshot_doc = load_snapshot_from_file(&snapshot)
                .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
            let mut graph = load_scene_from_file(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            let mut store = load_library(&library)?;

            let report = relink::restore(&snapshot_doc, &mut graph, &mut store, &mut NoopRecorder, &config);

            save_scene_to_file(&graph, out.as_deref().unwrap_or(scene.as_path()))?;
            store.save_to_file(&library)?;
            print_report(&report);
        }
        Command::Pair {
            source,
            target,
            apply,
            library,
            out,
        } => {
            let source_graph = load_scene_from_file(&source)
                .with_context(|| format!("loading scene {}", source.display()))?;
            let mut target_graph = load_scene_from_file(&target)
                .with_context(|| format!("loading scene {}", target.display()))?;

            let pairs = relink::build_pairs(&source_graph, &target_graph, &config);
            print_pairs(&pairs);

            if let (true, Some(library)) = (apply, library) {
                let mut store = load_library(&library)?;
                let report = relink::apply_pairs(&pairs, &mut target_graph, &mut store, &mut NoopRecorder, &config);
                save_scene_to_file(&target_graph, out.as_deref().unwrap_or(target.as_path()))?;
                store.save_to_file(&library)?;
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn load_library(path: &Path) -> Result<MaterialLibrary> {
    if path.exists() {
        MaterialLibrary::load_from_file(path)
            .with_context(|| format!("loading material library {}", path.display()))
    } else {
        log::info!("Material library {} not found, starting empty", path.display());
        Ok(MaterialLibrary::new())
    }
}

fn print_pairs(pairs: &[RelinkPair]) {
    for pair in pairs {
        let target = pair
            .target
            .as_ref()
            .map(|target| target.path_string())
            .unwrap_or_else(|| "-".to_string());
        let reason = pair
            .reason
            .map(|reason| format!("{:?}", reason))
            .unwrap_or_default();
        println!("{:<48} -> {:<48} {}", pair.source.path_string(), target, reason);
    }
}

fn print_report(report: &RestoreReport) {
    println!(
        "matched: {}  slots written: {}  unmatched: {}",
        report.matched, report.slots_written, report.unmatched
    );
    if report.ambiguous > 0 || report.failed_slots > 0 || report.failed_elements > 0 {
        println!(
            "ambiguous: {}  failed slots: {}  failed elements: {}",
            report.ambiguous, report.failed_slots, report.failed_elements
        );
    }
}
