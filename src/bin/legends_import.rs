//! Provides the `legends-import` tool for inspecting entity assets.
//!
//! Usage: `legends-import <asset_root> <entity_file> [--config <file>]`
//!
//! Loads an entity from an unpacked resource pack, waits for every material
//! and texture, and prints a summary of the assembled model.
//! Set `RUST_LOG=debug` to trace each fetch.
//!
//! # Examples
//! ```text
//! legends-import ./resource_packs/legends entity/pig.entity.json
//! ```

use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use legends_import::config::PipelineConfig;
use legends_import::formats::entity::EntityNode;
use legends_import::formats::material::TextureSlot;
use legends_import::pipeline::{settle, EntityLoader};
use legends_import::source::DirectorySource;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <asset_root> <entity_file> [--config <file>]", args[0]);
        eprintln!("  Loads an entity and prints its geometry and materials.");
        eprintln!("  <entity_file> is relative to <asset_root>.");
        process::exit(1);
    }

    let root = PathBuf::from(&args[1]);
    let entity_path = args[2].clone();

    if !root.is_dir() {
        eprintln!("Error: asset root not found: {}", root.display());
        process::exit(1);
    }

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let Some(path) = args.get(i + 1) else {
                eprintln!("Error: --config needs a file argument");
                process::exit(1);
            };
            match PipelineConfig::from_path(Path::new(path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: failed to read config {path}: {e}");
                    process::exit(1);
                }
            }
        }
        None => PipelineConfig::default(),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            process::exit(1);
        }
    };

    let local = tokio::task::LocalSet::new();
    let failed = local.block_on(&runtime, async move {
        let loader = EntityLoader::new(Rc::new(DirectorySource::new(root)), config);
        let node = match loader.load(&entity_path).await {
            Ok(node) => node,
            Err(e) => {
                eprintln!("Error: failed to load {entity_path}: {e}");
                return true;
            }
        };
        print_summary(&node).await
    });

    if failed {
        process::exit(1);
    }
}

/// Prints the model summary. Returns whether any material failed.
async fn print_summary(node: &EntityNode) -> bool {
    let geometry = &node.model.geometry;
    println!("{}", node.name());
    println!(
        "  {} vertices, {} triangles, skinned: {}",
        geometry.vertices.vertex_count(),
        geometry.vertices.index_count() / 3,
        geometry.skin.is_some()
    );

    for group in &geometry.groups {
        let key = geometry
            .material_of(group)
            .map_or("<none>", |key| key.as_str());
        println!("  group {}..{} -> {}", group.start, group.end(), key);
    }

    let mut failed = false;
    for (key, result) in geometry.materials.iter().zip(settle(&node.model).await) {
        match result {
            Ok(material) => {
                let slots: Vec<&str> = material
                    .bound_slots()
                    .iter()
                    .map(TextureSlot::descriptor_key)
                    .collect();
                let tiling = material.tiling();
                println!(
                    "  material {key} [{}]: textures {:?}, tiling {}x{}",
                    material.base_variant(),
                    slots,
                    tiling.x,
                    tiling.y
                );
            }
            Err(e) => {
                eprintln!("  material {key}: {e}");
                failed = true;
            }
        }
    }
    failed
}
