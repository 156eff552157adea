mod config;
mod section;

use std::path::{Path, PathBuf};

use clap::Parser;
use delve_blocks::{BlockId, BlockState};
use delve_core::structure::{StructureType, TemplateTier};
use delve_core::world::TerrainGenerator;
use delve_core::{
    DungeonMobs, GenContext, PitGenerator, PitVariant, StructureGenerator, StructureSite, TemplateRegistry,
    VoxelWorld,
};
use glam::IVec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::CliConfig;

/// Chest depth below the pit surface when `--spawn-y` is not given
const DEFAULT_DEPTH: i32 = 24;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World and generation seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Pit variant: air, tnt, mob_trap, volcano, wide, simple_short
    #[arg(long)]
    pit: Option<PitVariant>,

    /// Structure to place over the pit: ruin, marker
    #[arg(long)]
    structure: Option<StructureSite>,

    /// Built-in blueprint directory
    #[arg(long, default_value = "assets/templates")]
    templates: PathBuf,

    /// Override blueprint directory (shadows built-ins with the same identity)
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Biome used for template access lists
    #[arg(long)]
    biome: Option<String>,

    /// Target column x
    #[arg(long, default_value = "0")]
    x: i32,

    /// Target column z
    #[arg(long, default_value = "0")]
    z: i32,

    /// Pit surface y (default: terrain surface, or the structure entrance)
    #[arg(long)]
    surface_y: Option<i32>,

    /// Chest y (default: 24 blocks below the pit surface)
    #[arg(long)]
    spawn_y: Option<i32>,

    /// List registered templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Extra config file (RON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = CliConfig::load(args.config.as_deref())?;

    let registry = load_registry(&args, &config)?;

    // Handle --list-templates flag
    if args.list_templates {
        list_templates(&registry);
        return Ok(());
    }

    if args.pit.is_none() && args.structure.is_none() {
        eprintln!("Error: nothing to generate, pass --pit and/or --structure");
        std::process::exit(1);
    }

    let generation = &config.generation;
    let radius = config.world.radius;
    log::info!("Generating terrain (seed {}, radius {})", args.seed, radius);
    let mut world = VoxelWorld::new(config.world.min_height, config.world.max_height);
    TerrainGenerator::new(args.seed, &generation.terrain).fill(
        &mut world,
        args.x - radius,
        args.z - radius,
        args.x + radius,
        args.z + radius,
    );

    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    let mobs = DungeonMobs::default();
    let mut ctx = GenContext::new(&mut world, &mut rng, &mobs);

    let mut surface = ctx.world.surface_pos(args.x, args.z);
    log::info!("Surface at {}", surface);

    if let Some(site) = args.structure {
        let generator = StructureGenerator::from_config(generation);
        let target = IVec3::new(args.x, 0, args.z);
        match generator.generate(&mut ctx, &registry, site, target, args.biome.as_deref()) {
            Some(data) => {
                println!(
                    "Placed {} at {} ({}, footprint {} size {})",
                    data.identity, data.spawn_coords, data.rotation, data.footprint_origin, data.rotated_size
                );
                if let Some(chest) = data.chest_coords() {
                    println!("  structure chest at {}", chest);
                }
                println!("  {} markers", data.markers.total());
                surface = data.spawn_coords;
            }
            None => println!("No {} could be placed at ({}, {})", site, args.x, args.z),
        }
    }

    if let Some(y) = args.surface_y {
        surface.y = y;
    }
    let spawn = IVec3::new(args.x, args.spawn_y.unwrap_or(surface.y - DEFAULT_DEPTH), args.z);

    let mut chest = None;
    if let Some(variant) = args.pit {
        let generator = PitGenerator::new(variant, generation.pit.clone());
        match generator.generate(&mut ctx, surface, spawn) {
            Some(data) => {
                let state = data.chest_state.unwrap_or(BlockState::new(BlockId::CHEST));
                ctx.world.set_block(data.chest_coords, state);
                println!("Built {} pit, chest at {}", variant, data.chest_coords);
                chest = Some(data.chest_coords);
            }
            None => println!(
                "No {} pit fits between {} and y {} (needs {} blocks)",
                variant,
                surface,
                spawn.y,
                generator.min_surface_to_spawn_distance()
            ),
        }
    }

    let bottom = chest.map_or(spawn.y, |c| c.y) - 3;
    println!();
    print!(
        "{}",
        section::render_x_slice(&world, args.z, args.x - 12, args.x + 12, bottom, surface.y + 8)
    );

    Ok(())
}

fn load_registry(args: &Args, config: &CliConfig) -> anyhow::Result<TemplateRegistry> {
    let mut registry = TemplateRegistry::new();
    load_tier(&mut registry, &args.templates, TemplateTier::BuiltIn)?;
    if let Some(overrides) = &args.overrides {
        load_tier(&mut registry, overrides, TemplateTier::Override)?;
    }
    registry.register_access_lists(&config.generation.metas);
    Ok(registry)
}

fn load_tier(registry: &mut TemplateRegistry, dir: &Path, tier: TemplateTier) -> anyhow::Result<()> {
    if !dir.is_dir() {
        log::warn!("Template directory {} not found, skipping", dir.display());
        return Ok(());
    }
    registry.load_dir(dir, tier)?;
    Ok(())
}

fn list_templates(registry: &TemplateRegistry) {
    println!("{} templates:", registry.len());
    for kind in StructureType::ALL {
        for holder in registry.lookup_by_type(kind) {
            let size = holder.template.size();
            let tags = if holder.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", holder.tags.join(", "))
            };
            println!(
                "  {:<40} {}/{} {}x{}x{}{}",
                holder.identity, holder.category, kind, size.x, size.y, size.z, tags
            );
        }
    }
}
