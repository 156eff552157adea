//! Structure generation: select, place, validate, stamp and wire up a template

use std::fmt;
use std::str::FromStr;

use glam::IVec3;

use crate::config::{GenConfig, SiteParams, SpawnerParams, StructureParams};
use crate::error::GenError;
use crate::generator::{GenContext, TemplateGeneratorData};

use super::markers::{MarkerKind, MarkerMap, MarkerProcessor};
use super::placement::{target_from_anchor, Placement};
use super::registry::TemplateRegistry;
use super::rotation::Rotation;
use super::stamp::{fill_below, stamp};

/// Structure placement presets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructureSite {
    /// Ruin above a treasure pit: strict ground checks, chest required
    SurfaceRuin,
    /// Small surface marker, any rotation
    SurfaceMarker,
}

impl StructureSite {
    pub const ALL: [StructureSite; 2] = [StructureSite::SurfaceRuin, StructureSite::SurfaceMarker];
}

impl fmt::Display for StructureSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureSite::SurfaceRuin => f.write_str("ruin"),
            StructureSite::SurfaceMarker => f.write_str("marker"),
        }
    }
}

impl FromStr for StructureSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|site| site.to_string() == s)
            .ok_or_else(|| format!("unknown structure site '{}' (expected ruin or marker)", s))
    }
}

pub struct StructureGenerator {
    structures: StructureParams,
    spawners: SpawnerParams,
}

impl StructureGenerator {
    pub fn new(structures: StructureParams, spawners: SpawnerParams) -> Self {
        Self { structures, spawners }
    }

    pub fn from_config(config: &GenConfig) -> Self {
        Self::new(config.structures.clone(), config.spawners.clone())
    }

    pub fn site_params(&self, site: StructureSite) -> &SiteParams {
        match site {
            StructureSite::SurfaceRuin => &self.structures.ruin,
            StructureSite::SurfaceMarker => &self.structures.marker,
        }
    }

    /// Generate a structure whose entrance lines up with `target`
    ///
    /// # Arguments
    /// * `ctx` - World, random source and mob source
    /// * `registry` - Templates to choose from
    /// * `site` - Placement preset
    /// * `target` - Column the entrance should land on; y is taken from the surface
    /// * `biome` - Biome for whitelist/blacklist filtering (None = unfiltered)
    pub fn generate(
        &self,
        ctx: &mut GenContext<'_>,
        registry: &TemplateRegistry,
        site: StructureSite,
        target: IVec3,
        biome: Option<&str>,
    ) -> Option<TemplateGeneratorData> {
        match self.try_generate(ctx, registry, site, target, biome) {
            Ok(data) => {
                log::info!(
                    "Generated {} {} at {} ({})",
                    site,
                    data.identity,
                    data.spawn_coords,
                    data.rotation
                );
                Some(data)
            }
            Err(e) => {
                log::debug!("{} generation at {} failed: {}", site, target, e);
                None
            }
        }
    }

    pub fn try_generate(
        &self,
        ctx: &mut GenContext<'_>,
        registry: &TemplateRegistry,
        site: StructureSite,
        target: IVec3,
        biome: Option<&str>,
    ) -> Result<TemplateGeneratorData, GenError> {
        let params = self.site_params(site);

        let holder = registry
            .select(ctx.rng, params.category, params.kind, biome)
            .ok_or_else(|| GenError::MissingTemplate {
                category: params.category.to_string(),
                kind: params.kind.to_string(),
            })?;
        let template = &holder.template;

        let entrance = template
            .find_marker(ctx.rng, MarkerKind::Entrance)
            .ok_or_else(|| GenError::MissingMarker {
                identity: holder.identity.clone(),
                marker: MarkerKind::Entrance,
            })?;

        let rotation = if params.random_rotation {
            Rotation::random(ctx.rng)
        } else {
            Rotation::None
        };

        let surface = ctx.world.surface_pos(target.x, target.z);
        if !ctx.world.is_height_valid(surface.y) {
            return Err(GenError::InvalidHeight(surface.y));
        }

        let mut placement = Placement::resolve(surface, entrance, template.size(), rotation);
        let size = placement.rotated_size;

        // Solid ground beneath the footprint, sinking one block per failed attempt
        let mut attempt = 1;
        loop {
            let base = placement.footprint_origin - IVec3::Y;
            if ctx.world.is_solid_base(base, size.x, size.z, params.required_base) {
                break;
            }
            if attempt >= params.base_attempts {
                return Err(GenError::EnvironmentRejected {
                    pos: base,
                    reason: format!(
                        "less than {}% solid ground after {} attempts",
                        params.required_base, attempt
                    ),
                });
            }
            log::debug!("Not enough ground under {} at {}, lowering", holder.identity, base);
            placement = placement.lowered(1);
            attempt += 1;
        }

        // Air is measured on the final (possibly sunk) footprint layer, not the surface layer
        if let Some(required_air) = params.required_air {
            if !ctx
                .world
                .is_air_base(placement.footprint_origin, size.x, size.z, required_air)
            {
                return Err(GenError::EnvironmentRejected {
                    pos: placement.footprint_origin,
                    reason: format!("less than {}% air", required_air),
                });
            }
        }

        if let Some(meta) = registry.meta(&holder.identity) {
            placement.anchor += meta.offset;
            placement.footprint_origin += meta.offset;
        }

        let marker_map = if params.submerged {
            MarkerMap::water()
        } else {
            registry.marker_map().clone()
        };
        let placed = stamp(ctx.world, template, placement, &marker_map);

        if params.fill_below {
            fill_below(ctx.world, placement.footprint_origin, size);
        }

        let markers = MarkerProcessor::scan(&placed);
        let chest = MarkerProcessor::select_chest(&markers, ctx.rng);
        if chest.is_none() && params.chest_required {
            return Err(GenError::NoChest);
        }

        MarkerProcessor::build_vanilla_spawners(
            ctx.world,
            ctx.rng,
            ctx.mobs,
            markers.get(MarkerKind::Spawner),
            &self.spawners,
        )?;
        MarkerProcessor::build_proximity_spawners(
            ctx.world,
            ctx.rng,
            ctx.mobs,
            markers.get(MarkerKind::ProximitySpawner),
            &params.proximity,
            &self.spawners,
        )?;

        Ok(TemplateGeneratorData {
            identity: holder.identity.clone(),
            spawn_coords: target_from_anchor(placement.anchor, rotation.apply(entrance), rotation),
            footprint_origin: placement.footprint_origin,
            rotation,
            rotated_size: size,
            chest,
            markers,
        })
    }
}

impl Default for StructureGenerator {
    fn default() -> Self {
        Self::new(StructureParams::default(), SpawnerParams::default())
    }
}
