//! Pit shafts between a buried chest and the surface
//!
//! Generation runs in phases: validate heights, relocate the spawn out of a
//! cavern, lay the base above the chest, build the shaft body from the
//! palette (with the variant's overlay), then dress the surface entrance.
//! Variants only swap the layer builders and overlays used by these phases.

use std::fmt;
use std::str::FromStr;

use delve_blocks::{BlockId, BlockState};
use glam::IVec3;

use crate::config::{PitParams, ProximityParams};
use crate::error::GenError;
use crate::generator::{ChestGeneratorData, GenContext};
use crate::palette::WeightedPalette;
use crate::structure::place_proximity_spawner;
use crate::world::{WorldMutAccess, WorldRng};

use super::layers::{
    auto_correct_index, build_circle_layer, build_layer, build_log_layer, build_ring, build_square_layer,
};

/// Shaft styles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PitVariant {
    /// Mostly air shaft
    Air,
    /// Standard shaft with a TNT trap halfway up
    TntTrap,
    /// Wide air chamber with two proximity spawners flanking the chest
    MobTrap,
    /// Lava-floored chamber that tapers into a standard shaft
    Volcano,
    /// 5x5 collapsed shaft
    Wide,
    /// Short shaft for shallow spawns
    SimpleShort,
}

impl PitVariant {
    pub const ALL: [PitVariant; 6] = [
        PitVariant::Air,
        PitVariant::TntTrap,
        PitVariant::MobTrap,
        PitVariant::Volcano,
        PitVariant::Wide,
        PitVariant::SimpleShort,
    ];

    fn name(self) -> &'static str {
        match self {
            PitVariant::Air => "air",
            PitVariant::TntTrap => "tnt",
            PitVariant::MobTrap => "mob_trap",
            PitVariant::Volcano => "volcano",
            PitVariant::Wide => "wide",
            PitVariant::SimpleShort => "simple_short",
        }
    }
}

impl fmt::Display for PitVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|v| v.name()).collect();
                format!("unknown pit variant '{}' (expected one of {})", s, names.join(", "))
            })
    }
}

/// Minimum surface-to-spawn distance of the short pit (two levels of shaft)
const SHORT_PIT_MIN_DISTANCE: i32 = 4;

/// Default shaft material weights
pub fn standard_palette() -> WeightedPalette<u16> {
    WeightedPalette::new()
        .with(50, BlockId::AIR)
        .with(25, BlockId::SAND)
        .with(15, BlockId::COBBLESTONE)
        .with(15, BlockId::GRAVEL)
        .with(10, BlockId::OAK_LOG)
}

pub struct PitGenerator {
    variant: PitVariant,
    params: PitParams,
    palette: WeightedPalette<u16>,
}

impl PitGenerator {
    pub fn new(variant: PitVariant, params: PitParams) -> Self {
        let mut palette = standard_palette();
        if variant == PitVariant::Air {
            palette.add(50, BlockId::AIR);
        }
        Self {
            variant,
            params,
            palette,
        }
    }

    /// Replace the shaft material weights
    pub fn with_palette(mut self, palette: WeightedPalette<u16>) -> Self {
        self.palette = palette;
        self
    }

    pub fn variant(&self) -> PitVariant {
        self.variant
    }

    pub fn palette(&self) -> &WeightedPalette<u16> {
        &self.palette
    }

    /// Minimum surface-to-spawn distance this variant builds at
    pub fn min_surface_to_spawn_distance(&self) -> i32 {
        match self.variant {
            PitVariant::Volcano => self.params.volcano.min_distance,
            PitVariant::MobTrap | PitVariant::SimpleShort => SHORT_PIT_MIN_DISTANCE,
            _ => self.params.min_surface_to_spawn_distance,
        }
    }

    /// Build a pit from `spawn` (chest position) up to `surface`
    ///
    /// Returns where the chest goes, or None when the site is unusable.
    pub fn generate(
        &self,
        ctx: &mut GenContext<'_>,
        surface: IVec3,
        spawn: IVec3,
    ) -> Option<ChestGeneratorData> {
        match self.try_generate(ctx, surface, spawn) {
            Ok(data) => {
                log::debug!("Generated {} pit at {}", self.variant, data.spawn_coords);
                Some(data)
            }
            Err(e) => {
                log::debug!("{} pit at {} failed: {}", self.variant, spawn, e);
                None
            }
        }
    }

    pub fn try_generate(
        &self,
        ctx: &mut GenContext<'_>,
        surface: IVec3,
        spawn: IVec3,
    ) -> Result<ChestGeneratorData, GenError> {
        for y in [surface.y, spawn.y] {
            if !ctx.world.is_height_valid(y) {
                return Err(GenError::InvalidHeight(y));
            }
        }

        let spawn = self.relocate_from_cavern(ctx.world, spawn)?;

        match self.variant {
            PitVariant::MobTrap => self.generate_mob_trap(ctx, surface, spawn),
            PitVariant::SimpleShort => self.generate_simple_short(ctx, surface, spawn),
            _ => self.generate_standard(ctx, surface, spawn),
        }
    }

    /// Move the spawn up to the ceiling when it sits in an open cavern
    fn relocate_from_cavern(&self, world: &dyn WorldMutAccess, spawn: IVec3) -> Result<IVec3, GenError> {
        let above = spawn + IVec3::Y;
        if !world.is_air(above) {
            return Ok(spawn);
        }

        log::debug!("Spawn {} is in a cavern, looking for the ceiling", spawn);
        let limit = self.params.cavern_search_limit;
        let mut pos = above;
        for _ in 0..limit {
            if !world.is_height_valid(pos.y) {
                break;
            }
            if !world.is_air(pos) {
                return Ok(pos + IVec3::Y);
            }
            pos += IVec3::Y;
        }
        Err(GenError::CavernCeilingNotFound { from: above, limit })
    }

    fn check_clearance(&self, surface: IVec3, spawn: IVec3) -> Result<(), GenError> {
        let available = surface.y - spawn.y;
        let required = self.min_surface_to_spawn_distance();
        if available < required {
            return Err(GenError::InsufficientClearance { available, required });
        }
        Ok(())
    }

    fn generate_standard(
        &self,
        ctx: &mut GenContext<'_>,
        surface: IVec3,
        spawn: IVec3,
    ) -> Result<ChestGeneratorData, GenError> {
        self.check_clearance(surface, spawn)?;

        if self.variant == PitVariant::Volcano {
            let next = self.build_volcano_chamber(ctx.world, ctx.rng, surface, spawn);
            self.build_shaft(ctx.world, ctx.rng, surface, spawn, next.y);
        } else {
            self.build_above_chest_layers(ctx.world, spawn);
            self.build_shaft(ctx.world, ctx.rng, surface, spawn, spawn.y + self.params.offset_y);
        }
        self.build_entrance(ctx.world, surface, spawn);

        Ok(ChestGeneratorData::at(spawn))
    }

    /// Air above the chest, a log ring and a sand plug
    fn build_above_chest_layers(&self, world: &mut dyn WorldMutAccess, spawn: IVec3) {
        build_layer(world, spawn + IVec3::Y, BlockState::AIR);
        build_log_layer(world, spawn + IVec3::new(0, 2, 0), BlockState::new(BlockId::OAK_LOG));
        build_layer(world, spawn + IVec3::new(0, 3, 0), BlockState::new(BlockId::SAND));
    }

    /// Log rings around a sand plug just below the surface
    fn build_entrance(&self, world: &mut dyn WorldMutAccess, surface: IVec3, spawn: IVec3) {
        let column = IVec3::new(spawn.x, surface.y, spawn.z);
        let log = BlockState::new(BlockId::OAK_LOG);
        build_log_layer(world, column - IVec3::new(0, 5, 0), log);
        build_layer(world, column - IVec3::new(0, 4, 0), BlockState::new(BlockId::SAND));
        build_log_layer(world, column - IVec3::new(0, 3, 0), log);
    }

    /// Shaft body from `start_y` up to `surface - surface_offset_y`
    fn build_shaft(
        &self,
        world: &mut dyn WorldMutAccess,
        rng: &mut dyn WorldRng,
        surface: IVec3,
        spawn: IVec3,
        start_y: i32,
    ) {
        let end_y = surface.y - self.params.surface_offset_y;
        let mid_y = (surface.y + spawn.y) / 2;
        let trap_fits = surface.y - mid_y > self.params.tnt_min_clearance && mid_y + 3 <= end_y;

        let mut y = start_y;
        while y <= end_y {
            let pos = IVec3::new(spawn.x, y, spawn.z);
            if world.is_air(pos) {
                y += 1;
                continue;
            }

            let next = if self.variant == PitVariant::TntTrap && y == mid_y && trap_fits {
                build_tnt_trap(world, pos)
            } else {
                let Some(&token) = self.palette.next(rng) else {
                    break;
                };
                let state = BlockState::new(token);
                match self.variant {
                    PitVariant::Wide => build_square_layer(world, pos, state, -2, 5),
                    _ if world.blocks().is_log(token) => build_log_layer(world, pos, state),
                    _ => build_layer(world, pos, state),
                }
            };

            y = auto_correct_index(y, next, pos + IVec3::Y) + 1;
        }
    }

    /// Lava floor, decorated chamber and tapering neck
    ///
    /// Returns the position above the log cap, where the shaft continues.
    fn build_volcano_chamber(
        &self,
        world: &mut dyn WorldMutAccess,
        rng: &mut dyn WorldRng,
        surface: IVec3,
        spawn: IVec3,
    ) -> IVec3 {
        let params = &self.params.volcano;
        let mut radius = rng.gen_range_i32(params.min_radius, params.max_radius);
        // The cap must stay below the entrance dressing
        let shaft_start =
            (spawn.y + (surface.y - spawn.y) / 3 * 2).min(surface.y - self.params.surface_offset_y);
        log::debug!("Volcano chamber radius {} up to y {}", radius, shaft_start);

        let floor = spawn - IVec3::Y;
        build_circle_layer(world, floor, radius, BlockState::new(BlockId::LAVA), None);
        world.replace_with_block(floor, BlockState::new(BlockId::STONE));

        let mut next = spawn;
        while next.y < shaft_start - 4 {
            next = build_circle_layer(world, next, radius, BlockState::AIR, Some((&mut *rng, params)));
        }
        while next.y < shaft_start && radius > 1 {
            next = build_circle_layer(world, next, radius, BlockState::AIR, None);
            radius -= 1;
        }
        build_log_layer(world, next, BlockState::new(BlockId::OAK_LOG))
    }

    /// Wide air chamber with flanking proximity spawners, then a standard shaft
    fn generate_mob_trap(
        &self,
        ctx: &mut GenContext<'_>,
        surface: IVec3,
        spawn: IVec3,
    ) -> Result<ChestGeneratorData, GenError> {
        let clearance = surface.y - spawn.y - 2;
        if clearance < 2 {
            return Err(GenError::InsufficientClearance {
                available: surface.y - spawn.y,
                required: SHORT_PIT_MIN_DISTANCE,
            });
        }
        if clearance <= 6 {
            log::debug!("Mob trap at {} too shallow, building a short pit", spawn);
            return self.generate_simple_short(ctx, surface, spawn);
        }

        let mut next = spawn;
        for _ in 0..3 {
            next = build_square_layer(ctx.world, next, BlockState::AIR, -2, 6);
        }
        next = build_log_layer(ctx.world, next, BlockState::new(BlockId::OAK_LOG));
        next = build_layer(ctx.world, next, BlockState::new(BlockId::SAND));
        self.build_entrance(ctx.world, surface, spawn);

        let trap = &self.params.mob_trap;
        for (dx, proximity) in [(-1, trap.west_proximity), (1, trap.east_proximity)] {
            let mob = ctx.mobs.random_dungeon_mob(ctx.rng);
            let params = ProximityParams {
                min_mobs: trap.min_mobs,
                max_mobs: trap.max_mobs,
                proximity,
            };
            place_proximity_spawner(ctx.world, spawn + IVec3::new(dx, 0, 0), mob, &params)?;
        }

        self.build_shaft(ctx.world, ctx.rng, surface, spawn, next.y);
        Ok(ChestGeneratorData::at(spawn))
    }

    /// Air above the chest, a log cap and palette blocks up to just below the surface
    fn generate_simple_short(
        &self,
        ctx: &mut GenContext<'_>,
        surface: IVec3,
        spawn: IVec3,
    ) -> Result<ChestGeneratorData, GenError> {
        self.check_clearance(surface, spawn)?;

        build_layer(ctx.world, spawn + IVec3::Y, BlockState::AIR);
        build_log_layer(ctx.world, spawn + IVec3::new(0, 2, 0), BlockState::new(BlockId::OAK_LOG));

        for y in spawn.y + 3..surface.y {
            let pos = IVec3::new(spawn.x, y, spawn.z);
            if ctx.world.is_air(pos) {
                continue;
            }
            if let Some(&token) = self.palette.next(ctx.rng) {
                build_layer(ctx.world, pos, BlockState::new(token));
            }
        }

        Ok(ChestGeneratorData::at(spawn))
    }
}

/// Log ring, 2x2 TNT, log ring, 2x2 pressure plates
///
/// Returns the position above the plates.
fn build_tnt_trap(world: &mut dyn WorldMutAccess, pos: IVec3) -> IVec3 {
    let log = BlockState::new(BlockId::OAK_LOG);
    let next = build_log_layer(world, pos, log);
    build_ring(world, next, BlockState::new(BlockId::TNT));
    let next = build_log_layer(world, next + IVec3::Y, log);
    build_ring(world, next, BlockState::new(BlockId::OAK_PRESSURE_PLATE));
    log::debug!("Built TNT trap at {}", pos);
    next + IVec3::Y
}
