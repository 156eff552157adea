//! Blueprint templates: immutable voxel prefabs with marker tables
//!
//! Blueprint files are RON documents. Layers are listed bottom-up, each layer
//! is a list of rows along +Z, and each character of a row is one block along
//! +X. A space is structure void (nothing placed) unless the palette maps it.
//!
//! ```ron
//! (
//!     palette: {
//!         '#': (block: "cobblestone"),
//!         'C': (block: "chest", facing: Some(South)),
//!         'G': (block: "gold_block"),
//!     },
//!     layers: [
//!         ["###", "#G#", "###"],
//!         ["# #", " C ", "# #"],
//!     ],
//! )
//! ```

use std::collections::BTreeMap;

use ahash::AHashMap;
use delve_blocks::{BlockState, Blocks, Facing};
use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::world::WorldRng;

use super::markers::{MarkerKind, MarkerMap, ReplacementMap};
use super::placement::Placement;

/// Palette entry of a blueprint file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDef {
    pub block: String,
    #[serde(default)]
    pub facing: Option<Facing>,
}

/// On-disk blueprint representation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintFile {
    #[serde(default)]
    pub palette: BTreeMap<char, PaletteDef>,
    /// Bottom-up layers of rows
    pub layers: Vec<Vec<String>>,
}

/// A marker recorded at load time, in template-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMarker {
    pub pos: IVec3,
    pub state: BlockState,
}

/// Immutable voxel blueprint
#[derive(Debug, Clone)]
pub struct BlueprintTemplate {
    size: IVec3,
    /// Sparse block list in template-local coordinates (void cells omitted)
    blocks: Vec<(IVec3, BlockState)>,
    markers: AHashMap<MarkerKind, Vec<LocalMarker>>,
}

impl BlueprintTemplate {
    /// Build a template from a sparse block list, applying replacements and recording markers
    pub fn from_blocks(
        size: IVec3,
        blocks: Vec<(IVec3, BlockState)>,
        marker_map: &MarkerMap,
        replacements: &ReplacementMap,
    ) -> Self {
        let mut markers: AHashMap<MarkerKind, Vec<LocalMarker>> = AHashMap::new();
        let blocks: Vec<(IVec3, BlockState)> = blocks
            .into_iter()
            .map(|(pos, state)| {
                let state = replacements.apply(state);
                if let Some(kind) = marker_map.kind_for(state.block_id) {
                    markers
                        .entry(kind)
                        .or_default()
                        .push(LocalMarker { pos, state });
                }
                (pos, state)
            })
            .collect();

        Self {
            size,
            blocks,
            markers,
        }
    }

    /// Parse a RON blueprint
    pub fn from_ron_str(
        source: &str,
        blocks: &Blocks,
        marker_map: &MarkerMap,
        replacements: &ReplacementMap,
    ) -> Result<Self, RegistryError> {
        let file: BlueprintFile = ron::from_str(source)?;
        Self::from_file(&file, blocks, marker_map, replacements)
    }

    /// Resolve a parsed blueprint file against the block registry
    pub fn from_file(
        file: &BlueprintFile,
        registry: &Blocks,
        marker_map: &MarkerMap,
        replacements: &ReplacementMap,
    ) -> Result<Self, RegistryError> {
        if file.layers.is_empty() {
            return Err(RegistryError::EmptyBlueprint);
        }

        let mut states: BTreeMap<char, BlockState> = BTreeMap::new();
        for (glyph, def) in &file.palette {
            let block_id = registry
                .by_name(&def.block)
                .ok_or_else(|| RegistryError::UnknownBlock(def.block.clone()))?;
            states.insert(
                *glyph,
                BlockState {
                    block_id,
                    facing: def.facing,
                },
            );
        }

        let mut size = IVec3::new(0, file.layers.len() as i32, 0);
        let mut blocks = Vec::new();
        for (y, layer) in file.layers.iter().enumerate() {
            size.z = size.z.max(layer.len() as i32);
            for (z, row) in layer.iter().enumerate() {
                size.x = size.x.max(row.chars().count() as i32);
                for (x, glyph) in row.chars().enumerate() {
                    let state = match states.get(&glyph) {
                        Some(state) => *state,
                        None if glyph == ' ' => continue,
                        None => return Err(RegistryError::UnknownGlyph(glyph)),
                    };
                    blocks.push((IVec3::new(x as i32, y as i32, z as i32), state));
                }
            }
        }

        if size.x == 0 || size.z == 0 {
            return Err(RegistryError::EmptyBlueprint);
        }

        Ok(Self::from_blocks(size, blocks, marker_map, replacements))
    }

    /// Unrotated bounding size
    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn blocks(&self) -> &[(IVec3, BlockState)] {
        &self.blocks
    }

    /// Markers of one kind (empty when absent)
    pub fn markers(&self, kind: MarkerKind) -> &[LocalMarker] {
        self.markers.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Random local position of a marker kind
    pub fn find_marker(&self, rng: &mut dyn WorldRng, kind: MarkerKind) -> Option<IVec3> {
        let markers = self.markers(kind);
        if markers.is_empty() {
            return None;
        }
        Some(markers[rng.gen_index(markers.len())].pos)
    }
}

/// A blueprint stamped into the world
#[derive(Debug, Clone, Copy)]
pub struct PlacedTemplate<'a> {
    pub template: &'a BlueprintTemplate,
    pub placement: Placement,
}

/// Fluent builder for blueprints defined in code
pub struct TemplateBuilder {
    size: IVec3,
    blocks: Vec<(IVec3, BlockState)>,
}

impl TemplateBuilder {
    pub fn new(size: IVec3) -> Self {
        Self {
            size,
            blocks: Vec::new(),
        }
    }

    /// Set a single block
    pub fn block(mut self, x: i32, y: i32, z: i32, state: impl Into<BlockState>) -> Self {
        let pos = IVec3::new(x, y, z);
        let state = state.into();
        self.blocks.retain(|(p, _)| *p != pos);
        self.blocks.push((pos, state));
        self
    }

    /// Fill the inclusive box `from..=to`
    pub fn fill(mut self, from: IVec3, to: IVec3, state: impl Into<BlockState>) -> Self {
        let state = state.into();
        let min = from.min(to);
        let max = from.max(to);
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self = self.block(x, y, z, state);
                }
            }
        }
        self
    }

    /// Fill one horizontal layer of the whole footprint
    pub fn layer(self, y: i32, state: impl Into<BlockState>) -> Self {
        let max = IVec3::new(self.size.x - 1, y, self.size.z - 1);
        self.fill(IVec3::new(0, y, 0), max, state)
    }

    pub fn build(self) -> BlueprintTemplate {
        self.build_with(&MarkerMap::standard(), &ReplacementMap::default())
    }

    pub fn build_with(self, marker_map: &MarkerMap, replacements: &ReplacementMap) -> BlueprintTemplate {
        BlueprintTemplate::from_blocks(self.size, self.blocks, marker_map, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_blocks::BlockId;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    const HUT: &str = r####"(
        palette: {
            '#': (block: "cobblestone"),
            'G': (block: "gold_block"),
            'C': (block: "chest", facing: Some(South)),
            'E': (block: "ender_chest"),
            'w': (block: "white_wool"),
            'g': (block: "black_stained_glass"),
        },
        layers: [
            ["###", "#G#", "###"],
            ["#C#", "w g", "#E#"],
        ],
    )"####;

    fn load(source: &str) -> Result<BlueprintTemplate, RegistryError> {
        BlueprintTemplate::from_ron_str(
            source,
            &Blocks::new(),
            &MarkerMap::standard(),
            &ReplacementMap::default(),
        )
    }

    #[test]
    fn test_parse_blueprint() {
        let template = load(HUT).unwrap();
        assert_eq!(template.size(), IVec3::new(3, 2, 3));

        // 9 + 8 cells, one space is void
        assert_eq!(template.blocks().len(), 17);
    }

    #[test]
    fn test_markers_recorded_at_load() {
        let template = load(HUT).unwrap();

        assert_eq!(template.markers(MarkerKind::Entrance)[0].pos, IVec3::new(1, 0, 1));
        assert_eq!(template.markers(MarkerKind::Chest)[0].pos, IVec3::new(1, 1, 0));
        assert_eq!(
            template.markers(MarkerKind::Chest)[0].state.facing,
            Some(Facing::South)
        );
        assert_eq!(template.markers(MarkerKind::BossChest).len(), 1);
        assert!(template.markers(MarkerKind::ProximitySpawner).is_empty());
    }

    #[test]
    fn test_replacements_applied_at_load() {
        let template = load(HUT).unwrap();

        let at = |pos: IVec3| {
            template
                .blocks()
                .iter()
                .find(|(p, _)| *p == pos)
                .map(|(_, s)| s.block_id)
        };
        assert_eq!(at(IVec3::new(0, 1, 1)), Some(BlockId::AIR));
        assert_eq!(at(IVec3::new(2, 1, 1)), Some(BlockId::SPAWNER));

        // Replaced glass becomes a spawner marker
        assert_eq!(template.markers(MarkerKind::Spawner)[0].pos, IVec3::new(2, 1, 1));
    }

    #[test]
    fn test_find_marker() {
        let template = load(HUT).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        assert_eq!(
            template.find_marker(&mut rng, MarkerKind::Entrance),
            Some(IVec3::new(1, 0, 1))
        );
        assert_eq!(template.find_marker(&mut rng, MarkerKind::Offset), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            load("(layers: [])"),
            Err(RegistryError::EmptyBlueprint)
        ));
        assert!(matches!(
            load(r#"(palette: {'x': (block: "mithril")}, layers: [["x"]])"#),
            Err(RegistryError::UnknownBlock(name)) if name == "mithril"
        ));
        assert!(matches!(
            load(r#"(layers: [["?"]])"#),
            Err(RegistryError::UnknownGlyph('?'))
        ));
        assert!(matches!(load("not ron"), Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_builder() {
        let template = TemplateBuilder::new(IVec3::new(4, 2, 4))
            .layer(0, BlockId::STONE_BRICKS)
            .block(1, 0, 1, BlockId::GOLD_BLOCK)
            .block(3, 1, 3, BlockId::CHEST)
            .build();

        assert_eq!(template.blocks().len(), 17);
        assert_eq!(template.markers(MarkerKind::Entrance).len(), 1);
        assert_eq!(template.markers(MarkerKind::Chest)[0].pos, IVec3::new(3, 1, 3));
    }
}
