//! Template registry: every blueprint the generators can pick from
//!
//! Templates live in two tiers. Built-ins ship with the game; overrides come
//! from a user directory and supersede built-ins with the same identity.
//! Identities are paths below the template root without extension, e.g.
//! `terranean/ruin/mossy/crypt` (category, type, tags..., name).

use std::fmt;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use delve_blocks::Blocks;
use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::world::WorldRng;

use super::markers::{MarkerMap, ReplacementMap};
use super::template::BlueprintTemplate;

/// Where a structure is built
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureCategory {
    /// On the surface
    #[default]
    Terranean,
    /// Under water
    Subaqueous,
    /// Underground
    Subterranean,
}

impl StructureCategory {
    pub const ALL: [StructureCategory; 3] = [
        StructureCategory::Terranean,
        StructureCategory::Subaqueous,
        StructureCategory::Subterranean,
    ];

    pub fn token(self) -> &'static str {
        match self {
            StructureCategory::Terranean => "terranean",
            StructureCategory::Subaqueous => "subaqueous",
            StructureCategory::Subterranean => "subterranean",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

impl fmt::Display for StructureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// What kind of structure a template is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    #[default]
    Ruin,
    Marker,
    Room,
    Dungeon,
    Village,
    Well,
}

impl StructureType {
    pub const ALL: [StructureType; 6] = [
        StructureType::Ruin,
        StructureType::Marker,
        StructureType::Room,
        StructureType::Dungeon,
        StructureType::Village,
        StructureType::Well,
    ];

    pub fn token(self) -> &'static str {
        match self {
            StructureType::Ruin => "ruin",
            StructureType::Marker => "marker",
            StructureType::Room => "room",
            StructureType::Dungeon => "dungeon",
            StructureType::Village => "village",
            StructureType::Well => "well",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Per-template metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructMeta {
    /// Template identity (`category/type/.../name`)
    pub name: String,
    /// Added to the stamp anchor
    pub offset: IVec3,
    /// Biomes the template is limited to (empty = any)
    pub biome_whitelist: Vec<String>,
    /// Biomes the template never appears in
    pub biome_blacklist: Vec<String>,
    pub min_depth: Option<i32>,
    pub max_depth: Option<i32>,
}

/// A registered blueprint with its identity and classification
#[derive(Debug, Clone)]
pub struct TemplateHolder {
    pub identity: String,
    pub tags: Vec<String>,
    pub category: StructureCategory,
    pub kind: StructureType,
    pub template: BlueprintTemplate,
}

impl TemplateHolder {
    pub fn new(
        identity: impl Into<String>,
        category: StructureCategory,
        kind: StructureType,
        template: BlueprintTemplate,
    ) -> Self {
        Self {
            identity: identity.into(),
            tags: Vec::new(),
            category,
            kind,
            template,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Registry tier a template is loaded into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateTier {
    BuiltIn,
    Override,
}

/// Outcome of a directory load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// One tier: holders by identity plus a (category, type) index in registration order
#[derive(Debug, Default)]
struct TemplateTable {
    holders: AHashMap<String, TemplateHolder>,
    index: AHashMap<(StructureCategory, StructureType), Vec<String>>,
}

impl TemplateTable {
    fn insert(&mut self, holder: TemplateHolder) {
        if let Some(previous) = self.holders.get(&holder.identity) {
            if let Some(ids) = self.index.get_mut(&(previous.category, previous.kind)) {
                ids.retain(|id| *id != holder.identity);
            }
        }
        self.index
            .entry((holder.category, holder.kind))
            .or_default()
            .push(holder.identity.clone());
        self.holders.insert(holder.identity.clone(), holder);
    }

    fn get(&self, identity: &str) -> Option<&TemplateHolder> {
        self.holders.get(identity)
    }

    fn contains(&self, identity: &str) -> bool {
        self.holders.contains_key(identity)
    }

    fn by_kind(
        &self,
        category: StructureCategory,
        kind: StructureType,
    ) -> impl Iterator<Item = &TemplateHolder> + '_ {
        self.index
            .get(&(category, kind))
            .into_iter()
            .flatten()
            .filter_map(|id| self.holders.get(id))
    }

    fn len(&self) -> usize {
        self.holders.len()
    }

    fn clear(&mut self) {
        self.holders.clear();
        self.index.clear();
    }
}

/// Index of every blueprint template, built at world load
pub struct TemplateRegistry {
    builtin: TemplateTable,
    overrides: TemplateTable,
    /// (category, type, biome) -> identities never generated in that biome
    blacklist: AHashMap<(StructureCategory, StructureType, String), Vec<String>>,
    metas: AHashMap<String, StructMeta>,
    blocks: Blocks,
    marker_map: MarkerMap,
    replacements: ReplacementMap,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            builtin: TemplateTable::default(),
            overrides: TemplateTable::default(),
            blacklist: AHashMap::new(),
            metas: AHashMap::new(),
            blocks: Blocks::new(),
            marker_map: MarkerMap::standard(),
            replacements: ReplacementMap::default(),
        }
    }

    /// Use a different marker map for templates loaded from now on
    pub fn with_marker_map(mut self, marker_map: MarkerMap) -> Self {
        self.marker_map = marker_map;
        self
    }

    pub fn marker_map(&self) -> &MarkerMap {
        &self.marker_map
    }

    /// Register a built-in template; re-registering an identity replaces it
    pub fn register(&mut self, holder: TemplateHolder) {
        log::debug!("Registered {} as {}/{}", holder.identity, holder.category, holder.kind);
        self.builtin.insert(holder);
    }

    /// Register an override that shadows any built-in with the same identity
    pub fn register_override(&mut self, holder: TemplateHolder) {
        log::debug!("Registered override {}", holder.identity);
        self.overrides.insert(holder);
    }

    fn register_in(&mut self, tier: TemplateTier, holder: TemplateHolder) {
        match tier {
            TemplateTier::BuiltIn => self.register(holder),
            TemplateTier::Override => self.register_override(holder),
        }
    }

    /// All templates of a category and type, overrides replacing built-ins
    pub fn lookup(&self, category: StructureCategory, kind: StructureType) -> Vec<&TemplateHolder> {
        let overrides = &self.overrides;
        self.builtin
            .by_kind(category, kind)
            .filter(|holder| !overrides.contains(&holder.identity))
            .chain(overrides.by_kind(category, kind))
            .collect()
    }

    /// Templates allowed in `biome`: blacklist first, then the meta whitelist
    pub fn lookup_in_biome(
        &self,
        category: StructureCategory,
        kind: StructureType,
        biome: &str,
    ) -> Vec<&TemplateHolder> {
        let mut holders = self.lookup(category, kind);

        if let Some(banned) = self.blacklist.get(&(category, kind, biome.to_string())) {
            holders.retain(|holder| !banned.contains(&holder.identity));
        }

        holders.retain(|holder| match self.metas.get(&holder.identity) {
            Some(meta) if !meta.biome_whitelist.is_empty() => {
                meta.biome_whitelist.iter().any(|b| b == biome)
            }
            _ => true,
        });

        holders
    }

    /// Override tier first, then built-ins
    pub fn lookup_by_identity(&self, identity: &str) -> Option<&TemplateHolder> {
        self.overrides
            .get(identity)
            .or_else(|| self.builtin.get(identity))
    }

    /// Templates of a type across every category
    pub fn lookup_by_type(&self, kind: StructureType) -> Vec<&TemplateHolder> {
        StructureCategory::ALL
            .into_iter()
            .flat_map(|category| self.lookup(category, kind))
            .collect()
    }

    /// Pick one eligible template uniformly
    pub fn select(
        &self,
        rng: &mut dyn WorldRng,
        category: StructureCategory,
        kind: StructureType,
        biome: Option<&str>,
    ) -> Option<&TemplateHolder> {
        let holders = match biome {
            Some(biome) => self.lookup_in_biome(category, kind, biome),
            None => self.lookup(category, kind),
        };
        if holders.is_empty() {
            return None;
        }
        Some(holders[rng.gen_index(holders.len())])
    }

    /// Rebuild the biome blacklist index and the metadata table
    pub fn register_access_lists(&mut self, metas: &[StructMeta]) {
        self.clear_access_lists();

        for meta in metas {
            self.metas.insert(meta.name.clone(), meta.clone());

            let mut segments = meta.name.split('/');
            let category = segments.next().unwrap_or_default();
            let kind = segments.next().unwrap_or_default();
            let Some(category) = StructureCategory::from_token(category) else {
                log::warn!("Skipping access list for {}: unknown category '{}'", meta.name, category);
                continue;
            };
            let Some(kind) = StructureType::from_token(kind) else {
                log::warn!("Skipping access list for {}: unknown type '{}'", meta.name, kind);
                continue;
            };

            for biome in &meta.biome_blacklist {
                self.blacklist
                    .entry((category, kind, biome.clone()))
                    .or_default()
                    .push(meta.name.clone());
            }
        }

        log::info!(
            "Registered access lists for {} templates ({} blacklist entries)",
            self.metas.len(),
            self.blacklist.len()
        );
    }

    pub fn meta(&self, identity: &str) -> Option<&StructMeta> {
        self.metas.get(identity)
    }

    /// Parse and register one blueprint under `identity`
    pub fn load_str(&mut self, identity: &str, source: &str, tier: TemplateTier) -> Result<(), RegistryError> {
        let (category, kind, tags) = parse_identity(identity)?;
        let template = BlueprintTemplate::from_ron_str(source, &self.blocks, &self.marker_map, &self.replacements)?;
        let holder = TemplateHolder::new(identity, category, kind, template).with_tags(tags);
        self.register_in(tier, holder);
        Ok(())
    }

    /// Register every `.ron` blueprint below `root`
    ///
    /// Files with unknown category/type tokens or malformed contents are logged
    /// and skipped; only an unreadable root is an error.
    pub fn load_dir(&mut self, root: impl AsRef<Path>, tier: TemplateTier) -> Result<LoadReport, RegistryError> {
        let root = root.as_ref();
        let mut files = Vec::new();
        collect_ron_files(root, &mut files)?;
        files.sort();

        let mut report = LoadReport::default();
        for path in files {
            let identity = match identity_for(root, &path) {
                Some(identity) => identity,
                None => {
                    log::warn!("Skipping {}: not below {}", path.display(), root.display());
                    report.skipped += 1;
                    continue;
                }
            };

            let result = std::fs::read_to_string(&path)
                .map_err(|source| RegistryError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|source| self.load_str(&identity, &source, tier));

            match result {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded {} templates from {} ({} skipped)",
            report.loaded,
            root.display(),
            report.skipped
        );
        Ok(report)
    }

    /// Drop every template and access list
    pub fn clear(&mut self) {
        self.builtin.clear();
        self.overrides.clear();
        self.clear_access_lists();
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn clear_access_lists(&mut self) {
        self.blacklist.clear();
        self.metas.clear();
    }

    /// Number of distinct identities across both tiers
    pub fn len(&self) -> usize {
        let shadowed = self
            .overrides
            .holders
            .keys()
            .filter(|id| self.builtin.contains(id))
            .count();
        self.builtin.len() + self.overrides.len() - shadowed
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `category/type/[tags/...]name` into its classification and tags
fn parse_identity(identity: &str) -> Result<(StructureCategory, StructureType, Vec<String>), RegistryError> {
    let segments: Vec<&str> = identity.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 3 {
        return Err(RegistryError::InvalidPath(PathBuf::from(identity)));
    }

    let category = StructureCategory::from_token(segments[0])
        .ok_or_else(|| RegistryError::UnknownCategory(segments[0].to_string()))?;
    let kind = StructureType::from_token(segments[1])
        .ok_or_else(|| RegistryError::UnknownType(segments[1].to_string()))?;
    let tags = segments[2..segments.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect();

    Ok((category, kind, tags))
}

fn identity_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(segments.join("/"))
}

fn collect_ron_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_ron_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "ron") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::TemplateBuilder;
    use delve_blocks::BlockId;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn holder(identity: &str, width: i32) -> TemplateHolder {
        let (category, kind, tags) = parse_identity(identity).unwrap();
        let template = TemplateBuilder::new(IVec3::new(width, 1, 2))
            .layer(0, BlockId::COBBLESTONE)
            .build();
        TemplateHolder::new(identity, category, kind, template).with_tags(tags)
    }

    fn identities(holders: &[&TemplateHolder]) -> Vec<String> {
        let mut ids: Vec<String> = holders.iter().map(|h| h.identity.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_tokens() {
        assert_eq!(
            StructureCategory::from_token("subaqueous"),
            Some(StructureCategory::Subaqueous)
        );
        assert_eq!(StructureType::from_token("well"), Some(StructureType::Well));
        assert_eq!(StructureType::from_token("castle"), None);
        assert_eq!(StructureType::Dungeon.to_string(), "dungeon");
    }

    #[test]
    fn test_parse_identity() {
        let (category, kind, tags) = parse_identity("subterranean/room/mossy/deep/vault").unwrap();
        assert_eq!(category, StructureCategory::Subterranean);
        assert_eq!(kind, StructureType::Room);
        assert_eq!(tags, vec!["mossy".to_string(), "deep".to_string()]);

        assert!(matches!(
            parse_identity("skyborne/ruin/a"),
            Err(RegistryError::UnknownCategory(c)) if c == "skyborne"
        ));
        assert!(matches!(
            parse_identity("terranean/castle/a"),
            Err(RegistryError::UnknownType(t)) if t == "castle"
        ));
        assert!(matches!(
            parse_identity("terranean/ruin"),
            Err(RegistryError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = TemplateRegistry::new();
        registry.register(holder("terranean/ruin/hut", 2));
        registry.register(holder("terranean/ruin/hut", 5));

        let found = registry.lookup(StructureCategory::Terranean, StructureType::Ruin);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].template.size().x, 5);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_override_shadows_builtin() {
        let mut registry = TemplateRegistry::new();
        registry.register(holder("terranean/ruin/hut", 2));
        registry.register(holder("terranean/ruin/tower", 2));
        registry.register_override(holder("terranean/ruin/hut", 7));

        let found = registry.lookup(StructureCategory::Terranean, StructureType::Ruin);
        assert_eq!(found.len(), 2);
        let hut = found.iter().find(|h| h.identity == "terranean/ruin/hut").unwrap();
        assert_eq!(hut.template.size().x, 7);

        assert_eq!(
            registry.lookup_by_identity("terranean/ruin/hut").unwrap().template.size().x,
            7
        );
        assert_eq!(registry.len(), 2);

        registry.clear_overrides();
        assert_eq!(
            registry.lookup_by_identity("terranean/ruin/hut").unwrap().template.size().x,
            2
        );
    }

    #[test]
    fn test_biome_filtering() {
        let mut registry = TemplateRegistry::new();
        registry.register(holder("terranean/ruin/hut", 2));
        registry.register(holder("terranean/ruin/tower", 2));
        registry.register(holder("terranean/ruin/crypt", 2));
        registry.register(holder("terranean/ruin/plain", 2));

        registry.register_access_lists(&[
            StructMeta {
                name: "terranean/ruin/hut".to_string(),
                biome_blacklist: vec!["desert".to_string()],
                ..Default::default()
            },
            StructMeta {
                name: "terranean/ruin/tower".to_string(),
                biome_whitelist: vec!["forest".to_string()],
                ..Default::default()
            },
            StructMeta {
                // Blacklist wins even when whitelisted
                name: "terranean/ruin/crypt".to_string(),
                biome_whitelist: vec!["desert".to_string()],
                biome_blacklist: vec!["desert".to_string()],
                ..Default::default()
            },
        ]);

        let desert = registry.lookup_in_biome(StructureCategory::Terranean, StructureType::Ruin, "desert");
        assert_eq!(identities(&desert), vec!["terranean/ruin/plain"]);

        let forest = registry.lookup_in_biome(StructureCategory::Terranean, StructureType::Ruin, "forest");
        assert_eq!(
            identities(&forest),
            vec!["terranean/ruin/hut", "terranean/ruin/plain", "terranean/ruin/tower"]
        );
    }

    #[test]
    fn test_access_lists_skip_unknown_tokens() {
        let mut registry = TemplateRegistry::new();
        registry.register_access_lists(&[StructMeta {
            name: "skyborne/ruin/cloud".to_string(),
            biome_blacklist: vec!["plains".to_string()],
            ..Default::default()
        }]);

        assert!(registry.blacklist.is_empty());
        assert!(registry.meta("skyborne/ruin/cloud").is_some());

        registry.register_access_lists(&[]);
        assert!(registry.meta("skyborne/ruin/cloud").is_none());
    }

    #[test]
    fn test_select() {
        let mut registry = TemplateRegistry::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        assert!(registry
            .select(&mut rng, StructureCategory::Terranean, StructureType::Ruin, None)
            .is_none());

        registry.register(holder("terranean/ruin/hut", 2));
        registry.register(holder("terranean/marker/grave", 2));
        let picked = registry
            .select(&mut rng, StructureCategory::Terranean, StructureType::Ruin, Some("plains"))
            .unwrap();
        assert_eq!(picked.identity, "terranean/ruin/hut");
    }

    #[test]
    fn test_lookup_by_type() {
        let mut registry = TemplateRegistry::new();
        registry.register(holder("terranean/room/a", 2));
        registry.register(holder("subterranean/room/b", 2));
        registry.register(holder("subterranean/dungeon/c", 2));

        assert_eq!(
            identities(&registry.lookup_by_type(StructureType::Room)),
            vec!["subterranean/room/b", "terranean/room/a"]
        );
    }

    #[test]
    fn test_clear() {
        let mut registry = TemplateRegistry::new();
        registry.register(holder("terranean/ruin/hut", 2));
        registry.register_override(holder("terranean/ruin/tower", 2));
        registry.register_access_lists(&[StructMeta {
            name: "terranean/ruin/hut".to_string(),
            ..Default::default()
        }]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.meta("terranean/ruin/hut").is_none());
    }
}
