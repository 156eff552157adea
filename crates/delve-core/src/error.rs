//! Error types for generation and template loading

use std::path::PathBuf;

use glam::IVec3;
use thiserror::Error;

use crate::structure::MarkerKind;

/// Why a single generation attempt failed
///
/// Public `generate` entry points log these at debug level and return `None`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenError {
    #[error("height {0} is outside the buildable range")]
    InvalidHeight(i32),

    #[error("no template registered for {category}/{kind}")]
    MissingTemplate { category: String, kind: String },

    #[error("template {identity} has no {marker:?} marker")]
    MissingMarker { identity: String, marker: MarkerKind },

    #[error("only {available} blocks between spawn and surface, {required} required")]
    InsufficientClearance { available: i32, required: i32 },

    #[error("site at {pos} rejected: {reason}")]
    EnvironmentRejected { pos: IVec3, reason: String },

    #[error("block entity missing after placing block at {0}")]
    BlockEntityMissing(IVec3),

    #[error("structure has no chest marker")]
    NoChest,

    #[error("no cavern ceiling within {limit} blocks above {from}")]
    CavernCeilingNotFound { from: IVec3, limit: i32 },
}

/// Errors raised while loading blueprint templates into the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown structure category '{0}'")]
    UnknownCategory(String),

    #[error("unknown structure type '{0}'")]
    UnknownType(String),

    #[error("template path {0} must look like <category>/<type>/[<tags>/...]<name>.ron")]
    InvalidPath(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse blueprint: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("unknown block '{0}'")]
    UnknownBlock(String),

    #[error("glyph '{0}' is not in the blueprint palette")]
    UnknownGlyph(char),

    #[error("blueprint has no layers")]
    EmptyBlueprint,
}
