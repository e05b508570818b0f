// Licensed under the Apache-2.0 license

//! Errors raised while decoding, elaborating and validating a register
//! description.
//!
//! Every error is bound to exactly one entity (module, register or field)
//! and carries a human-readable cause. Elaboration stops at the first
//! error; there is no partial model.

use std::fmt;
use thiserror::Error;

/// Placeholder used when an entity has no usable name.
pub const UNNAMED: &str = "<unnamed>";

/// The kind of entity an error is bound to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntityKind {
    Module,
    Register,
    Field,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Module => write!(f, "module"),
            EntityKind::Register => write!(f, "register"),
            EntityKind::Field => write!(f, "field"),
        }
    }
}

/// The entity an error refers to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
}

impl Entity {
    pub fn new(kind: EntityKind, name: &str) -> Self {
        let name = if name.is_empty() { UNNAMED } else { name };
        Self {
            kind,
            name: name.to_string(),
        }
    }

    pub fn module(name: &str) -> Self {
        Self::new(EntityKind::Module, name)
    }

    pub fn register(name: &str) -> Self {
        Self::new(EntityKind::Register, name)
    }

    pub fn field(name: &str) -> Self {
        Self::new(EntityKind::Field, name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Elaboration error.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// Missing or unsupported input keys, or values of the wrong type.
    #[error("structural error in {entity}: {cause}")]
    Structural { entity: Entity, cause: String },

    /// Invalid identifier, or one reserved in a target grammar.
    #[error("naming error in {entity}: {cause}")]
    Naming { entity: Entity, cause: String },

    /// Reset, width, offset or address outside its legal bounds.
    #[error("range error in {entity}: {cause}")]
    Range { entity: Entity, cause: String },

    /// Duplicate fixed address, overlapping fixed bit ranges, duplicate
    /// names or colliding derived symbols.
    #[error("conflict error in {entity}: {cause}")]
    Conflict { entity: Entity, cause: String },

    /// No legal address or bit range remains for an unfixed item.
    #[error("allocation error in {entity}: {cause}")]
    Allocation { entity: Entity, cause: String },
}

impl Error {
    pub fn structural(entity: Entity, cause: impl Into<String>) -> Self {
        Error::Structural {
            entity,
            cause: cause.into(),
        }
    }

    pub fn naming(entity: Entity, cause: impl Into<String>) -> Self {
        Error::Naming {
            entity,
            cause: cause.into(),
        }
    }

    pub fn range(entity: Entity, cause: impl Into<String>) -> Self {
        Error::Range {
            entity,
            cause: cause.into(),
        }
    }

    pub fn conflict(entity: Entity, cause: impl Into<String>) -> Self {
        Error::Conflict {
            entity,
            cause: cause.into(),
        }
    }

    pub fn allocation(entity: Entity, cause: impl Into<String>) -> Self {
        Error::Allocation {
            entity,
            cause: cause.into(),
        }
    }

    /// The entity this error is bound to.
    pub fn entity(&self) -> &Entity {
        match self {
            Error::Structural { entity, .. }
            | Error::Naming { entity, .. }
            | Error::Range { entity, .. }
            | Error::Conflict { entity, .. }
            | Error::Allocation { entity, .. } => entity,
        }
    }

    /// The human-readable cause, without the entity prefix.
    pub fn cause(&self) -> &str {
        match self {
            Error::Structural { cause, .. }
            | Error::Naming { cause, .. }
            | Error::Range { cause, .. }
            | Error::Conflict { cause, .. }
            | Error::Allocation { cause, .. } => cause,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
