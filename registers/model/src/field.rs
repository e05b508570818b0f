// Licensed under the Apache-2.0 license

//! Bit fields and access modes.
//!
//! A [`Field`] only stores what was declared for it. Inherited attributes
//! (access mode, reset value) are resolved on demand against the parent
//! [`Register`], either through the pure `resolve_*` functions or through a
//! [`FieldRef`], which pairs a field with a borrowed reference to its
//! parent.

use crate::register::Register;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Bus access mode of a register or field.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::ReadWrite => "read-write",
            Access::ReadOnly => "read-only",
            Access::WriteOnly => "write-only",
        }
    }

    /// Short form used in documentation tables.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Access::ReadWrite => "RW",
            Access::ReadOnly => "R",
            Access::WriteOnly => "W",
        }
    }

    /// Software can write it over the bus.
    pub fn is_bus_writable(&self) -> bool {
        matches!(self, Access::ReadWrite | Access::WriteOnly)
    }

    /// Software can read it over the bus.
    pub fn is_bus_readable(&self) -> bool {
        matches!(self, Access::ReadWrite | Access::ReadOnly)
    }

    /// User logic drives it.
    pub fn is_user_writable(&self) -> bool {
        matches!(self, Access::ReadOnly)
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-write" => Ok(Access::ReadWrite),
            "read-only" => Ok(Access::ReadOnly),
            "write-only" => Ok(Access::WriteOnly),
            _ => Err(format!(
                "'{s}' is not a valid access mode (expected read-write, read-only or write-only)"
            )),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value a self-clearing field returns to after being written.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SelfClear {
    /// All bits are cleared the cycle after a write.
    Zeros,
    /// All bits are set the cycle after a write.
    Ones,
}

impl SelfClear {
    /// The VHDL bit literal every bit of the field is forced to.
    pub fn bit(&self) -> char {
        match self {
            SelfClear::Zeros => '0',
            SelfClear::Ones => '1',
        }
    }
}

/// Bit mask with the low `width` bits set.
pub(crate) fn low_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A named bit range within a register.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) bit_width: u32,
    pub(crate) bit_offset: u32,
    pub(crate) reset: Option<u64>,
    pub(crate) access: Option<Access>,
    pub(crate) self_clear: Option<SelfClear>,
    pub(crate) user_write_strobe: bool,
    /// Materialized for a register declared without fields.
    pub(crate) synthetic: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Resolved bit offset of the least significant bit.
    pub fn bit_offset(&self) -> u32 {
        self.bit_offset
    }

    /// Offset of the most significant bit.
    pub fn msb(&self) -> u32 {
        self.bit_offset + self.bit_width.saturating_sub(1)
    }

    /// `(2^bit_width - 1) << bit_offset`
    pub fn mask(&self) -> u64 {
        low_mask(self.bit_width) << self.bit_offset
    }

    /// Reset value declared on the field itself.
    pub fn declared_reset(&self) -> Option<u64> {
        self.reset
    }

    /// Access mode declared on the field itself.
    pub fn declared_access(&self) -> Option<Access> {
        self.access
    }

    pub fn self_clear(&self) -> Option<SelfClear> {
        self.self_clear
    }

    pub fn is_self_clearing(&self) -> bool {
        self.self_clear.is_some()
    }

    pub fn has_user_write_strobe(&self) -> bool {
        self.user_write_strobe
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// The field's own access, else the parent register's.
    pub fn resolve_access(&self, parent: &Register) -> Access {
        self.access.unwrap_or(parent.access())
    }

    /// The field's own reset, else its slice of the parent register's
    /// declared reset pattern, else none.
    pub fn resolve_reset(&self, parent: &Register) -> Option<u64> {
        self.reset.or_else(|| {
            parent
                .declared_reset()
                .map(|reset| (reset >> self.bit_offset) & low_mask(self.bit_width))
        })
    }
}

/// A field together with a non-owning reference to its parent register.
#[derive(Clone, Copy, Debug)]
pub struct FieldRef<'a> {
    field: &'a Field,
    register: &'a Register,
}

impl<'a> FieldRef<'a> {
    pub(crate) fn new(field: &'a Field, register: &'a Register) -> Self {
        Self { field, register }
    }

    pub fn field(&self) -> &'a Field {
        self.field
    }

    pub fn register(&self) -> &'a Register {
        self.register
    }

    /// Resolved access mode.
    pub fn access(&self) -> Access {
        self.field.resolve_access(self.register)
    }

    /// Resolved reset value.
    pub fn reset(&self) -> Option<u64> {
        self.field.resolve_reset(self.register)
    }

    pub fn is_bus_writable(&self) -> bool {
        self.access().is_bus_writable()
    }

    pub fn is_bus_readable(&self) -> bool {
        self.access().is_bus_readable()
    }

    pub fn is_user_writable(&self) -> bool {
        self.access().is_user_writable()
    }
}

impl Deref for FieldRef<'_> {
    type Target = Field;

    fn deref(&self) -> &Field {
        self.field
    }
}
