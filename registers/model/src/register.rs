// Licensed under the Apache-2.0 license

//! Addressable registers.

use crate::field::{low_mask, Access, Field, FieldRef};

/// One addressable register of a module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Register {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) access: Access,
    pub(crate) address_offset: u64,
    pub(crate) reset: Option<u64>,
    /// Bus width of the owning module.
    pub(crate) width: u32,
    pub(crate) fields: Vec<Field>,
}

impl Register {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Register-wide access mode; fields without their own access inherit it.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Resolved byte address, relative to the module base.
    pub fn address_offset(&self) -> u64 {
        self.address_offset
    }

    /// Width of the register in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Reset pattern declared on the register itself.
    pub fn declared_reset(&self) -> Option<u64> {
        self.reset
    }

    /// Fields in declaration order, each paired with this register.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldRef<'_>> + '_ {
        self.fields.iter().map(move |f| FieldRef::new(f, self))
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        self.fields().find(|f| f.name() == name)
    }

    /// Effective reset value of the whole register.
    ///
    /// Starts from the declared pattern, or from zero if only fields declare
    /// resets; every field with its own reset then overwrites its bit slice.
    pub fn reset(&self) -> Option<u64> {
        let base = self
            .reset
            .or_else(|| self.fields.iter().any(|f| f.reset.is_some()).then_some(0))?;
        Some(
            self.fields
                .iter()
                .filter_map(|f| f.reset.map(|r| (f, r)))
                .fold(base, |acc, (f, r)| {
                    let mask = f.mask();
                    (acc & !mask) | ((r & low_mask(f.bit_width)) << f.bit_offset)
                }),
        )
    }

    /// At least one field is bus-writable.
    pub fn is_bus_writable(&self) -> bool {
        self.fields().any(|f| f.is_bus_writable())
    }

    /// At least one field is bus-readable.
    pub fn is_bus_readable(&self) -> bool {
        self.fields().any(|f| f.is_bus_readable())
    }

    /// At least one field is driven by user logic.
    pub fn is_user_writable(&self) -> bool {
        self.fields().any(|f| f.is_user_writable())
    }

    /// Fields that software can write.
    pub fn bus_writable_fields(&self) -> impl Iterator<Item = FieldRef<'_>> + '_ {
        self.fields().filter(|f| f.is_bus_writable())
    }

    /// Fields that software can read.
    pub fn bus_readable_fields(&self) -> impl Iterator<Item = FieldRef<'_>> + '_ {
        self.fields().filter(|f| f.is_bus_readable())
    }

    /// Fields driven by user logic.
    pub fn user_writable_fields(&self) -> impl Iterator<Item = FieldRef<'_>> + '_ {
        self.fields().filter(|f| f.is_user_writable())
    }
}
