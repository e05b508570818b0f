// Licensed under the Apache-2.0 license

//! Post-elaboration validation.
//!
//! The sweep is a fixed list of independent checks, each returning the
//! first violation it finds. Order of evaluation, and therefore which
//! error is reported when several apply:
//!
//! ```text
//! for each register (declaration order):
//!     REGISTER_CHECKS           name, address alignment, address range, reset range
//!     for each field (declaration order):
//!         FIELD_CHECKS          name, bit width, bit range, reset range,
//!                               self-clear, user write strobe
//!     REGISTER_LAYOUT_CHECKS    unique field names, total field width
//! MODULE_CHECKS                 module name, unique register names,
//!                               derived symbol collisions
//! ```

use crate::alloc::WORD_BYTES;
use crate::error::{Entity, Error, Result};
use crate::field::{low_mask, FieldRef};
use crate::identifier::identifier_defect;
use crate::module::Module;
use crate::naming::find_symbol_collision;
use crate::register::Register;
use std::collections::HashMap;

type RegisterCheck = fn(&Register) -> Result<()>;
type FieldCheck = fn(FieldRef<'_>) -> Result<()>;
type ModuleCheck = fn(&Module) -> Result<()>;

const REGISTER_CHECKS: &[RegisterCheck] = &[
    check_register_name,
    check_address_alignment,
    check_address_range,
    check_register_reset,
];

const FIELD_CHECKS: &[FieldCheck] = &[
    check_field_name,
    check_bit_width,
    check_bit_range,
    check_field_reset,
    check_self_clear,
    check_user_write_strobe,
];

const REGISTER_LAYOUT_CHECKS: &[RegisterCheck] = &[check_unique_field_names, check_total_width];

const MODULE_CHECKS: &[ModuleCheck] = &[
    check_module_name,
    check_unique_register_names,
    check_symbol_collisions,
];

/// Runs every check against an elaborated module.
pub fn validate(module: &Module) -> Result<()> {
    for reg in module.registers() {
        validate_register(reg)?;
    }
    MODULE_CHECKS.iter().try_for_each(|check| check(module))
}

/// Runs the register, field and layout checks for one register.
fn validate_register(reg: &Register) -> Result<()> {
    REGISTER_CHECKS.iter().try_for_each(|check| check(reg))?;
    for field in reg.fields() {
        FIELD_CHECKS.iter().try_for_each(|check| check(field))?;
    }
    REGISTER_LAYOUT_CHECKS.iter().try_for_each(|check| check(reg))
}

/// The module name ends up in file names and HDL/C identifiers.
fn check_module_name(module: &Module) -> Result<()> {
    match identifier_defect(module.name()) {
        Some(defect) => Err(Error::naming(Entity::module(module.name()), defect)),
        None => Ok(()),
    }
}

fn check_register_name(reg: &Register) -> Result<()> {
    match identifier_defect(reg.name()) {
        Some(defect) => Err(Error::naming(Entity::register(reg.name()), defect)),
        None => Ok(()),
    }
}

fn check_address_alignment(reg: &Register) -> Result<()> {
    if reg.address_offset() % WORD_BYTES != 0 {
        return Err(Error::range(
            Entity::register(reg.name()),
            format!(
                "addressOffset 0x{:x} is not a multiple of {WORD_BYTES}",
                reg.address_offset()
            ),
        ));
    }
    Ok(())
}

fn check_address_range(reg: &Register) -> Result<()> {
    let limit = low_mask(reg.width());
    if reg.address_offset() > limit {
        return Err(Error::range(
            Entity::register(reg.name()),
            format!(
                "addressOffset 0x{:x} does not fit in a {}-bit address",
                reg.address_offset(),
                reg.width()
            ),
        ));
    }
    Ok(())
}

fn check_register_reset(reg: &Register) -> Result<()> {
    match reg.declared_reset() {
        Some(reset) if reset > low_mask(reg.width()) => Err(Error::range(
            Entity::register(reg.name()),
            format!("reset value 0x{reset:x} is out of range"),
        )),
        _ => Ok(()),
    }
}

fn check_field_name(field: FieldRef<'_>) -> Result<()> {
    match identifier_defect(field.name()) {
        Some(defect) => Err(Error::naming(Entity::field(field.name()), defect)),
        None => Ok(()),
    }
}

fn check_bit_width(field: FieldRef<'_>) -> Result<()> {
    let width = field.register().width();
    if field.bit_width() == 0 || field.bit_width() > width {
        return Err(Error::range(
            Entity::field(field.name()),
            format!(
                "bit width {} is out of range (1..={width})",
                field.bit_width()
            ),
        ));
    }
    Ok(())
}

fn check_bit_range(field: FieldRef<'_>) -> Result<()> {
    let width = field.register().width();
    if u64::from(field.bit_offset()) + u64::from(field.bit_width()) > u64::from(width) {
        return Err(Error::range(
            Entity::field(field.name()),
            format!(
                "bits [{}:{}] lie outside of register '{}'",
                field.msb(),
                field.bit_offset(),
                field.register().name()
            ),
        ));
    }
    Ok(())
}

fn check_field_reset(field: FieldRef<'_>) -> Result<()> {
    match field.declared_reset() {
        Some(reset) if reset > low_mask(field.bit_width()) => Err(Error::range(
            Entity::field(field.name()),
            format!(
                "reset value 0x{reset:x} does not fit in {} bits",
                field.bit_width()
            ),
        )),
        _ => Ok(()),
    }
}

fn check_self_clear(field: FieldRef<'_>) -> Result<()> {
    if field.is_self_clearing() && !field.is_bus_writable() {
        return Err(Error::range(
            Entity::field(field.name()),
            format!(
                "only bus-writable fields can be self-clearing (access is {})",
                field.access()
            ),
        ));
    }
    Ok(())
}

fn check_user_write_strobe(field: FieldRef<'_>) -> Result<()> {
    if field.has_user_write_strobe() && !field.is_user_writable() {
        return Err(Error::range(
            Entity::field(field.name()),
            format!(
                "userWriteStrobe only applies to read-only fields (access is {})",
                field.access()
            ),
        ));
    }
    Ok(())
}

fn check_unique_field_names(reg: &Register) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for field in reg.fields() {
        if let Some(prev) = seen.insert(field.name().to_lowercase(), field.field().name()) {
            return Err(Error::conflict(
                Entity::field(field.name()),
                format!(
                    "name clashes with field '{prev}' in register '{}'",
                    reg.name()
                ),
            ));
        }
    }
    Ok(())
}

fn check_total_width(reg: &Register) -> Result<()> {
    let total: u64 = reg.fields().map(|f| u64::from(f.bit_width())).sum();
    if total > u64::from(reg.width()) {
        return Err(Error::range(
            Entity::register(reg.name()),
            format!(
                "not enough bits for all fields ({total} requested, {} available)",
                reg.width()
            ),
        ));
    }
    Ok(())
}

fn check_unique_register_names(module: &Module) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for reg in module.registers() {
        if let Some(prev) = seen.insert(reg.name().to_lowercase(), reg.name()) {
            return Err(Error::conflict(
                Entity::register(reg.name()),
                format!("name clashes with register '{prev}'"),
            ));
        }
    }
    Ok(())
}

fn check_symbol_collisions(module: &Module) -> Result<()> {
    match find_symbol_collision(module) {
        Some((symbol, first, second)) => Err(Error::conflict(
            Entity::module(module.name()),
            format!("{first} and {second} both derive the symbol '{symbol}'"),
        )),
        None => Ok(()),
    }
}
