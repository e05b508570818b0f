// Licensed under the Apache-2.0 license

//! Symbol derivation shared by every renderer.
//!
//! Renderers must not build symbols themselves: the C header and the VHDL
//! package both expose `OFFSET_*`, `WIDTH_*`, `MASK_*` and `ADDR_*`
//! constants, and they only stay interchangeable if both derive them here.
//!
//! | Symbol                       | Register `ctrl`, field `reset`, module `uart` |
//! |------------------------------|-----------------------------------------------|
//! | [`address_symbol`]           | `ADDR_CTRL`                                   |
//! | [`bit_offset_symbol`]        | `OFFSET_CTRL_RESET`                           |
//! | [`bit_width_symbol`]         | `WIDTH_CTRL_RESET`                            |
//! | [`bit_mask_symbol`]          | `MASK_CTRL_RESET`                             |
//! | [`base_address_symbol`]      | `UART_REGS_BASEADDR`                          |
//! | [`high_address_symbol`]      | `UART_REGS_HIGHADDR`                          |
//! | [`package_name`]             | `uart_regs_pkg`                               |
//! | [`entity_name`]              | `uart_regs`                                   |
//! | [`field_record_name`]        | `t_ctrl_reset`                                |
//! | [`data_signal`]              | `s_ctrl_r`                                    |

use crate::module::Module;
use std::collections::HashMap;

pub use crate::identifier::{is_valid_identifier, RESERVED_C_KEYWORDS, RESERVED_VHDL_KEYWORDS};

/// Byte address constant of a register.
pub fn address_symbol(register: &str) -> String {
    format!("ADDR_{}", register.to_uppercase())
}

/// Bit offset constant of a field.
pub fn bit_offset_symbol(register: &str, field: &str) -> String {
    format!("OFFSET_{}_{}", register.to_uppercase(), field.to_uppercase())
}

/// Bit width constant of a field.
pub fn bit_width_symbol(register: &str, field: &str) -> String {
    format!("WIDTH_{}_{}", register.to_uppercase(), field.to_uppercase())
}

/// Bit mask constant of a field.
pub fn bit_mask_symbol(register: &str, field: &str) -> String {
    format!("MASK_{}_{}", register.to_uppercase(), field.to_uppercase())
}

/// `(2^width - 1) << offset`
pub fn bit_mask(offset: u32, width: u32) -> u64 {
    crate::field::low_mask(width) << offset
}

/// Constant holding the lowest register address of a module.
pub fn base_address_symbol(module: &str) -> String {
    format!("{}_REGS_BASEADDR", module.to_uppercase())
}

/// Constant holding the highest register address of a module.
pub fn high_address_symbol(module: &str) -> String {
    format!("{}_REGS_HIGHADDR", module.to_uppercase())
}

/// C include guard.
pub fn header_guard(module: &str) -> String {
    format!("{}_REGS", module.to_uppercase())
}

/// VHDL package name.
pub fn package_name(module: &str) -> String {
    format!("{}_regs_pkg", module.to_lowercase())
}

/// VHDL entity name.
pub fn entity_name(module: &str) -> String {
    format!("{}_regs", module.to_lowercase())
}

/// VHDL record type carrying one field's value and strobe.
pub fn field_record_name(register: &str, field: &str) -> String {
    format!("t_{}_{}", register.to_lowercase(), field.to_lowercase())
}

/// VHDL record type of a register's user-driven fields.
pub fn user2regs_record_name(register: &str) -> String {
    format!("t_{}_user2regs", register.to_lowercase())
}

/// VHDL record type of a register's bus-written fields.
pub fn regs2user_record_name(register: &str) -> String {
    format!("t_{}_regs2user", register.to_lowercase())
}

/// VHDL signal holding a register's value.
pub fn data_signal(register: &str) -> String {
    format!("s_{}_r", register.to_lowercase())
}

/// VHDL signal pulsed when a register is written over the bus.
pub fn strobe_signal(register: &str) -> String {
    format!("s_{}_strobe_r", register.to_lowercase())
}

/// 32-bit hex literal body, e.g. `0000000A`.
pub fn hex_digits(value: u64) -> String {
    format!("{value:08X}")
}

/// 32-bit hex constant, e.g. `0x0000000A`.
pub fn hex_word(value: u64) -> String {
    format!("0x{}", hex_digits(value))
}

/// Output artifacts derived from a module.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    CHeader,
    VhdlPackage,
    VhdlComponent,
    Html,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::CHeader,
        ArtifactKind::VhdlPackage,
        ArtifactKind::VhdlComponent,
        ArtifactKind::Html,
    ];

    /// Short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::CHeader => "c",
            ArtifactKind::VhdlPackage => "vhdl-pkg",
            ArtifactKind::VhdlComponent => "vhdl",
            ArtifactKind::Html => "html",
        }
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ArtifactKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown target '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File name of an artifact, e.g. `uart_regs_pkg.vhd`.
pub fn artifact_file_name(module: &str, kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::CHeader => format!("{module}_regs.h"),
        ArtifactKind::VhdlPackage => format!("{module}_regs_pkg.vhd"),
        ArtifactKind::VhdlComponent => format!("{module}_regs.vhd"),
        ArtifactKind::Html => format!("{module}_regs.html"),
    }
}

/// Who a derived symbol belongs to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SymbolOwner {
    Module(String),
    Register(String),
    Field { register: String, field: String },
}

impl std::fmt::Display for SymbolOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolOwner::Module(name) => write!(f, "module '{name}'"),
            SymbolOwner::Register(name) => write!(f, "register '{name}'"),
            SymbolOwner::Field { register, field } => {
                write!(f, "field '{field}' of register '{register}'")
            }
        }
    }
}

/// Every global symbol the renderers will emit for `module`, in a fixed
/// order, together with its owner.
pub fn derived_symbols(module: &Module) -> Vec<(String, SymbolOwner)> {
    let mut symbols = vec![
        (
            base_address_symbol(module.name()),
            SymbolOwner::Module(module.name().to_string()),
        ),
        (
            high_address_symbol(module.name()),
            SymbolOwner::Module(module.name().to_string()),
        ),
    ];
    for reg in module.registers() {
        let owner = SymbolOwner::Register(reg.name().to_string());
        symbols.push((address_symbol(reg.name()), owner.clone()));
        symbols.push((data_signal(reg.name()), owner.clone()));
        symbols.push((strobe_signal(reg.name()), owner.clone()));
        symbols.push((user2regs_record_name(reg.name()), owner.clone()));
        symbols.push((regs2user_record_name(reg.name()), owner));
        for field in reg.fields() {
            let owner = SymbolOwner::Field {
                register: reg.name().to_string(),
                field: field.name().to_string(),
            };
            symbols.push((bit_offset_symbol(reg.name(), field.name()), owner.clone()));
            symbols.push((bit_width_symbol(reg.name(), field.name()), owner.clone()));
            symbols.push((bit_mask_symbol(reg.name(), field.name()), owner.clone()));
            symbols.push((field_record_name(reg.name(), field.name()), owner));
        }
    }
    symbols
}

/// First pair of distinct owners deriving the same symbol. Symbols are
/// compared case-insensitively since VHDL is case-insensitive.
pub fn find_symbol_collision(module: &Module) -> Option<(String, SymbolOwner, SymbolOwner)> {
    let mut seen: HashMap<String, SymbolOwner> = HashMap::new();
    for (symbol, owner) in derived_symbols(module) {
        let key = symbol.to_uppercase();
        match seen.get(&key) {
            Some(prev) if *prev != owner => return Some((symbol, prev.clone(), owner)),
            Some(_) => {}
            None => {
                seen.insert(key, owner);
            }
        }
    }
    None
}
