// Licensed under the Apache-2.0 license

//! VHDL package (constants and interface records) and VHDL component
//! (the register file itself).
//!
//! The component talks to the bus through a simple chip-select interface
//! and to user logic through the `t_regs2user` / `t_user2regs` records
//! declared in the package:
//!
//! ```text
//!             +-----------------+
//!   clk ----->|                 |
//!   rst ----->|                 |-----> regs2user (bus-writable fields)
//!   cs  ----->|  <module>_regs  |
//!   rnw ----->|                 |<----- user2regs (read-only fields)
//!   addr ---->|                 |
//!   datain -->|                 |-----> dataout
//!             +-----------------+
//! ```

use crate::config::GeneratorConfig;
use crate::output::{emit, CodeWriter};
use anyhow::Result;
use hdlregs_model::naming::{
    address_symbol, base_address_symbol, bit_mask, bit_mask_symbol, bit_offset_symbol,
    bit_width_symbol, data_signal, entity_name, field_record_name, hex_digits,
    high_address_symbol, package_name, regs2user_record_name, strobe_signal,
    user2regs_record_name,
};
use hdlregs_model::{FieldRef, Module, Register};
use std::fmt;

const USER2REGS: &str = "t_user2regs";
const REGS2USER: &str = "t_regs2user";

/// A VHDL record type declaration.
struct Record {
    name: String,
    comment: String,
    elements: Vec<String>,
}

impl Record {
    fn new(name: String, comment: String) -> Self {
        Self {
            name,
            comment,
            elements: Vec::new(),
        }
    }

    fn write(&self, w: &mut CodeWriter) -> fmt::Result {
        emit!(w)?;
        emit!(w, "-- {}", self.comment)?;
        emit!(w, "type {} is record", self.name)?;
        w.indent();
        if self.elements.is_empty() {
            // VHDL does not allow empty records.
            emit!(w, "dummy : std_logic;")?;
        }
        for element in &self.elements {
            emit!(w, "{element};")?;
        }
        w.dedent();
        emit!(w, "end record;")
    }
}

fn write_header(w: &mut CodeWriter, module: &Module, config: &GeneratorConfig) -> fmt::Result {
    w.comment_block("--", &config.banner(module.name()))?;
    emit!(w)?;
    emit!(w, "library ieee;")?;
    emit!(w, "use ieee.std_logic_1164.all;")
}

fn word_type(module: &Module) -> String {
    format!("std_logic_vector({} downto 0)", module.width() - 1)
}

/// `OFFSET_R_F + WIDTH_R_F - 1 downto OFFSET_R_F`
fn bit_range(field: &FieldRef<'_>) -> String {
    let reg = field.register().name();
    let offset = bit_offset_symbol(reg, field.name());
    let width = bit_width_symbol(reg, field.name());
    format!("{offset} + {width} - 1 downto {offset}")
}

/// Element name of a register or field inside an interface record.
fn element_name(name: &str) -> String {
    name.to_lowercase()
}

/// Renders the VHDL package of `module`.
pub fn generate_vhdl_package(module: &Module, config: &GeneratorConfig) -> Result<String> {
    let mut w = CodeWriter::new(config);
    let package = package_name(module.name());
    let word = word_type(module);

    write_header(&mut w, module, config)?;
    emit!(w)?;
    emit!(w, "package {package} is")?;
    w.indent();
    emit!(w)?;

    for reg in module.registers() {
        emit!(
            w,
            "constant {} : {word} := x\"{}\";",
            address_symbol(reg.name()),
            hex_digits(reg.address_offset())
        )?;
    }
    if let (Some(base), Some(high)) = (module.base_register(), module.high_register()) {
        emit!(
            w,
            "constant {} : {word} := {}; -- lowest register address",
            base_address_symbol(module.name()),
            address_symbol(base.name())
        )?;
        emit!(
            w,
            "constant {} : {word} := {}; -- highest register address",
            high_address_symbol(module.name()),
            address_symbol(high.name())
        )?;
    }

    for reg in module.registers() {
        for field in reg.fields() {
            emit!(w)?;
            emit!(w, "-- Field '{}' of register '{}'", field.name(), reg.name())?;
            emit!(
                w,
                "constant {} : natural := {};",
                bit_offset_symbol(reg.name(), field.name()),
                field.bit_offset()
            )?;
            emit!(
                w,
                "constant {} : natural := {};",
                bit_width_symbol(reg.name(), field.name()),
                field.bit_width()
            )?;
            emit!(
                w,
                "constant {} : {word} := x\"{}\";",
                bit_mask_symbol(reg.name(), field.name()),
                hex_digits(bit_mask(field.bit_offset(), field.bit_width()))
            )?;
        }
    }

    for reg in module.registers() {
        for field in reg.fields() {
            let mut record = Record::new(
                field_record_name(reg.name(), field.name()),
                format!(
                    "Field '{}' of register '{}' ({})",
                    field.name(),
                    reg.name(),
                    field.access()
                ),
            );
            record.elements.push(format!(
                "value : std_logic_vector({} - 1 downto 0)",
                bit_width_symbol(reg.name(), field.name())
            ));
            record.elements.push("strobe : std_logic".to_string());
            record.write(&mut w)?;
        }
    }

    let mut user2regs = Record::new(
        USER2REGS.to_string(),
        "User-logic -> register file interface".to_string(),
    );
    let mut regs2user = Record::new(
        REGS2USER.to_string(),
        "Register file -> user-logic interface".to_string(),
    );
    for reg in module.registers() {
        let user_fields = register_record(reg, user2regs_record_name, |f| f.is_user_writable());
        if let Some(record) = user_fields {
            user2regs
                .elements
                .push(format!("{} : {}", element_name(reg.name()), record.name));
            record.write(&mut w)?;
        }
        let bus_fields = register_record(reg, regs2user_record_name, |f| f.is_bus_writable());
        if let Some(record) = bus_fields {
            regs2user
                .elements
                .push(format!("{} : {}", element_name(reg.name()), record.name));
            record.write(&mut w)?;
        }
    }
    user2regs.write(&mut w)?;
    regs2user.write(&mut w)?;

    w.dedent();
    emit!(w)?;
    emit!(w, "end package {package};")?;
    Ok(w.finish())
}

/// Record of the fields of `reg` selected by `include`, or `None` if no
/// field qualifies.
fn register_record(
    reg: &Register,
    name: fn(&str) -> String,
    include: impl Fn(&FieldRef<'_>) -> bool,
) -> Option<Record> {
    let mut record = Record::new(name(reg.name()), format!("Register '{}'", reg.name()));
    for field in reg.fields().filter(|f| include(f)) {
        record.elements.push(format!(
            "{} : {}",
            element_name(field.name()),
            field_record_name(reg.name(), field.name())
        ));
    }
    (!record.elements.is_empty()).then_some(record)
}

/// Renders the VHDL component of `module`.
pub fn generate_vhdl_component(module: &Module, config: &GeneratorConfig) -> Result<String> {
    let mut w = CodeWriter::new(config);
    let entity = entity_name(module.name());
    let word = word_type(module);

    write_header(&mut w, module, config)?;
    emit!(w)?;
    emit!(w, "use work.{}.all;", package_name(module.name()))?;
    emit!(w)?;
    emit!(w, "entity {entity} is")?;
    w.indent();
    emit!(w, "port (")?;
    w.indent();
    emit!(w, "clk       : in  std_logic;")?;
    emit!(w, "rst       : in  std_logic;")?;
    emit!(w, "cs        : in  std_logic;")?;
    emit!(w, "rnw       : in  std_logic;")?;
    emit!(w, "addr      : in  {word};")?;
    emit!(w, "datain    : in  {word};")?;
    emit!(w, "dataout   : out {word};")?;
    emit!(w, "regs2user : out {REGS2USER};")?;
    emit!(w, "user2regs : in  {USER2REGS}")?;
    w.dedent();
    emit!(w, ");")?;
    w.dedent();
    emit!(w, "end entity {entity};")?;
    emit!(w)?;

    emit!(w, "architecture rtl of {entity} is")?;
    w.indent();
    emit!(w)?;
    for reg in module.registers() {
        emit!(w, "signal {} : {word};", data_signal(reg.name()))?;
        if reg.is_bus_writable() {
            emit!(w, "signal {} : std_logic := '0';", strobe_signal(reg.name()))?;
        }
    }
    w.dedent();
    emit!(w)?;
    emit!(w, "begin")?;
    w.indent();
    emit!(w)?;
    write_register_process(&mut w, module)?;
    emit!(w)?;
    write_read_process(&mut w, module)?;
    emit!(w)?;
    for reg in module.registers() {
        for field in reg.bus_writable_fields() {
            let element = format!(
                "regs2user.{}.{}",
                element_name(reg.name()),
                element_name(field.name())
            );
            emit!(
                w,
                "{element}.value <= {}({});",
                data_signal(reg.name()),
                bit_range(&field)
            )?;
            emit!(w, "{element}.strobe <= {};", strobe_signal(reg.name()))?;
        }
    }
    w.dedent();
    emit!(w)?;
    emit!(w, "end architecture rtl;")?;
    Ok(w.finish())
}

/// Clocked process: reset values, strobe defaults, self-clearing fields,
/// bus writes and user-logic writes, in that order of precedence (later
/// assignments win).
fn write_register_process(w: &mut CodeWriter, module: &Module) -> fmt::Result {
    emit!(w, "register_write : process(clk, rst) is")?;
    emit!(w, "begin")?;
    w.indent();
    emit!(w, "if rst = '1' then")?;
    w.indent();
    for reg in module.registers() {
        if let Some(reset) = reg.reset() {
            emit!(w, "{} <= x\"{}\";", data_signal(reg.name()), hex_digits(reset))?;
        }
    }
    w.dedent();
    emit!(w, "elsif rising_edge(clk) then")?;
    w.indent();

    emit!(w, "-- defaults:")?;
    for reg in module.registers().iter().filter(|r| r.is_bus_writable()) {
        emit!(w, "{} <= '0';", strobe_signal(reg.name()))?;
    }

    emit!(w, "-- self-clearing fields:")?;
    for reg in module.registers() {
        for field in reg.bus_writable_fields() {
            let Some(clear) = field.self_clear() else {
                continue;
            };
            emit!(
                w,
                "{}({}) <= (others => '{}');",
                data_signal(reg.name()),
                bit_range(&field),
                clear.bit()
            )?;
        }
    }

    emit!(w, "-- bus write:")?;
    emit!(w, "if cs = '1' and rnw = '0' then")?;
    w.indent();
    for reg in module.registers().iter().filter(|r| r.is_bus_writable()) {
        emit!(w, "if addr = {} then", address_symbol(reg.name()))?;
        w.indent();
        for field in reg.bus_writable_fields() {
            let range = bit_range(&field);
            emit!(w, "{}({range}) <= datain({range});", data_signal(reg.name()))?;
        }
        emit!(w, "{} <= '1';", strobe_signal(reg.name()))?;
        w.dedent();
        emit!(w, "end if;")?;
    }
    w.dedent();
    emit!(w, "end if;")?;

    emit!(w, "-- user-logic write:")?;
    for reg in module.registers() {
        for field in reg.user_writable_fields() {
            let element = format!(
                "user2regs.{}.{}",
                element_name(reg.name()),
                element_name(field.name())
            );
            let assignment = format!(
                "{}({}) <= {element}.value;",
                data_signal(reg.name()),
                bit_range(&field)
            );
            if field.has_user_write_strobe() {
                emit!(w, "if {element}.strobe = '1' then")?;
                w.indent();
                emit!(w, "{assignment}")?;
                w.dedent();
                emit!(w, "end if;")?;
            } else {
                emit!(w, "{assignment}")?;
            }
        }
    }

    w.dedent();
    emit!(w, "end if;")?;
    w.dedent();
    emit!(w, "end process register_write;")
}

/// Combinational bus read process.
fn write_read_process(w: &mut CodeWriter, module: &Module) -> fmt::Result {
    let readable: Vec<&Register> = module
        .registers()
        .iter()
        .filter(|r| r.is_bus_readable())
        .collect();
    let mut sensitivity = vec!["cs".to_string(), "rnw".to_string(), "addr".to_string()];
    sensitivity.extend(readable.iter().map(|r| data_signal(r.name())));

    emit!(w, "bus_read : process({}) is", sensitivity.join(", "))?;
    emit!(w, "begin")?;
    w.indent();
    emit!(w, "dataout <= (others => 'X'); -- default")?;
    emit!(w, "if cs = '1' and rnw = '1' then")?;
    w.indent();
    for reg in readable {
        emit!(w, "if addr = {} then", address_symbol(reg.name()))?;
        w.indent();
        for field in reg.bus_readable_fields() {
            let range = bit_range(&field);
            emit!(w, "dataout({range}) <= {}({range});", data_signal(reg.name()))?;
        }
        w.dedent();
        emit!(w, "end if;")?;
    }
    w.dedent();
    emit!(w, "end if;")?;
    w.dedent();
    emit!(w, "end process bus_read;")
}
