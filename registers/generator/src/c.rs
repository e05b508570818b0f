// Licensed under the Apache-2.0 license

//! C header with register addresses and field offsets, widths and masks.
//!
//! ```text
//! #ifndef UART_REGS
//! #define UART_REGS
//! #define ADDR_CTRL 0x00000000
//! ...
//! // Field 'enable'
//! #define OFFSET_CTRL_ENABLE 0
//! #define WIDTH_CTRL_ENABLE 1
//! #define MASK_CTRL_ENABLE 0x00000001
//! #endif // UART_REGS
//! ```

use crate::config::GeneratorConfig;
use crate::output::{emit, CodeWriter};
use anyhow::Result;
use hdlregs_model::naming::{
    address_symbol, base_address_symbol, bit_mask, bit_mask_symbol, bit_offset_symbol,
    bit_width_symbol, header_guard, high_address_symbol, hex_word,
};
use hdlregs_model::Module;

/// Renders the C header of `module`.
pub fn generate_c_header(module: &Module, config: &GeneratorConfig) -> Result<String> {
    let mut w = CodeWriter::new(config);
    let guard = header_guard(module.name());

    w.comment_block("//", &config.banner(module.name()))?;
    emit!(w)?;
    emit!(w, "#ifndef {guard}")?;
    emit!(w, "#define {guard}")?;
    emit!(w)?;

    emit!(w, "//")?;
    emit!(w, "// Register address offsets")?;
    emit!(w, "//")?;
    for reg in module.registers() {
        emit!(
            w,
            "#define {} {}",
            address_symbol(reg.name()),
            hex_word(reg.address_offset())
        )?;
    }
    if let (Some(base), Some(high)) = (module.base_register(), module.high_register()) {
        emit!(
            w,
            "#define {} {} // lowest register address",
            base_address_symbol(module.name()),
            address_symbol(base.name())
        )?;
        emit!(
            w,
            "#define {} {} // highest register address",
            high_address_symbol(module.name()),
            address_symbol(high.name())
        )?;
    }
    emit!(w)?;

    for reg in module.registers() {
        emit!(w, "//")?;
        emit!(w, "// Fields in register '{}'", reg.name())?;
        emit!(w, "//")?;
        for field in reg.fields() {
            emit!(w, "// Field '{}'", field.name())?;
            emit!(
                w,
                "#define {} {}",
                bit_offset_symbol(reg.name(), field.name()),
                field.bit_offset()
            )?;
            emit!(
                w,
                "#define {} {}",
                bit_width_symbol(reg.name(), field.name()),
                field.bit_width()
            )?;
            emit!(
                w,
                "#define {} {}",
                bit_mask_symbol(reg.name(), field.name()),
                hex_word(bit_mask(field.bit_offset(), field.bit_width()))
            )?;
            emit!(w)?;
        }
    }

    emit!(w, "#endif // {guard}")?;
    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_header() {
        let module = Module::from_json(
            r#"{
                "name": "uart", "description": "UART", "width": 32,
                "registers": [
                    { "name": "ctrl", "description": "Control", "addressOffset": 8,
                      "fields": [
                          { "name": "enable", "description": "Enable", "bitWidth": 1 },
                          { "name": "baud", "description": "Baud divider", "bitWidth": 4, "bitOffset": 8 }
                      ] },
                    { "name": "data", "description": "Data" }
                ]
            }"#,
        )
        .unwrap();
        let header = generate_c_header(&module, &GeneratorConfig::none()).unwrap();
        assert!(header.starts_with("// Register definitions for module 'uart'\n"));
        assert!(header.contains("#ifndef UART_REGS\n#define UART_REGS\n"));
        assert!(header.contains("#define ADDR_CTRL 0x00000008\n"));
        assert!(header.contains("#define ADDR_DATA 0x00000000\n"));
        assert!(header.contains("#define UART_REGS_BASEADDR ADDR_DATA"));
        assert!(header.contains("#define UART_REGS_HIGHADDR ADDR_CTRL"));
        assert!(header.contains("#define OFFSET_CTRL_BAUD 8\n"));
        assert!(header.contains("#define WIDTH_CTRL_BAUD 4\n"));
        assert!(header.contains("#define MASK_CTRL_BAUD 0x00000F00\n"));
        assert!(header.contains("#define MASK_DATA_DATA 0xFFFFFFFF\n"));
        assert!(header.ends_with("#endif // UART_REGS\n"));
    }
}
