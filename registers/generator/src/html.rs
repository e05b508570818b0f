// Licensed under the Apache-2.0 license

//! HTML documentation: an overview list of registers followed by one table
//! per register with its fields in descending bit order.

use crate::config::GeneratorConfig;
use crate::output::{emit, CodeWriter};
use anyhow::Result;
use hdlregs_model::naming::hex_word;
use hdlregs_model::{FieldRef, Module, Register};
use std::fmt;

const STYLE: &[&str] = &[
    "body { font-family: Verdana, Geneva, Arial, sans-serif; font-size: small; }",
    "table.register { border: thin solid #aaa; border-collapse: collapse; margin-bottom: 2em; }",
    "table.register tr.header { background-color: #edf0f9; font-size: 125%; }",
    "table.register td { border-top: thin solid #aaa; padding: 3px 5px; vertical-align: top; }",
    "td.addr, td.name, td.field { font-weight: bold; }",
    "td.index { text-align: right; width: 5em; }",
    "table#overview td.even { background-color: #f4f4f4; }",
];

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the HTML documentation of `module`.
pub fn generate_html(module: &Module, config: &GeneratorConfig) -> Result<String> {
    let mut w = CodeWriter::new(config);
    let title = format!("Registers in '{}' module", escape(module.name()));

    emit!(w, "<!DOCTYPE html>")?;
    emit!(w, "<!--")?;
    w.comment_block("  ", &config.banner(module.name()))?;
    emit!(w, "-->")?;
    emit!(w, "<html lang=\"en\">")?;
    emit!(w, "<head>")?;
    w.indent();
    emit!(w, "<meta charset=\"utf-8\">")?;
    emit!(w, "<title>{title}</title>")?;
    emit!(w, "<style>")?;
    w.indent();
    for rule in STYLE {
        emit!(w, "{rule}")?;
    }
    w.dedent();
    emit!(w, "</style>")?;
    w.dedent();
    emit!(w, "</head>")?;
    emit!(w, "<body>")?;
    w.indent();
    emit!(w, "<h1>{title}</h1>")?;
    emit!(w, "<p>{}</p>", escape(module.description()))?;

    emit!(w, "<table id=\"overview\">")?;
    w.indent();
    for (i, reg) in module.registers().iter().enumerate() {
        let class = if i % 2 == 0 { "even" } else { "odd" };
        let name = escape(reg.name());
        emit!(
            w,
            "<tr><td class=\"{class}\"><a href=\"#{name}\">{name}</a></td></tr>"
        )?;
    }
    w.dedent();
    emit!(w, "</table>")?;

    for reg in module.registers() {
        write_register(&mut w, reg)?;
    }

    w.dedent();
    emit!(w, "</body>")?;
    emit!(w, "</html>")?;
    Ok(w.finish())
}

fn write_register(w: &mut CodeWriter, reg: &Register) -> fmt::Result {
    let name = escape(reg.name());
    emit!(w, "<h2 id=\"{name}\">{name}</h2>")?;
    emit!(w, "<table class=\"register\">")?;
    w.indent();
    emit!(
        w,
        "<tr class=\"header\"><td class=\"addr\">{}</td><td class=\"name\" colspan=\"4\">{name}</td></tr>",
        hex_word(reg.address_offset())
    )?;
    emit!(
        w,
        "<tr><td colspan=\"5\">{}</td></tr>",
        escape(reg.description())
    )?;

    let mut fields: Vec<FieldRef<'_>> = reg.fields().collect();
    fields.sort_by(|a, b| b.bit_offset().cmp(&a.bit_offset()));
    for field in fields {
        write_field(w, &field)?;
    }
    w.dedent();
    emit!(w, "</table>")
}

fn write_field(w: &mut CodeWriter, field: &FieldRef<'_>) -> fmt::Result {
    let range = if field.bit_width() == 1 {
        field.bit_offset().to_string()
    } else {
        format!("{}:{}", field.msb(), field.bit_offset())
    };
    let reset = field
        .reset()
        .map(hex_word)
        .unwrap_or_else(|| "&nbsp;".to_string());
    let self_clear = if field.is_self_clearing() {
        "Self-clearing"
    } else {
        "&nbsp;"
    };
    emit!(w, "<tr>")?;
    w.indent();
    emit!(w, "<td class=\"index\">{range}</td>")?;
    emit!(w, "<td class=\"field\">{}</td>", escape(field.name()))?;
    emit!(w, "<td>{}</td>", field.access().abbreviation())?;
    emit!(w, "<td>{reset}</td>")?;
    emit!(w, "<td>{self_clear}</td>")?;
    w.dedent();
    emit!(w, "</tr>")?;
    emit!(w, "<tr>")?;
    w.indent();
    emit!(w, "<td>&nbsp;</td>")?;
    emit!(w, "<td colspan=\"4\">{}</td>", escape(field.description()))?;
    w.dedent();
    emit!(w, "</tr>")
}
