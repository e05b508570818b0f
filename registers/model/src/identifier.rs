// Licensed under the Apache-2.0 license

//! Identifier validation shared by every output target.
//!
//! A register or field name ends up verbatim (modulo case) in the VHDL
//! package, the VHDL component and the C header, so it has to be a legal
//! basic identifier in all of them at once:
//!
//! ```text
//! identifier ::= letter { [ '_' ] letter_or_digit }
//! ```
//!
//! and must not collide with a reserved word of either grammar.

/// VHDL-93 reserved words.
pub const RESERVED_VHDL_KEYWORDS: &[&str] = &[
    "abs",
    "access",
    "after",
    "alias",
    "all",
    "and",
    "architecture",
    "array",
    "assert",
    "attribute",
    "begin",
    "block",
    "body",
    "buffer",
    "bus",
    "case",
    "component",
    "configuration",
    "constant",
    "disconnect",
    "downto",
    "else",
    "elsif",
    "end",
    "entity",
    "exit",
    "file",
    "for",
    "function",
    "generate",
    "generic",
    "group",
    "guarded",
    "if",
    "impure",
    "in",
    "inertial",
    "inout",
    "is",
    "label",
    "library",
    "linkage",
    "literal",
    "loop",
    "map",
    "mod",
    "nand",
    "new",
    "next",
    "nor",
    "not",
    "null",
    "of",
    "on",
    "open",
    "or",
    "others",
    "out",
    "package",
    "port",
    "postponed",
    "procedure",
    "process",
    "pure",
    "range",
    "record",
    "register",
    "reject",
    "rem",
    "report",
    "return",
    "rol",
    "ror",
    "select",
    "severity",
    "signal",
    "shared",
    "sla",
    "sll",
    "sra",
    "srl",
    "subtype",
    "then",
    "to",
    "transport",
    "type",
    "unaffected",
    "units",
    "until",
    "use",
    "variable",
    "wait",
    "when",
    "while",
    "with",
    "xnor",
    "xor",
];

/// C89 reserved words (plus `_Packed`).
pub const RESERVED_C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while", "_Packed",
];

/// Returns true if `name` is reserved in the VHDL grammar (case-insensitive).
pub fn is_reserved_vhdl(name: &str) -> bool {
    RESERVED_VHDL_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(name))
}

/// Returns true if `name` is reserved in the C grammar (case-insensitive).
pub fn is_reserved_c(name: &str) -> bool {
    RESERVED_C_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(name))
}

/// Returns true if `name` matches the basic identifier grammar.
fn is_basic_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    let mut prev_underscore = false;
    for c in chars {
        if c == '_' {
            if prev_underscore {
                return false;
            }
            prev_underscore = true;
        } else if c.is_ascii_alphanumeric() {
            prev_underscore = false;
        } else {
            return false;
        }
    }
    !prev_underscore
}

/// Checks whether `name` can be used as a register or field name.
///
/// # Examples
/// ```
/// use hdlregs_model::is_valid_identifier;
/// assert!(is_valid_identifier("ctrl_reg0"));
/// assert!(!is_valid_identifier("signal"));
/// assert!(!is_valid_identifier("static"));
/// assert!(!is_valid_identifier("a__b"));
/// ```
pub fn is_valid_identifier(name: &str) -> bool {
    is_basic_identifier(name) && !is_reserved_vhdl(name) && !is_reserved_c(name)
}

/// Like [`is_valid_identifier`] but explains the rejection.
pub fn identifier_defect(name: &str) -> Option<String> {
    if name.is_empty() {
        Some("name is empty".to_string())
    } else if !is_basic_identifier(name) {
        Some(format!(
            "'{name}' is not a valid identifier (a letter followed by letters, digits and single underscores)"
        ))
    } else if is_reserved_vhdl(name) {
        Some(format!("'{name}' is a reserved VHDL keyword"))
    } else if is_reserved_c(name) {
        Some(format!("'{name}' is a reserved C keyword"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar() {
        assert!(is_valid_identifier("a"));
        assert!(is_valid_identifier("Ctrl"));
        assert!(is_valid_identifier("irq_status_2"));
        assert!(is_valid_identifier("A1B2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_ctrl"));
        assert!(!is_valid_identifier("0ctrl"));
        assert!(!is_valid_identifier("ctrl_"));
        assert!(!is_valid_identifier("ctrl__status"));
        assert!(!is_valid_identifier("ctrl-status"));
        assert!(!is_valid_identifier("ctrl status"));
        assert!(!is_valid_identifier("caf\u{e9}"));
    }

    #[test]
    fn test_reserved_words() {
        assert!(!is_valid_identifier("signal"));
        assert!(!is_valid_identifier("SIGNAL"));
        assert!(!is_valid_identifier("static"));
        assert!(!is_valid_identifier("Static"));
        // Reserved in both grammars.
        assert!(!is_valid_identifier("register"));
        assert!(is_valid_identifier("signals"));
        assert!(is_valid_identifier("statical"));
    }

    #[test]
    fn test_defect_messages() {
        assert_eq!(identifier_defect("ok_name"), None);
        assert_eq!(identifier_defect(""), Some("name is empty".to_string()));
        assert!(identifier_defect("signal").unwrap().contains("VHDL"));
        assert!(identifier_defect("volatile").unwrap().contains("C keyword"));
        assert!(identifier_defect("a__b")
            .unwrap()
            .contains("not a valid identifier"));
    }
}
