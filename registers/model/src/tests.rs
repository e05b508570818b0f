// Licensed under the Apache-2.0 license

use super::*;
use crate::error::EntityKind;
use serde_json::{json, Value};

fn elaborate(value: Value) -> Result<Module> {
    let desc: ModuleDesc = serde_json::from_value(value).unwrap();
    Module::elaborate(&desc)
}

fn module_with(registers: Value) -> Value {
    json!({
        "name": "uart",
        "description": "A UART",
        "width": 32,
        "registers": registers,
    })
}

fn reg(name: &str, extra: Value) -> Value {
    let mut value = json!({ "name": name, "description": format!("{name} register") });
    if let (Some(obj), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        obj.extend(extra.clone());
    }
    value
}

fn field(name: &str, extra: Value) -> Value {
    reg(name, extra)
}

fn assert_error(err: &Error, kind: EntityKind, name: &str) {
    assert_eq!(err.entity().kind, kind, "{err}");
    assert_eq!(err.entity().name, name, "{err}");
}

#[test]
fn test_first_fit_addresses() {
    let module = elaborate(module_with(json!([
        reg("a", json!({ "addressOffset": 4 })),
        reg("b", json!({})),
        reg("c", json!({})),
    ])))
    .unwrap();
    let addresses: Vec<u64> = module.registers().iter().map(|r| r.address_offset()).collect();
    assert_eq!(addresses, vec![4, 0, 8]);
    assert_eq!(module.base_register().unwrap().name(), "b");
    assert_eq!(module.high_register().unwrap().name(), "c");
    assert_eq!(module.lowest_address(), Some(0));
    assert_eq!(module.highest_address(), Some(8));
}

#[test]
fn test_addresses_unique_and_aligned() {
    let module = elaborate(module_with(json!([
        reg("a", json!({ "addressOffset": "0x8" })),
        reg("b", json!({})),
        reg("c", json!({ "addressOffset": "0" })),
        reg("d", json!({})),
        reg("e", json!({})),
    ])))
    .unwrap();
    let mut addresses: Vec<u64> = module.registers().iter().map(|r| r.address_offset()).collect();
    assert!(addresses.iter().all(|a| a % 4 == 0));
    addresses.sort();
    addresses.dedup();
    assert_eq!(addresses, vec![0, 4, 8, 12, 16]);
}

#[test]
fn test_duplicate_fixed_address() {
    let err = elaborate(module_with(json!([
        reg("a", json!({ "addressOffset": 4 })),
        reg("b", json!({ "addressOffset": "0x4" })),
    ])))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_error(&err, EntityKind::Module, "uart");
    assert!(err.cause().contains("[a, b]"));
}

#[test]
fn test_misaligned_address() {
    let err = elaborate(module_with(json!([reg("a", json!({ "addressOffset": 6 }))]))).unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Register, "a");
}

#[test]
fn test_address_outside_bus() {
    let err = elaborate(module_with(json!([reg(
        "a",
        json!({ "addressOffset": "0x100000000" })
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Register, "a");
}

#[test]
fn test_first_fit_bits() {
    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("x", json!({ "bitWidth": 8, "bitOffset": 4 })),
            field("y", json!({ "bitWidth": 3 })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.field("x").unwrap().bit_offset(), 4);
    assert_eq!(ctrl.field("y").unwrap().bit_offset(), 0);

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("x", json!({ "bitWidth": 8, "bitOffset": 4 })),
            field("y", json!({ "bitWidth": 3 })),
            field("z", json!({ "bitWidth": 40 })),
        ]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Allocation { .. }));
    assert_error(&err, EntityKind::Field, "z");
    assert!(err.cause().contains("'ctrl'"));
}

#[test]
fn test_bits_do_not_overlap() {
    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("a", json!({ "bitWidth": 3 })),
            field("b", json!({ "bitWidth": 4, "bitOffset": 6 })),
            field("c", json!({ "bitWidth": 5 })),
            field("d", json!({ "bitWidth": 1 })),
            field("e", json!({ "bitWidth": 2 })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    let fields: Vec<_> = ctrl.fields().collect();
    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            assert_eq!(a.mask() & b.mask(), 0, "{} overlaps {}", a.name(), b.name());
        }
    }
    assert_eq!(ctrl.field("c").unwrap().bit_offset(), 10);
    assert_eq!(ctrl.field("d").unwrap().bit_offset(), 3);
    assert_eq!(ctrl.field("e").unwrap().bit_offset(), 4);
}

#[test]
fn test_overlapping_fixed_fields() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("a", json!({ "bitWidth": 4, "bitOffset": 0 })),
            field("b", json!({ "bitWidth": 4, "bitOffset": 3 })),
        ]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_error(&err, EntityKind::Field, "b");
}

#[test]
fn test_fixed_field_out_of_bounds() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("a", json!({ "bitWidth": 4, "bitOffset": 30 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Field, "a");
}

#[test]
fn test_zero_width_field() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("a", json!({ "bitWidth": 0 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Field, "a");
}

#[test]
fn test_zero_field_synthesis() {
    let module = elaborate(module_with(json!([
        reg("data", json!({ "reset": "0xCAFE" })),
        reg("status", json!({ "fields": [] })),
    ])))
    .unwrap();
    for reg in module.registers() {
        assert_eq!(reg.fields().len(), 1);
        let only = reg.fields().next().unwrap();
        assert!(only.is_synthetic());
        assert_eq!(only.name(), reg.name());
        assert_eq!(only.description(), reg.description());
        assert_eq!(only.bit_width(), 32);
        assert_eq!(only.bit_offset(), 0);
    }
    let data = module.register("data").unwrap();
    assert_eq!(data.field("data").unwrap().reset(), Some(0xcafe));
    assert_eq!(data.reset(), Some(0xcafe));
}

#[test]
fn test_access_inheritance() {
    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "access": "read-only", "fields": [
            field("a", json!({ "bitWidth": 1 })),
            field("b", json!({ "bitWidth": 1, "access": "write-only" })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.field("a").unwrap().access(), Access::ReadOnly);
    assert_eq!(ctrl.field("a").unwrap().declared_access(), None);
    assert_eq!(ctrl.field("b").unwrap().access(), Access::WriteOnly);
    assert!(ctrl.is_bus_writable());
    assert!(ctrl.is_bus_readable());
    assert!(ctrl.is_user_writable());

    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "access": "write-only", "fields": [
            field("a", json!({ "bitWidth": 1 })),
            field("b", json!({ "bitWidth": 1, "access": "write-only" })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.field("a").unwrap().access(), Access::WriteOnly);
    assert_eq!(ctrl.field("b").unwrap().access(), Access::WriteOnly);
    assert!(!ctrl.is_bus_readable());
}

#[test]
fn test_default_access_is_read_write() {
    let module = elaborate(module_with(json!([reg("ctrl", json!({}))]))).unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.access(), Access::ReadWrite);
    assert!(!ctrl.is_user_writable());
}

#[test]
fn test_reset_composition() {
    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "reset": "0x00000000", "fields": [
            field("f", json!({ "bitWidth": 4, "bitOffset": 8, "reset": "0xA" })),
            field("g", json!({ "bitWidth": 8 })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.reset(), Some(0x0000_0a00));
    assert_eq!(ctrl.field("f").unwrap().reset(), Some(0xa));
    assert_eq!(ctrl.field("g").unwrap().reset(), Some(0));
}

#[test]
fn test_field_reset_out_of_range() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("f", json!({ "bitWidth": 2, "reset": 4 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Field, "f");
}

#[test]
fn test_register_reset_out_of_range() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "reset": "0x1_0000_0000" })
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Register, "ctrl");
}

#[test]
fn test_reserved_names_rejected() {
    let err = elaborate(module_with(json!([reg("signal", json!({}))]))).unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Register, "signal");

    let err = elaborate(module_with(json!([reg("Static", json!({}))]))).unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Register, "Static");

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("signal", json!({ "bitWidth": 1 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Field, "signal");

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("static", json!({ "bitWidth": 1 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Field, "static");
}

#[test]
fn test_invalid_identifier_rejected() {
    let err = elaborate(module_with(json!([reg("bad__name", json!({}))]))).unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Register, "bad__name");

    let err = elaborate(module_with(json!([reg("", json!({}))]))).unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert_error(&err, EntityKind::Register, crate::error::UNNAMED);
}

#[test]
fn test_self_clear_rules() {
    let module = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("go", json!({ "bitWidth": 1, "selfClear": true })),
            field("arm", json!({ "bitWidth": 1, "selfClear/Set": 1 })),
            field("old", json!({ "bitWidth": 1, "selfClear/Set": 0 })),
            field("idle", json!({ "bitWidth": 1, "selfClear": false })),
        ]})
    )])))
    .unwrap();
    let ctrl = module.register("ctrl").unwrap();
    assert_eq!(ctrl.field("go").unwrap().self_clear(), Some(SelfClear::Zeros));
    assert_eq!(ctrl.field("arm").unwrap().self_clear(), Some(SelfClear::Ones));
    assert_eq!(ctrl.field("old").unwrap().self_clear(), Some(SelfClear::Zeros));
    assert_eq!(ctrl.field("idle").unwrap().self_clear(), None);

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("go", json!({
            "bitWidth": 1, "access": "read-only", "selfClear": true
        }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Field, "go");

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("go", json!({ "bitWidth": 1, "selfClear/Set": 2 }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
}

#[test]
fn test_user_write_strobe_rules() {
    let module = elaborate(module_with(json!([reg(
        "status",
        json!({ "access": "read-only", "fields": [
            field("level", json!({ "bitWidth": 8, "userWriteStrobe": "yes" })),
            field("flag", json!({ "bitWidth": 1, "userWriteStrobe": "no" })),
        ]})
    )])))
    .unwrap();
    let status = module.register("status").unwrap();
    assert!(status.field("level").unwrap().has_user_write_strobe());
    assert!(!status.field("flag").unwrap().has_user_write_strobe());

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("level", json!({ "bitWidth": 8, "userWriteStrobe": true }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_error(&err, EntityKind::Field, "level");

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("level", json!({ "bitWidth": 8, "userWriteStrobe": "maybe" }))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
}

#[test]
fn test_structural_errors() {
    let err = elaborate(json!({ "name": "m", "description": "d", "registers": [] })).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Module, "m");
    assert!(err.cause().contains("'width'"));

    let err = elaborate(json!({
        "name": "m", "description": "d", "width": 64, "registers": []
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert!(err.cause().contains("'64'"));

    let err = elaborate(module_with(json!([reg("ctrl", json!({ "size": 4 }))]))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Register, "ctrl");
    assert!(err.cause().contains("'size'"));

    let err = elaborate(module_with(json!([{ "description": "no name" }]))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Register, crate::error::UNNAMED);

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("f", json!({}))]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Field, "f");
    assert!(err.cause().contains("'bitWidth'"));

    let err = elaborate(module_with(json!([reg("ctrl", json!({ "access": "rw" }))]))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Register, "ctrl");
}

#[test]
fn test_duplicate_names() {
    let err = elaborate(module_with(json!([reg("ctrl", json!({})), reg("CTRL", json!({}))])))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_error(&err, EntityKind::Register, "CTRL");

    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [
            field("en", json!({ "bitWidth": 1 })),
            field("En", json!({ "bitWidth": 1 })),
        ]})
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_error(&err, EntityKind::Field, "En");
}

#[test]
fn test_derived_symbol_collision() {
    // OFFSET_A_B_C is derived both by a.b_c and by a_b.c.
    let err = elaborate(module_with(json!([
        reg("a", json!({ "fields": [field("b_c", json!({ "bitWidth": 1 }))] })),
        reg("a_b", json!({ "fields": [field("c", json!({ "bitWidth": 1 }))] })),
    ])))
    .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_error(&err, EntityKind::Module, "uart");
    assert!(err.cause().contains("OFFSET_A_B_C"), "{}", err.cause());
}

#[test]
fn test_empty_module() {
    let module = elaborate(module_with(json!([]))).unwrap();
    assert!(module.registers().is_empty());
    assert_eq!(module.base_register(), None);
    assert_eq!(module.highest_address(), None);
}

#[test]
fn test_idempotence() {
    let module = elaborate(module_with(json!([
        reg("a", json!({ "addressOffset": 4, "access": "read-only", "fields": [
            field("level", json!({ "bitWidth": 8, "userWriteStrobe": "yes" })),
            field("flag", json!({ "bitWidth": 1, "bitOffset": 12, "reset": 1 })),
        ]})),
        reg("b", json!({ "reset": "0xFFFF0000" })),
        reg("c", json!({ "fields": [
            field("go", json!({ "bitWidth": 1, "selfClear": true })),
            field("arm", json!({ "bitWidth": 2, "selfClear/Set": 1, "access": "write-only" })),
        ]})),
    ])))
    .unwrap();

    let again = Module::elaborate(&module.to_desc()).unwrap();
    assert_eq!(again, module);

    let text = module.to_json_pretty().unwrap();
    let from_text = Module::from_json(&text).unwrap();
    assert_eq!(from_text, module);
    assert_eq!(from_text.to_json_pretty().unwrap(), text);
}

#[test]
fn test_from_json_text() {
    let module = Module::from_json(
        r#"{
            "name": "timer",
            "description": "A timer",
            "width": 32,
            "registers": [
                { "name": "load", "description": "Load value", "addressOffset": "0x10" },
                { "name": "ctrl", "description": "Control",
                  "fields": [
                      { "name": "enable", "description": "Enable", "bitWidth": 1, "reset": 0 },
                      { "name": "mode", "description": "Mode", "bitWidth": 2 }
                  ] }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(module.name(), "timer");
    assert_eq!(module.width(), 32);
    assert_eq!(module.register("ctrl").unwrap().address_offset(), 0);
    assert_eq!(module.register("load").unwrap().address_offset(), 0x10);
    let mode = module.register("ctrl").unwrap().field("mode").unwrap();
    assert_eq!(mode.bit_offset(), 1);
    assert_eq!(mode.mask(), 0b110);
}

#[test]
fn test_mistyped_values_name_their_entity() {
    let err = elaborate(module_with(json!([reg(
        "ctrl",
        json!({ "fields": [field("en", json!({ "bitWidth": true }))] })
    )])))
    .unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Field, "en");
    assert!(err.cause().contains("'bitWidth'"), "{err}");

    let err = elaborate(module_with(json!([reg("ctrl", json!({ "access": 3 }))]))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Register, "ctrl");

    let err = elaborate(module_with(json!([reg("ctrl", json!({ "fields": "en" }))]))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Register, "ctrl");

    let err = elaborate(module_with(json!({}))).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert_error(&err, EntityKind::Module, "uart");
    assert!(err.cause().contains("'registers'"), "{err}");

    let mut value = module_with(json!([]));
    value["name"] = json!(5);
    let err = elaborate(value).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
    assert!(err.cause().contains("'name'"), "{err}");
}

#[test]
fn test_module_name_must_be_identifier() {
    for name in ["../my uart", "my uart", "entity"] {
        let mut value = module_with(json!([reg("ctrl", json!({}))]));
        value["name"] = json!(name);
        let err = elaborate(value).unwrap_err();
        assert!(matches!(err, Error::Naming { .. }), "{err}");
        assert_error(&err, EntityKind::Module, name);
    }

    let module = elaborate(module_with(json!([reg("ctrl", json!({}))]))).unwrap();
    assert_eq!(module.name(), "uart");
}
