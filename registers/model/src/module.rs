// Licensed under the Apache-2.0 license

//! The elaborated register file.
//!
//! [`Module::elaborate`] turns a decoded [`ModuleDesc`] into a frozen
//! [`Module`], fail-fast:
//!
//! 1. module keys and bus width,
//! 2. register and field keys, in declaration order,
//! 3. address allocation,
//! 4. per register: zero-field synthesis, then bit allocation,
//! 5. the validation sweep of [`crate::validate`].

use crate::alloc::{allocate_addresses, allocate_bits, AddressRequest, BitRequest};
use crate::error::{Entity, Error, Result};
use crate::field::{Access, Field, SelfClear};
use crate::input::{
    FieldDesc, FlagValue, IntValue, ListValue, ModuleDesc, RegisterDesc, TextValue, UnknownKeys,
};
use crate::naming::hex_word;
use crate::register::Register;
use crate::validate::validate;

/// Bus widths a module may declare.
pub const SUPPORTED_WIDTHS: &[u32] = &[32];

/// A fully elaborated and validated register file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Module {
    name: String,
    description: String,
    width: u32,
    registers: Vec<Register>,
}

impl Module {
    /// Decodes and elaborates a JSON description.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::elaborate(&ModuleDesc::from_json(text)?)
    }

    /// Elaborates and validates a decoded description.
    pub fn elaborate(desc: &ModuleDesc) -> Result<Self> {
        let entity = Entity::module(reported_name(desc.name.as_ref()));
        reject_unknown(&desc.unknown, &entity)?;
        let name = require(desc.name.as_ref(), "name", &entity)?;
        let description = require(desc.description.as_ref(), "description", &entity)?;
        let width = require(desc.width.as_ref(), "width", &entity)?;
        let registers = require(desc.registers.as_ref(), "registers", &entity)?;
        let name = decode_text(name, "name", &entity)?;
        let description = decode_text(description, "description", &entity)?;
        let registers = decode_list(registers, "registers", &entity)?;

        let width = decode_int(Some(width), "width", &entity)?.unwrap_or_default();
        let width = u32::try_from(width)
            .ok()
            .filter(|w| SUPPORTED_WIDTHS.contains(w))
            .ok_or_else(|| {
                let supported: Vec<String> =
                    SUPPORTED_WIDTHS.iter().map(|w| format!("'{w}'")).collect();
                Error::structural(
                    entity.clone(),
                    format!(
                        "unsupported width '{width}' (supported widths: {})",
                        supported.join(", ")
                    ),
                )
            })?;

        let decls = registers
            .iter()
            .map(RegisterDecl::decode)
            .collect::<Result<Vec<_>>>()?;

        let requests: Vec<AddressRequest<'_>> = decls
            .iter()
            .map(|d| AddressRequest {
                name: &d.name,
                fixed: d.address_offset,
            })
            .collect();
        let addresses = allocate_addresses(name, &requests)?;

        let registers = decls
            .into_iter()
            .zip(addresses)
            .map(|(decl, address)| decl.elaborate(address, width))
            .collect::<Result<Vec<_>>>()?;

        let module = Module {
            name: name.to_string(),
            description: description.to_string(),
            width,
            registers,
        };
        validate(&module)?;
        Ok(module)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Bus width in bits; also the width of every register.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Registers in declaration order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// Register with the lowest address, or `None` for an empty module.
    pub fn base_register(&self) -> Option<&Register> {
        self.registers.iter().min_by_key(|r| r.address_offset())
    }

    /// Register with the highest address, or `None` for an empty module.
    pub fn high_register(&self) -> Option<&Register> {
        self.registers.iter().max_by_key(|r| r.address_offset())
    }

    pub fn lowest_address(&self) -> Option<u64> {
        self.base_register().map(Register::address_offset)
    }

    pub fn highest_address(&self) -> Option<u64> {
        self.high_register().map(Register::address_offset)
    }

    /// Description with every address and bit offset fixed to its resolved
    /// value. Elaborating it again yields an identical module.
    pub fn to_desc(&self) -> ModuleDesc {
        ModuleDesc {
            name: Some(TextValue::from(self.name.as_str())),
            description: Some(TextValue::from(self.description.as_str())),
            width: Some(IntValue::from(u64::from(self.width))),
            registers: Some(ListValue::List(
                self.registers.iter().map(register_desc).collect(),
            )),
            unknown: UnknownKeys::new(),
        }
    }

    /// [`Module::to_desc`] as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_desc().to_json_pretty()
    }
}

fn register_desc(reg: &Register) -> RegisterDesc {
    let fields: Vec<FieldDesc> = reg
        .fields()
        .filter(|f| !f.is_synthetic())
        .map(|f| field_desc(f.field()))
        .collect();
    RegisterDesc {
        name: Some(TextValue::from(reg.name())),
        description: Some(TextValue::from(reg.description())),
        access: Some(TextValue::from(reg.access().as_str())),
        address_offset: Some(IntValue::Text(hex_word(reg.address_offset()))),
        reset: reg.declared_reset().map(IntValue::from),
        fields: (!fields.is_empty()).then(|| ListValue::from(fields)),
        unknown: UnknownKeys::new(),
    }
}

fn field_desc(field: &Field) -> FieldDesc {
    let (self_clear, self_clear_set) = match field.self_clear() {
        Some(SelfClear::Zeros) => (Some(FlagValue::from(true)), None),
        Some(SelfClear::Ones) => (None, Some(FlagValue::Number(serde_json::Number::from(1u8)))),
        None => (None, None),
    };
    FieldDesc {
        name: Some(TextValue::from(field.name())),
        description: Some(TextValue::from(field.description())),
        bit_width: Some(IntValue::from(u64::from(field.bit_width()))),
        bit_offset: Some(IntValue::from(u64::from(field.bit_offset()))),
        reset: field.declared_reset().map(IntValue::from),
        access: field.declared_access().map(|a| TextValue::from(a.as_str())),
        self_clear,
        self_clear_set,
        user_write_strobe: field.has_user_write_strobe().then(|| FlagValue::from(true)),
        unknown: UnknownKeys::new(),
    }
}

/// A register whose keys have been decoded but whose address is not yet
/// resolved.
struct RegisterDecl {
    name: String,
    description: String,
    access: Access,
    address_offset: Option<u64>,
    reset: Option<u64>,
    fields: Vec<FieldDecl>,
}

impl RegisterDecl {
    fn decode(desc: &RegisterDesc) -> Result<Self> {
        let entity = Entity::register(reported_name(desc.name.as_ref()));
        reject_unknown(&desc.unknown, &entity)?;
        let name = require(desc.name.as_ref(), "name", &entity)?;
        let description = require(desc.description.as_ref(), "description", &entity)?;
        let name = decode_text(name, "name", &entity)?;
        let description = decode_text(description, "description", &entity)?;
        let access = decode_access(desc.access.as_ref(), &entity)?.unwrap_or_default();
        let address_offset = decode_int(desc.address_offset.as_ref(), "addressOffset", &entity)?;
        let reset = decode_int(desc.reset.as_ref(), "reset", &entity)?;
        let fields: &[FieldDesc] = match &desc.fields {
            Some(fields) => decode_list(fields, "fields", &entity)?,
            None => &[],
        };
        let fields = fields
            .iter()
            .map(FieldDecl::decode)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            access,
            address_offset,
            reset,
            fields,
        })
    }

    fn elaborate(self, address_offset: u64, width: u32) -> Result<Register> {
        let mut fields = self.fields;
        if fields.is_empty() {
            fields.push(FieldDecl {
                name: self.name.clone(),
                description: self.description.clone(),
                bit_width: width,
                bit_offset: None,
                reset: None,
                access: None,
                self_clear: None,
                user_write_strobe: false,
                synthetic: true,
            });
        }

        let requests: Vec<BitRequest<'_>> = fields
            .iter()
            .map(|f| BitRequest {
                name: &f.name,
                width: f.bit_width,
                fixed: f.bit_offset,
            })
            .collect();
        let offsets = allocate_bits(&self.name, width, &requests)?;

        let fields = fields
            .into_iter()
            .zip(offsets)
            .map(|(f, bit_offset)| Field {
                name: f.name,
                description: f.description,
                bit_width: f.bit_width,
                bit_offset,
                reset: f.reset,
                access: f.access,
                self_clear: f.self_clear,
                user_write_strobe: f.user_write_strobe,
                synthetic: f.synthetic,
            })
            .collect();

        Ok(Register {
            name: self.name,
            description: self.description,
            access: self.access,
            address_offset,
            reset: self.reset,
            width,
            fields,
        })
    }
}

/// A field whose keys have been decoded but whose offset may be unset.
struct FieldDecl {
    name: String,
    description: String,
    bit_width: u32,
    bit_offset: Option<u32>,
    reset: Option<u64>,
    access: Option<Access>,
    self_clear: Option<SelfClear>,
    user_write_strobe: bool,
    synthetic: bool,
}

impl FieldDecl {
    fn decode(desc: &FieldDesc) -> Result<Self> {
        let entity = Entity::field(reported_name(desc.name.as_ref()));
        reject_unknown(&desc.unknown, &entity)?;
        let name = require(desc.name.as_ref(), "name", &entity)?;
        let description = require(desc.description.as_ref(), "description", &entity)?;
        let bit_width = require(desc.bit_width.as_ref(), "bitWidth", &entity)?;
        let name = decode_text(name, "name", &entity)?;
        let description = decode_text(description, "description", &entity)?;

        let bit_width = decode_int(Some(bit_width), "bitWidth", &entity)?
            .and_then(|w| u32::try_from(w).ok())
            .filter(|&w| w > 0)
            .ok_or_else(|| Error::range(entity.clone(), "bit width is out of range"))?;
        let bit_offset = decode_int(desc.bit_offset.as_ref(), "bitOffset", &entity)?
            .map(|o| {
                u32::try_from(o).map_err(|_| {
                    Error::range(entity.clone(), format!("bit offset {o} is out of range"))
                })
            })
            .transpose()?;
        let reset = decode_int(desc.reset.as_ref(), "reset", &entity)?;
        let access = decode_access(desc.access.as_ref(), &entity)?;

        let self_clear = match (&desc.self_clear, &desc.self_clear_set) {
            (Some(_), Some(_)) => {
                return Err(Error::structural(
                    entity,
                    "'selfClear' and 'selfClear/Set' are mutually exclusive",
                ))
            }
            (Some(flag), None) => decode_flag(flag, "selfClear", &entity)?.then_some(SelfClear::Zeros),
            (None, Some(flag)) => match flag {
                FlagValue::Number(n) if n.as_u64() == Some(0) => Some(SelfClear::Zeros),
                FlagValue::Number(n) if n.as_u64() == Some(1) => Some(SelfClear::Ones),
                _ => {
                    return Err(Error::structural(
                        entity,
                        "selfClear/Set can be either 0 or 1 (all bits of the field are either cleared or set respectively)",
                    ))
                }
            },
            (None, None) => None,
        };
        let user_write_strobe = desc
            .user_write_strobe
            .as_ref()
            .map(|flag| decode_flag(flag, "userWriteStrobe", &entity))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            bit_width,
            bit_offset,
            reset,
            access,
            self_clear,
            user_write_strobe,
            synthetic: false,
        })
    }
}

/// Name to report errors against, empty if missing or mistyped.
fn reported_name(name: Option<&TextValue>) -> &str {
    name.and_then(TextValue::as_str).unwrap_or_default()
}

fn reject_unknown(unknown: &UnknownKeys, entity: &Entity) -> Result<()> {
    match unknown.keys().next() {
        Some(key) => Err(Error::structural(
            entity.clone(),
            format!("unsupported element '{key}'"),
        )),
        None => Ok(()),
    }
}

fn require<'a, T>(value: Option<&'a T>, key: &str, entity: &Entity) -> Result<&'a T> {
    value.ok_or_else(|| Error::structural(entity.clone(), format!("missing '{key}' element")))
}

fn decode_int(value: Option<&IntValue>, key: &str, entity: &Entity) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.to_u64().map_err(|cause| {
                Error::structural(entity.clone(), format!("invalid '{key}': {cause}"))
            })
        })
        .transpose()
}

fn decode_text<'a>(value: &'a TextValue, key: &str, entity: &Entity) -> Result<&'a str> {
    value
        .to_text()
        .map_err(|cause| Error::structural(entity.clone(), format!("invalid '{key}': {cause}")))
}

fn decode_list<'a, T>(value: &'a ListValue<T>, key: &str, entity: &Entity) -> Result<&'a [T]> {
    value
        .to_list()
        .map_err(|cause| Error::structural(entity.clone(), format!("invalid '{key}': {cause}")))
}

fn decode_access(value: Option<&TextValue>, entity: &Entity) -> Result<Option<Access>> {
    value
        .map(|v| {
            decode_text(v, "access", entity)?
                .parse::<Access>()
                .map_err(|cause| Error::structural(entity.clone(), cause))
        })
        .transpose()
}

fn decode_flag(flag: &FlagValue, key: &str, entity: &Entity) -> Result<bool> {
    flag.to_bool()
        .map_err(|cause| Error::structural(entity.clone(), format!("invalid '{key}': {cause}")))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
