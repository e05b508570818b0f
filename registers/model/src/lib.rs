// Licensed under the Apache-2.0 license

//! Elaboration and validation of register-file descriptions.
//!
//! This crate turns a declarative description of a register file (a module
//! of addressable registers, each split into named bit fields) into a
//! frozen, validated [`Module`]. Every renderer in `hdlregs-generator`
//! consumes the same model and derives its symbols from [`naming`], so the
//! C header, the VHDL sources and the documentation cannot disagree.
//!
//! ## Usage
//!
//! ```
//! use hdlregs_model::{Access, Module};
//!
//! let module = Module::from_json(r#"{
//!     "name": "timer", "description": "A timer", "width": 32,
//!     "registers": [
//!         { "name": "ctrl", "description": "Control", "reset": 0,
//!           "fields": [
//!               { "name": "enable", "description": "Enable", "bitWidth": 1 },
//!               { "name": "prescale", "description": "Prescaler", "bitWidth": 4,
//!                 "bitOffset": 8, "reset": "0xA" } ] },
//!         { "name": "count", "description": "Counter value", "access": "read-only" }
//!     ]
//! }"#).unwrap();
//!
//! let ctrl = module.register("ctrl").unwrap();
//! assert_eq!(ctrl.reset(), Some(0xa00));
//! assert_eq!(module.register("count").unwrap().address_offset(), 4);
//! assert_eq!(module.register("count").unwrap().fields().next().unwrap().access(), Access::ReadOnly);
//! ```
//!
//! ## Module Organization
//!
//! - [`input`]: serde types for the JSON description
//! - [`module`], [`register`], [`field`]: the elaborated tree
//! - [`alloc`]: first-fit address and bit allocation
//! - [`validate`]: the post-elaboration invariant checks
//! - [`naming`]: symbol derivation shared by all renderers
//! - [`error`]: the error taxonomy

pub mod alloc;
pub mod error;
pub mod field;
pub mod identifier;
pub mod input;
pub mod module;
pub mod naming;
pub mod register;
pub mod validate;

pub use error::{Entity, EntityKind, Error, Result};
pub use field::{Access, Field, FieldRef, SelfClear};
pub use identifier::is_valid_identifier;
pub use input::{FieldDesc, ModuleDesc, RegisterDesc};
pub use module::{Module, SUPPORTED_WIDTHS};
pub use register::Register;
