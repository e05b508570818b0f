// Licensed under the Apache-2.0 license

//! Renderers turning an elaborated [`Module`] into C, VHDL and HTML.
//!
//! Every renderer reads the same frozen model and takes all of its symbols
//! from [`hdlregs_model::naming`], so the artifacts agree with each other.
//!
//! ## Usage
//!
//! ```
//! use hdlregs_generator::{generate, generate_all, GeneratorConfig, Target};
//! use hdlregs_model::Module;
//!
//! let module = Module::from_json(r#"{
//!     "name": "uart", "description": "UART", "width": 32,
//!     "registers": [ { "name": "data", "description": "Data" } ]
//! }"#).unwrap();
//!
//! let header = generate(&module, Target::CHeader, &GeneratorConfig::none()).unwrap();
//! assert!(header.contains("#define ADDR_DATA 0x00000000"));
//!
//! let artifacts = generate_all(&module, &GeneratorConfig::none()).unwrap();
//! assert_eq!(artifacts[0].file_name, "uart_regs.h");
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: generation options ([`GeneratorConfig`])
//! - [`c`]: C header
//! - [`vhdl`]: VHDL package and component
//! - [`html`]: HTML documentation

pub mod c;
pub mod config;
pub mod html;
pub mod vhdl;

mod output;

use anyhow::{Context, Result};
use hdlregs_model::naming::artifact_file_name;
use hdlregs_model::Module;
use log::debug;

pub use config::GeneratorConfig;
pub use hdlregs_model::naming::ArtifactKind as Target;

/// One rendered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub target: Target,
    pub file_name: String,
    pub contents: String,
}

/// Renders a single artifact.
pub fn generate(module: &Module, target: Target, config: &GeneratorConfig) -> Result<String> {
    debug!("rendering {target} for module '{}'", module.name());
    let rendered = match target {
        Target::CHeader => c::generate_c_header(module, config),
        Target::VhdlPackage => vhdl::generate_vhdl_package(module, config),
        Target::VhdlComponent => vhdl::generate_vhdl_component(module, config),
        Target::Html => html::generate_html(module, config),
    };
    rendered.with_context(|| format!("failed to render {target} for module '{}'", module.name()))
}

/// Renders every target enabled in `config`, in configuration order.
pub fn generate_all(module: &Module, config: &GeneratorConfig) -> Result<Vec<Artifact>> {
    config
        .targets
        .iter()
        .map(|&target| -> Result<Artifact> {
            Ok(Artifact {
                target,
                file_name: artifact_file_name(module.name(), target),
                contents: generate(module, target, config)?,
            })
        })
        .collect()
}
