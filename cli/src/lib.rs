// Licensed under the Apache-2.0 license

//! Command-line driver: reads a register description, elaborates it and
//! writes the generated artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use hdlregs_generator::{generate_all, GeneratorConfig, Target};
use hdlregs_model::Module;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "hdlregs",
    author,
    version,
    about = "Generate C headers, VHDL and HTML documentation from a register description"
)]
pub struct Cli {
    /// Register description (JSON)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory the generated files are written to
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Artifact to generate (c, vhdl-pkg, vhdl, html); repeat to select
    /// several. All artifacts are generated if none is given.
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub targets: Vec<Target>,

    /// Leave the generation time out of the generated files
    #[arg(long)]
    pub no_timestamp: bool,

    /// Also write the elaborated description, with every address and bit
    /// offset fixed, to this file
    #[arg(long, value_name = "FILE")]
    pub emit_elaborated: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Elaborate and validate only; do not write any file
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Generator configuration selected by the command line.
    pub fn generator_config(&self) -> GeneratorConfig {
        let config = if self.no_timestamp {
            GeneratorConfig::none()
        } else {
            GeneratorConfig::with_defaults()
        };
        if self.targets.is_empty() {
            config
        } else {
            config.with_targets(&self.targets)
        }
    }
}

/// Reads and elaborates the description at `path`.
pub fn load_module(path: &Path) -> Result<Module> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let module = Module::from_json(&text)
        .with_context(|| format!("invalid register description {}", path.display()))?;
    info!(
        "elaborated module '{}' ({} registers)",
        module.name(),
        module.registers().len()
    );
    Ok(module)
}

/// Runs the command line and returns the paths of the files written.
pub fn run(cli: &Cli) -> Result<Vec<PathBuf>> {
    let module = load_module(&cli.input)?;
    if cli.check {
        info!("{} is valid", cli.input.display());
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    if let Some(path) = &cli.emit_elaborated {
        write_file(path, &module.to_json_pretty()?)?;
        written.push(path.clone());
    }

    let config = cli.generator_config();
    debug!("generator configuration: {config:?}");
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    for artifact in generate_all(&module, &config)? {
        let path = cli.out_dir.join(&artifact.file_name);
        write_file(&path, &artifact.contents)?;
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
