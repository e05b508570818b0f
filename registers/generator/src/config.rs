// Licensed under the Apache-2.0 license

//! Configuration shared by all renderers.
//!
//! [`GeneratorConfig`] controls the layout of generated text (indentation),
//! the provenance banner written at the top of every artifact, and which
//! artifacts are produced at all.

use crate::Target;
use chrono::Local;

/// Version recorded in the banner of generated files.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format of the timestamp written by [`GeneratorConfig::with_defaults`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Configuration for artifact generation.
///
/// # Example
///
/// ```
/// use hdlregs_generator::{GeneratorConfig, Target};
///
/// // Every artifact, stamped with the current local time.
/// let config = GeneratorConfig::with_defaults();
/// assert!(config.timestamp.is_some());
/// assert!(config.is_enabled(Target::Html));
///
/// // Reproducible output for the C header only.
/// let config = GeneratorConfig::none()
///     .with_targets(&[])
///     .add_target(Target::CHeader);
/// assert!(config.timestamp.is_none());
/// assert!(config.is_enabled(Target::CHeader));
/// assert!(!config.is_enabled(Target::VhdlComponent));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,

    /// Timestamp written into the banner. `None` leaves it out, so the
    /// output only depends on the module.
    pub timestamp: Option<String>,

    /// Generator version written into the banner.
    pub version: String,

    /// Artifacts to produce, in output order.
    pub targets: Vec<Target>,
}

impl GeneratorConfig {
    /// All targets, four-space indentation, stamped with the current time.
    pub fn with_defaults() -> Self {
        Self {
            timestamp: Some(Local::now().format(TIMESTAMP_FORMAT).to_string()),
            ..Self::none()
        }
    }

    /// All targets, four-space indentation, no timestamp.
    pub fn none() -> Self {
        Self {
            indent_width: 4,
            timestamp: None,
            version: GENERATOR_VERSION.to_string(),
            targets: Target::ALL.to_vec(),
        }
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    /// Replaces the enabled targets.
    pub fn with_targets(mut self, targets: &[Target]) -> Self {
        self.targets.clear();
        for &target in targets {
            self = self.add_target(target);
        }
        self
    }

    /// Enables one more target; enabling a target twice has no effect.
    pub fn add_target(mut self, target: Target) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn is_enabled(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    /// Lines of the provenance banner, without comment markers.
    pub fn banner(&self, module: &str) -> Vec<String> {
        let mut lines = vec![
            format!("Register definitions for module '{module}'"),
            String::new(),
        ];
        match &self.timestamp {
            Some(ts) => lines.push(format!(
                "This file was generated by hdlregs {} on {ts}.",
                self.version
            )),
            None => lines.push(format!(
                "This file was generated by hdlregs {}.",
                self.version
            )),
        }
        lines.push("Do not edit it manually.".to_string());
        lines
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::none()
    }
}
