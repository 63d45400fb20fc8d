//! Token-to-document transform engine for Gherkin feature files, plus the
//! bounded-concurrency batch processor that applies it across a tree.
//!
//! The engine canonicalises indentation and table alignment and lets authors
//! embed inline post-processing directives: a comment naming a registered
//! tag (`# @jq`) pipes the following block through the registered shell
//! command, splicing its output into the document. It does not validate
//! document semantics; it re-renders what the scanner classified.

use std::collections::BTreeMap;
use std::path::Path;

use gherkin_fmt_config::{Config, IndentConfig};
use gherkin_fmt_parser::Dialect;

mod batch;
mod command;
mod error;
mod render;
mod section;
mod table;

pub use batch::discover_files;
pub use command::CommandPipeline;
pub use error::{BatchError, FormatError, FormatResult};
pub use section::{Direction, Section, SectionChain};
pub use table::format_rows;

/// Formats feature files: indentation, table alignment and embedded command
/// substitution, driven by an indentation configuration and a tag-to-command
/// registry.
pub struct FeatureFormatter {
    indent: IndentConfig,
    commands: BTreeMap<String, String>,
    dialect: Dialect,
}

impl FeatureFormatter {
    /// Build a formatter with the default (English) dialect.
    pub fn new(indent: IndentConfig, commands: BTreeMap<String, String>) -> Self {
        Self {
            indent,
            commands,
            dialect: Dialect::default(),
        }
    }

    /// Build a formatter from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.indent, config.commands.clone())
    }

    /// Swap in a custom keyword dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Transform in-memory document text into its canonical form. The result
    /// has lines joined by `\n` with no forced trailing newline.
    pub fn transform_source(&self, contents: &str) -> FormatResult<String> {
        let tokens = gherkin_fmt_parser::scan(contents, &self.dialect);
        let chain = SectionChain::build(tokens);
        render::transform(&chain, &self.indent, &self.commands)
    }

    /// Transform the file at `path`, returning the produced document without
    /// touching the file.
    pub fn transform_file(&self, path: &Path) -> FormatResult<String> {
        let tokens = gherkin_fmt_parser::parse_file(path, &self.dialect)?;
        let chain = SectionChain::build(tokens);
        render::transform(&chain, &self.indent, &self.commands)
    }
}
