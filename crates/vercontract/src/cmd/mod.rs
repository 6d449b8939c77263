use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use tracing::debug;
use vercontract::endpoint::{EndpointConfig, EndpointDeclaration, MessageKind, SchemaConfig};
use vercontract::registry::{Lookup, Registry, RegistryConfig};

use crate::exit::{io_error, json_error, registry_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod resolve;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every bundled example against its definition.
    Check(CheckArgs),
    /// Print the definition matching a request or response.
    Resolve(ResolveArgs),
    /// Validate a payload against the matching definition.
    Validate(ValidateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Resolve(args) => resolve::run(args, format),
        Command::Validate(args) => validate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// JSON file holding an array of endpoint declarations.
    pub declarations: PathBuf,
    /// Enforce `format` keywords (email, date-time, ...).
    #[arg(long)]
    pub validate_formats: bool,
    /// Reject a version declared twice for the same endpoint and kind.
    #[arg(long)]
    pub strict_versions: bool,
}

impl RegistryArgs {
    fn config(&self) -> RegistryConfig {
        RegistryConfig {
            endpoint: EndpointConfig {
                schema: SchemaConfig {
                    validate_formats: self.validate_formats,
                },
                fail_on_duplicate_version: self.strict_versions,
            },
            check_examples_on_build: false,
        }
    }

    pub fn load(&self) -> CliResult<Registry> {
        let declarations = read_declarations(&self.declarations)?;
        let registry = Registry::build_with_config(&declarations, self.config())
            .map_err(|err| registry_error("build registry", err))?;
        debug!(
            path = %self.declarations.display(),
            endpoints = registry.len(),
            "registry loaded"
        );
        Ok(registry)
    }
}

fn read_declarations(path: &Path) -> CliResult<Vec<EndpointDeclaration>> {
    let context = format!("read {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|err| io_error(&context, err))?;
    serde_json::from_str(&text).map_err(|err| json_error(&context, err))
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum KindArg {
    Request,
    Response,
}

impl From<KindArg> for MessageKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Request => MessageKind::Request,
            KindArg::Response => MessageKind::Response,
        }
    }
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// HTTP method.
    #[arg(long, short = 'm', default_value = "get")]
    pub method: String,
    /// Concrete request path, e.g. /widgets/42.
    #[arg(long, short = 'p')]
    pub path: String,
    /// Which body to look up.
    #[arg(long, short = 'k', value_enum, default_value = "response")]
    pub kind: KindArg,
    /// Version to resolve.
    #[arg(long = "api-version", value_name = "VERSION")]
    pub version: String,
    /// Response status code to filter on.
    #[arg(long)]
    pub status: Option<u16>,
}

impl LookupArgs {
    pub fn lookup(&self) -> Lookup<'_> {
        let lookup = match MessageKind::from(self.kind) {
            MessageKind::Request => Lookup::request(&self.method, &self.path),
            MessageKind::Response => Lookup::response(&self.method, &self.path),
        };
        match self.status {
            Some(status) => lookup.with_status(status),
            None => lookup,
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
    #[command(flatten)]
    pub lookup: LookupArgs,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
    #[command(flatten)]
    pub lookup: LookupArgs,
    /// JSON payload.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
