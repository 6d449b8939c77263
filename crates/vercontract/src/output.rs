use std::collections::BTreeMap;
use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use vercontract::endpoint::{Endpoint, EndpointDefinition, MessageKind, ValidationFailure};
use vercontract::registry::{ExampleReport, Lookup};

const REPORT_SCHEMA: &str = "https://schemas.3leaps.dev/vercontract/cli/v1/example-report.schema.json";
const DEFINITION_SCHEMA: &str = "https://schemas.3leaps.dev/vercontract/cli/v1/definition.schema.json";
const VALIDATION_SCHEMA: &str = "https://schemas.3leaps.dev/vercontract/cli/v1/validation.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    schema_id: &'a str,
    total: usize,
    invalid: usize,
    examples: Vec<ReportEntry<'a>>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    endpoint: &'a str,
    kind: MessageKind,
    version: &'a str,
    index: usize,
    valid: bool,
    violations: &'a [String],
}

pub fn print_reports(reports: &[ExampleReport], format: OutputFormat) {
    let invalid = reports.iter().filter(|report| !report.is_valid()).count();

    match format {
        OutputFormat::Json => {
            let out = ReportOutput {
                schema_id: REPORT_SCHEMA,
                total: reports.len(),
                invalid,
                examples: reports
                    .iter()
                    .map(|report| ReportEntry {
                        endpoint: &report.endpoint,
                        kind: report.kind,
                        version: &report.version,
                        index: report.index,
                        valid: report.is_valid(),
                        violations: violations(&report.outcome),
                    })
                    .collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENDPOINT", "KIND", "VERSION", "EXAMPLE", "RESULT"]);
            for report in reports {
                table.add_row(vec![
                    report.endpoint.clone(),
                    report.kind.to_string(),
                    report.version.clone(),
                    report.index.to_string(),
                    outcome_label(&report.outcome),
                ]);
            }
            println!("{table}");
            println!("{} examples, {} invalid", reports.len(), invalid);
        }
        OutputFormat::Pretty => {
            for report in reports {
                println!(
                    "{} {} v{} example {}: {}",
                    report.endpoint,
                    report.kind,
                    report.version,
                    report.index,
                    outcome_label(&report.outcome)
                );
            }
            println!("{} examples, {} invalid", reports.len(), invalid);
        }
    }
}

#[derive(Serialize)]
struct DefinitionOutput<'a> {
    schema_id: &'a str,
    found: bool,
    endpoint: &'a str,
    method: &'a str,
    route: &'a str,
    kind: MessageKind,
    version: &'a str,
    statuses: Option<Vec<u16>>,
    path_params: &'a BTreeMap<String, String>,
    examples: usize,
    schema: &'a Value,
}

pub fn print_definition(
    endpoint: &Endpoint,
    definition: &EndpointDefinition,
    path_params: &BTreeMap<String, String>,
    format: OutputFormat,
) {
    let statuses = definition
        .statuses()
        .map(|codes| codes.iter().copied().collect::<Vec<_>>());

    match format {
        OutputFormat::Json => {
            let out = DefinitionOutput {
                schema_id: DEFINITION_SCHEMA,
                found: true,
                endpoint: endpoint.name(),
                method: endpoint.method(),
                route: endpoint.route(),
                kind: definition.kind(),
                version: definition.version(),
                statuses,
                path_params,
                examples: definition.example_count(),
                schema: definition.schema(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["endpoint", endpoint.name()])
                .add_row(vec!["method", endpoint.method()])
                .add_row(vec!["route", endpoint.route()])
                .add_row(vec!["kind", definition.kind().as_str()])
                .add_row(vec!["version", definition.version()])
                .add_row(vec!["statuses".to_string(), statuses_label(statuses.as_deref())])
                .add_row(vec!["path params".to_string(), params_label(path_params)])
                .add_row(vec![
                    "examples".to_string(),
                    definition.example_count().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} {} ({} v{})",
                endpoint.name(),
                endpoint.method().to_ascii_uppercase(),
                endpoint.route(),
                definition.kind(),
                definition.version()
            );
            println!("statuses: {}", statuses_label(statuses.as_deref()));
            println!("path params: {}", params_label(path_params));
            println!(
                "{}",
                serde_json::to_string_pretty(definition.schema())
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

#[derive(Serialize)]
struct NotFoundOutput<'a> {
    schema_id: &'a str,
    found: bool,
    method: &'a str,
    path: &'a str,
    kind: MessageKind,
    version: &'a str,
    status: Option<u16>,
}

pub fn print_not_found(lookup: &Lookup<'_>, version: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = NotFoundOutput {
                schema_id: DEFINITION_SCHEMA,
                found: false,
                method: lookup.method,
                path: lookup.path,
                kind: lookup.kind,
                version,
                status: lookup.status,
            };
            print_json(&out);
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let status = lookup
                .status
                .map(|status| format!(" status {status}"))
                .unwrap_or_default();
            println!(
                "no {} definition for {} {} v{}{}",
                lookup.kind,
                lookup.method.to_ascii_uppercase(),
                lookup.path,
                version,
                status
            );
        }
    }
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    schema_id: &'a str,
    definition: String,
    valid: bool,
    schema_failure: bool,
    violations: &'a [String],
}

pub fn print_validation(
    definition: &EndpointDefinition,
    outcome: &Result<(), ValidationFailure>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = ValidationOutput {
                schema_id: VALIDATION_SCHEMA,
                definition: definition.description(),
                valid: outcome.is_ok(),
                schema_failure: outcome
                    .as_ref()
                    .err()
                    .is_some_and(ValidationFailure::is_schema_failure),
                violations: violations(outcome),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEFINITION", "VIOLATION"]);
            for violation in violations(outcome) {
                table.add_row(vec![definition.description(), violation.clone()]);
            }
            if outcome.is_ok() {
                table.add_row(vec![definition.description(), "-".to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match outcome {
            Ok(()) => println!("{}: valid", definition.description()),
            Err(failure) => {
                println!(
                    "{}: {} violation(s)",
                    definition.description(),
                    failure.violations.len()
                );
                for violation in &failure.violations {
                    println!("  {violation}");
                }
            }
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn violations(outcome: &Result<(), ValidationFailure>) -> &[String] {
    match outcome {
        Ok(()) => &[],
        Err(failure) => &failure.violations,
    }
}

fn outcome_label(outcome: &Result<(), ValidationFailure>) -> String {
    match outcome {
        Ok(()) => "ok".to_string(),
        Err(failure) => failure.violations.join("; "),
    }
}

fn statuses_label(statuses: Option<&[u16]>) -> String {
    match statuses {
        None => "any".to_string(),
        Some(codes) => codes
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn params_label(params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return "-".to_string();
    }
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
