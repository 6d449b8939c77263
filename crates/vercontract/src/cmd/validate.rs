use serde_json::Value;

use crate::cmd::ValidateArgs;
use crate::exit::{
    io_error, json_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS, USAGE,
};
use crate::output::{print_not_found, print_validation, OutputFormat};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = read_payload(&args)?;
    let registry = args.registry.load()?;
    let lookup = args.lookup.lookup();

    let Some(definition) = registry.find(&lookup, &args.lookup.version) else {
        print_not_found(&lookup, &args.lookup.version, format);
        return Ok(FAILURE);
    };

    let outcome = definition.validate(&payload);
    print_validation(definition, &outcome, format);

    match outcome {
        Ok(()) => Ok(SUCCESS),
        Err(_) => Ok(DATA_INVALID),
    }
}

fn read_payload(args: &ValidateArgs) -> CliResult<Value> {
    match (&args.json, &args.file) {
        (Some(json), None) => {
            serde_json::from_str(json).map_err(|err| json_error("parse --json", err))
        }
        (None, Some(path)) => {
            let context = format!("read {}", path.display());
            let text = std::fs::read_to_string(path).map_err(|err| io_error(&context, err))?;
            serde_json::from_str(&text).map_err(|err| json_error(&context, err))
        }
        _ => Err(CliError::new(USAGE, "exactly one of --json or --file is required")),
    }
}
