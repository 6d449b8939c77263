use crate::cmd::ResolveArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{print_definition, print_not_found, OutputFormat};

pub fn run(args: ResolveArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = args.registry.load()?;
    let lookup = args.lookup.lookup();

    let found = registry
        .find_endpoint(lookup.method, lookup.path)
        .zip(registry.find(&lookup, &args.lookup.version));

    match found {
        Some((endpoint, definition)) => {
            let params = endpoint.path_params(lookup.path).unwrap_or_default();
            print_definition(endpoint, definition, &params, format);
            Ok(SUCCESS)
        }
        None => {
            print_not_found(&lookup, &args.lookup.version, format);
            Ok(FAILURE)
        }
    }
}
