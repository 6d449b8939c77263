use tracing::info;

use crate::cmd::CheckArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_reports, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = args.registry.load()?;
    let reports = registry.check_examples();
    print_reports(&reports, format);

    let invalid = reports.iter().filter(|report| !report.is_valid()).count();
    info!(examples = reports.len(), invalid, "example check finished");

    if invalid > 0 {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}
