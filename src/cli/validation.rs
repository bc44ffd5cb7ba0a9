use crate::cli::args::CliArgs;
use crate::model;
use crate::output::OutputFormat;
use crate::query::InsuranceSelector;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.date_from.as_deref() {
        model::parse_date(raw).map_err(|e| format!("invalid --date-from: {e}"))?;
    }
    if let Some(raw) = args.date_to.as_deref() {
        model::parse_date(raw).map_err(|e| format!("invalid --date-to: {e}"))?;
    }
    if let Some(raw) = args.insurance.as_deref() {
        if InsuranceSelector::parse(raw).is_none() {
            return Err(format!(
                "invalid --insurance '{raw}', expected any, yes, or no"
            ));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, or csv"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive seconds".to_string());
        }
    }
    Ok(())
}
