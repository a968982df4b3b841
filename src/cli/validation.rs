use crate::cli::args::CliArgs;

pub const MAX_RETRY_ATTEMPTS: u32 = 10;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
    }
    if let Some(attempts) = args.retry_attempts {
        if attempts == 0 || attempts > MAX_RETRY_ATTEMPTS {
            return Err(format!(
                "invalid retry-attempts, expected 1 to {MAX_RETRY_ATTEMPTS}"
            ));
        }
    }
    if let (Some(base), Some(max)) = (args.retry_base_delay_ms, args.retry_max_delay_ms) {
        if base > max {
            return Err("retry-base-delay must not exceed retry-max-delay".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or xml"
            ));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --base-url '{raw}': {e}"))?;
    }
    if let Some(raw) = args.header.as_deref() {
        if !raw.contains(':') {
            return Err(format!("invalid --header '{raw}', expected 'Key: Value'"));
        }
    }
    if args.interactive && args.output.is_some() {
        return Err("--output cannot be combined with --interactive".to_string());
    }
    Ok(())
}
