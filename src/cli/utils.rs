use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::AdminError;
use crate::validation::ValidationErrors;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Stable code for a failed command; library errors keep their own code
pub fn failure_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<AdminError>() {
        Some(admin) => admin.error_code(),
        None => "CLI_ERROR",
    }
}

/// Reports a failed command. Validation failures were already printed field by field,
/// so in JSON mode they produce no second document.
pub fn report_failure(output_format: &OutputFormat, err: &anyhow::Error, verbose: bool) -> anyhow::Result<()> {
    let is_validation = matches!(err.downcast_ref::<AdminError>(), Some(AdminError::Validation(_)));
    match output_format {
        OutputFormat::Json if is_validation => Ok(()),
        OutputFormat::Json => output_error(output_format, &err.to_string(), Some(failure_code(err))),
        OutputFormat::Text if verbose => output_error(output_format, &format!("{err:?}"), None),
        OutputFormat::Text => output_error(output_format, &err.to_string(), None),
    }
}

/// Field-level validation messages, one per line in text mode
pub fn output_validation(output_format: &OutputFormat, errors: &ValidationErrors) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error_code": "VALIDATION_ERROR",
                    "errors": errors
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Please fix the following fields:");
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// A document or form value: pretty JSON, or YAML for reading in a terminal
pub fn output_value<T: Serialize>(output_format: &OutputFormat, heading: &str, value: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Text => {
            println!("# {}", heading);
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}

/// Reads a line from stdin when a secret was not passed as a flag
pub fn prompt_if_missing(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    eprint!("{}: ", prompt);
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_keep_their_code() {
        let forbidden = anyhow::Error::from(AdminError::status(403, None));
        assert_eq!(failure_code(&forbidden), "FORBIDDEN");

        let offline = anyhow::Error::from(AdminError::transport("connection refused"));
        assert_eq!(failure_code(&offline), "TRANSPORT_ERROR");

        assert_eq!(failure_code(&anyhow::anyhow!("Nothing to change")), "CLI_ERROR");
    }

    #[test]
    fn validation_failures_print_nothing_more_in_json_mode() {
        let mut v = crate::validation::Validator::new();
        v.add("title", "Title is required");
        let err = anyhow::Error::from(AdminError::Validation(v.finish().unwrap_err()));
        assert_eq!(failure_code(&err), "VALIDATION_ERROR");
        assert!(report_failure(&OutputFormat::Json, &err, false).is_ok());
    }
}
