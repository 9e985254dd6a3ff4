pub mod login;
pub mod shell;
pub mod signup;

use serde_json::json;

use crate::cli::utils::{output_categories, output_error, output_success, output_validation_errors};
use crate::cli::OutputFormat;
use crate::error::ClientResult;
use crate::forms::SubmitOutcome;
use crate::shell::App;

/// Print the category list, plus the last diagnostic when the list is stale
pub fn render_dashboard(app: &App, output_format: &OutputFormat) -> anyhow::Result<()> {
    let list = app.categories();
    if let Some(diagnostic) = list.diagnostic() {
        output_error(output_format, &diagnostic, Some("SYNC_FAILED"))?;
    }
    output_categories(output_format, &list.records(), list.edit_cursor(), &list.draft())
}

/// Report a form outcome. Returns true on success.
pub fn report_form_outcome<T>(
    output_format: &OutputFormat,
    outcome: &SubmitOutcome<T>,
    success_message: &str,
) -> anyhow::Result<bool> {
    match outcome {
        SubmitOutcome::Succeeded(_) => {
            output_success(output_format, success_message, None)?;
            Ok(true)
        }
        SubmitOutcome::Invalid(errors) => {
            output_error(output_format, "Please correct the highlighted fields", Some("VALIDATION_ERROR"))?;
            output_validation_errors(output_format, errors)?;
            Ok(false)
        }
        SubmitOutcome::Failed(message) => {
            output_error(output_format, message, Some("REQUEST_FAILED"))?;
            Ok(false)
        }
        SubmitOutcome::Busy => {
            output_error(output_format, "A submission is already in progress", Some("BUSY"))?;
            Ok(false)
        }
    }
}

/// Report a category operation, then show the list
pub fn report_sync_result<T>(
    app: &App,
    output_format: &OutputFormat,
    result: &ClientResult<T>,
    success_message: &str,
) -> anyhow::Result<()> {
    match result {
        Ok(_) => {
            output_success(
                output_format,
                success_message,
                Some(json!({ "count": app.categories().len() })),
            )?;
            render_dashboard(app, output_format)
        }
        Err(e) => {
            let message = app
                .categories()
                .diagnostic()
                .unwrap_or_else(|| e.to_string());
            output_error(output_format, &message, Some("SYNC_FAILED"))
        }
    }
}
