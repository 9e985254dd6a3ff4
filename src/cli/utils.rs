use std::io::Write;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::categories::EditCursor;
use crate::cli::OutputFormat;
use crate::model::{Category, CategoryDraft};
use crate::validation::ValidationErrors;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
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
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
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

/// Output per-field validation messages
pub fn output_validation_errors(
    output_format: &OutputFormat,
    errors: &ValidationErrors,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let fields: serde_json::Map<String, Value> = errors
                .iter()
                .map(|(field, messages)| (field.to_string(), json!(messages)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": "validation failed",
                    "error_code": "VALIDATION_ERROR",
                    "field_errors": fields
                }))?
            );
        }
        OutputFormat::Text => {
            for (field, messages) in errors.iter() {
                for message in messages {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
    Ok(())
}

/// Output the category list with positions, marking the record being edited
pub fn output_categories(
    output_format: &OutputFormat,
    records: &[Category],
    cursor: Option<EditCursor>,
    draft: &CategoryDraft,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "categories": records,
                    "editing": cursor.map(|c| c.id),
                    "draft": draft
                }))?
            );
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No categories");
            }
            for (position, record) in records.iter().enumerate() {
                let marker = match cursor {
                    Some(c) if c.id == record.id => "*",
                    _ => " ",
                };
                println!(
                    "{}[{}] #{} {}: {}",
                    marker, position, record.id, record.name, record.description
                );
            }
            let action = if cursor.is_some() { "Update" } else { "Add" };
            println!(
                "Draft ({}): name={:?} description={:?}",
                action, draft.name, draft.description
            );
        }
    }
    Ok(())
}

/// `line` without a trailing `\n` or `\r\n`; other whitespace is kept
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Line-oriented stdin reader shared by prompts and the interactive shell
pub struct LineReader {
    lines: Lines<BufReader<Stdin>>,
}

impl LineReader {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one line; `None` at end of input
    pub async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }

    /// Prompt for a secret; only the line terminator is removed
    pub async fn prompt_secret(&mut self, label: &str) -> anyhow::Result<String> {
        let line = self.prompt(&format!("{}: ", label)).await?.unwrap_or_default();
        Ok(strip_line_ending(&line).to_string())
    }

    /// Prompt showing the current value; an empty answer keeps it
    pub async fn prompt_with_default(&mut self, label: &str, current: &str) -> anyhow::Result<String> {
        let shown = if current.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, current)
        };
        match self.prompt(&shown).await? {
            Some(line) if !line.trim().is_empty() => Ok(line.trim().to_string()),
            _ => Ok(current.to_string()),
        }
    }
}
