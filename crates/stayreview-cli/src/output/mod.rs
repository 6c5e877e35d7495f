//! Output formatting module for stayreview
//!
//! Provides text and JSON output formats for CLI output.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format - machine-readable output
    Json,
    /// Plain text format - one record per line, replies indented
    #[default]
    Text,
}

/// Formatter that can output data in text or JSON format
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter with the specified output format
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format data according to the configured output format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
            OutputFormat::Text => {
                let json_value = serde_json::to_value(data)?;
                let mut lines = Vec::new();
                render_text(&json_value, 0, &mut lines);
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format and print data to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        let output = self.format(data)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    }

    /// Format and print a list with a custom empty message
    ///
    /// For JSON format, wraps the array in a named object with a count field.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print_list<T: Serialize>(
        &self,
        data: &[T],
        empty_message: &str,
        collection_name: &str,
    ) -> Result<()> {
        let output = self.format_list(data, empty_message, collection_name)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    }

    fn format_list<T: Serialize>(
        &self,
        data: &[T],
        empty_message: &str,
        collection_name: &str,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut envelope = serde_json::Map::new();
                envelope.insert(collection_name.to_string(), serde_json::to_value(data)?);
                envelope.insert("count".to_string(), serde_json::json!(data.len()));
                Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
                    envelope,
                ))?)
            }
            OutputFormat::Text if data.is_empty() => Ok(empty_message.to_string()),
            OutputFormat::Text => self.format(&data),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

/// Render a JSON value as concise text lines.
///
/// Objects become one line with ID-like fields first. A `children` array of
/// objects is rendered below its parent, indented one level.
fn render_text(value: &serde_json::Value, depth: usize, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            let id_keys = ["review_id", "id"];
            let mut parts = Vec::new();

            for key in &id_keys {
                if let Some(val) = map.get(*key) {
                    parts.push(render_field_value(val));
                }
            }

            for (key, val) in map {
                if id_keys.contains(&key.as_str()) || key == "children" {
                    continue;
                }
                match val {
                    serde_json::Value::Array(arr) if arr.is_empty() => {}
                    serde_json::Value::Null => {}
                    _ => parts.push(format!("{}:{}", key, render_field_value(val))),
                }
            }

            out.push(format!("{}{}", "  ".repeat(depth), parts.join("  ")));

            if let Some(serde_json::Value::Array(children)) = map.get("children") {
                for child in children {
                    render_text(child, depth + 1, out);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr {
                render_text(item, depth, out);
            }
        }
        _ => out.push(format!("{}{}", "  ".repeat(depth), render_field_value(value))),
    }
}

/// Render a single field value as concise text
fn render_field_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            if s.contains(' ') || s.contains('\n') {
                format!("\"{}\"", s.replace('\n', "\\n"))
            } else {
                s.clone()
            }
        }
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(render_field_value).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| format!("{}:{}", k, render_field_value(v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct Node {
        id: i64,
        content: String,
        writer: Writer,
        children: Vec<Node>,
    }

    #[derive(Debug, Serialize)]
    struct Writer {
        id: i64,
        name: String,
    }

    fn node(id: i64, content: &str, children: Vec<Node>) -> Node {
        Node {
            id,
            content: content.to_string(),
            writer: Writer {
                id: 7,
                name: "alice".to_string(),
            },
            children,
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert_eq!(Formatter::default().format, OutputFormat::Text);
    }

    #[test]
    fn test_formatter_json_output() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format(&node(1, "Nice", vec![])).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["content"], "Nice");
        assert_eq!(parsed["writer"]["name"], "alice");
    }

    #[test]
    fn test_text_id_first_and_quoted() {
        let formatter = Formatter::new(OutputFormat::Text);
        let output = formatter.format(&node(1, "Quiet at night", vec![])).unwrap();

        assert!(output.starts_with('1'));
        assert!(output.contains("content:\"Quiet at night\""));
        assert!(output.contains("writer:{id:7,name:alice}"));
        assert!(!output.contains("children"));
    }

    #[test]
    fn test_text_nests_children() {
        let forest = vec![
            node(1, "root", vec![node(2, "reply", vec![node(4, "deeper", vec![])])]),
            node(3, "other", vec![]),
        ];
        let output = Formatter::new(OutputFormat::Text).format(&forest).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1  "));
        assert!(lines[1].starts_with("  2  "));
        assert!(lines[2].starts_with("    4  "));
        assert!(lines[3].starts_with("3  "));
    }

    #[test]
    fn test_list_envelope_json() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter
            .format_list(&[node(1, "a", vec![])], "none", "reviews")
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["count"], 1);
        assert!(parsed["reviews"].is_array());
    }

    #[test]
    fn test_list_empty_text() {
        let formatter = Formatter::new(OutputFormat::Text);
        let output = formatter
            .format_list::<Node>(&[], "No reviews yet.", "reviews")
            .unwrap();
        assert_eq!(output, "No reviews yet.");
    }
}
