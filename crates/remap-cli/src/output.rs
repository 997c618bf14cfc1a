//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! rendering for rule check reports, rule traces, the transform catalog,
//! and progress bars for streamed files.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::handlers::{CatalogEntry, CheckReport, CheckStatus, RuleTrace};
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for command reports
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the result of checking a rule set
    fn format_check_report(&self, report: &CheckReport) -> Result<String>;

    /// Format per-rule outcomes of a transform
    fn format_rule_traces(&self, traces: &[RuleTrace]) -> Result<String>;

    /// Format the list of catalog transforms
    fn format_catalog(&self, entries: &[CatalogEntry]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_check_report(&self, report: &CheckReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_check_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_rule_traces(&self, traces: &[RuleTrace]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_rule_traces_human(traces)),
            _ => self.format(&traces),
        }
    }

    fn format_catalog(&self, entries: &[CatalogEntry]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(render_table(
                &["TRANSFORM", "DESCRIPTION"],
                entries
                    .iter()
                    .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
                    .collect(),
            )),
            _ => self.format(&entries),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    ///
    /// Progress bars draw on stderr and are only shown when it is a terminal.
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let mut value_json = serde_json::to_value(value)?;
            redaction::redact_json_value(&mut value_json);
            trace!("Outputting data: {}", value_json);
        }

        let formatted = self.format.format(value)?;
        self.write_block(&formatted)
    }

    /// Write a rule check report
    pub fn check_report(&mut self, report: &CheckReport) -> Result<()> {
        let formatted = self.format.format_check_report(report)?;
        self.write_block(&formatted)
    }

    /// Write per-rule outcomes
    pub fn rule_traces(&mut self, traces: &[RuleTrace]) -> Result<()> {
        let formatted = self.format.format_rule_traces(traces)?;
        self.write_block(&formatted)
    }

    /// Write the transform catalog
    pub fn catalog(&mut self, entries: &[CatalogEntry]) -> Result<()> {
        let formatted = self.format.format_catalog(entries)?;
        self.write_block(&formatted)
    }

    /// Create a byte progress bar for reading a file of known length
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    fn write_block(&mut self, content: &str) -> Result<()> {
        if content.ends_with('\n') {
            self.write(content)
        } else {
            self.writeln(content)
        }
    }
}

/// Helper function to create a progress bar style for byte counts
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

/// Render rows as an aligned table
fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut output = render_row(headers.to_vec());
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    output.push('\n');
    for row in &rows {
        output.push_str(&render_row(row.iter().map(String::as_str).collect()));
        output.push('\n');
    }
    output
}

/// Format a check report for human reading
fn format_check_report_human(report: &CheckReport) -> String {
    let mut output = String::new();

    output.push_str(&render_table(
        &["#", "RULE", "COMPUTED BY", "STATUS"],
        report
            .rules
            .iter()
            .map(|rule| {
                vec![
                    rule.index.to_string(),
                    rule.rule.clone(),
                    rule.computed_by.clone(),
                    status_label(rule.status).to_string(),
                ]
            })
            .collect(),
    ));

    let flagged: Vec<_> = report.rules.iter().filter(|r| !r.issues.is_empty()).collect();
    if !flagged.is_empty() {
        output.push('\n');
        for rule in flagged {
            for issue in &rule.issues {
                output.push_str(&format!(
                    "{} rule {}: {}\n",
                    status_icon(rule.status),
                    rule.index,
                    issue
                ));
            }
        }
    }

    output.push_str(&format!(
        "\n{} rule(s): {} ok, {} warning(s), {} error(s)\n",
        report.total, report.passed, report.warnings, report.errors
    ));
    output
}

/// Format rule traces for human reading
fn format_rule_traces_human(traces: &[RuleTrace]) -> String {
    let with_records = traces.iter().any(|t| t.record.is_some());
    let mut headers = Vec::new();
    if with_records {
        headers.push("RECORD");
    }
    headers.extend(["RULE", "OUTCOME", "DETAIL"]);

    render_table(
        &headers,
        traces
            .iter()
            .map(|trace| {
                let mut row = Vec::new();
                if with_records {
                    row.push(trace.record.map(|r| r.to_string()).unwrap_or_default());
                }
                row.push(trace.rule.clone());
                row.push(trace.outcome.to_string());
                row.push(trace.detail.clone().unwrap_or_default());
                row
            })
            .collect(),
    )
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "ok",
        CheckStatus::Warning => "warning",
        CheckStatus::Error => "error",
    }
}

fn status_icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Ok => "✅",
        CheckStatus::Warning => "⚠️",
        CheckStatus::Error => "❌",
    }
}
