use crate::conf::types::PanelConfig;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `server.port`.
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field,
            message: message.into(),
        });
    }

    fn warning(&mut self, field: &'static str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field,
            message: message.into(),
        });
    }

    pub fn render_pretty(&self, file: &Path) {
        if !self.has_violations() {
            return;
        }

        println!(
            "configuration validation failed ({} errors, {} warnings)\n",
            self.errors.len(),
            self.warnings.len()
        );
        println!("{}", file.display());

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            match issue.severity {
                Severity::Error => {
                    println!("  {}: {}: {}", "error".red().bold(), issue.field, issue.message);
                }
                Severity::Warning => {
                    println!(
                        "  {}: {}: {}",
                        "warning".yellow().bold(),
                        issue.field,
                        issue.message
                    );
                }
            }
        }
        println!();
    }
}

/// Check semantic constraints hcl deserialization cannot express.
pub fn validate(config: &PanelConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let server = &config.server;
    let tail = &config.tail;

    if server.log_path.as_os_str().is_empty() {
        report.error("server.log_path", "must not be empty");
    }

    if server.address.trim().is_empty() {
        report.error("server.address", "must not be empty");
    }

    if server.port == 0 {
        report.error("server.port", "must be between 1 and 65535");
    }

    if !(1..=60_000).contains(&server.probe_timeout_ms) {
        report.error(
            "server.probe_timeout_ms",
            format!("must be between 1 and 60000 (got {})", server.probe_timeout_ms),
        );
    }

    if server.probe_interval_secs == 0 {
        report.warning(
            "server.probe_interval_secs",
            "periodic probing is disabled; status only changes on log activity",
        );
    }

    if tail.poll_interval_ms == 0 {
        report.error("tail.poll_interval_ms", "must be at least 1");
    }

    if tail.retry_initial_ms == 0 {
        report.error("tail.retry_initial_ms", "must be at least 1");
    }

    if tail.retry_initial_ms > tail.retry_max_ms {
        report.error(
            "tail.retry_max_ms",
            format!(
                "must not be smaller than tail.retry_initial_ms ({} < {})",
                tail.retry_max_ms, tail.retry_initial_ms
            ),
        );
    }

    report
}

impl PanelConfig {
    pub fn validate(&self) -> ValidationReport {
        validate(self)
    }
}
