use colored::Colorize;
use std::io::{self, Write};

use crate::assistant::FetchOutcome;
use crate::services::{InspectionReport, LookupOutcome};

pub const SEPARATOR_WIDTH: usize = 40;

/// Receives pipeline events as the inspection runs.
pub trait InspectionObserver {
    fn lookup_started(&mut self, customer_id: &str);

    fn lookup_finished(&mut self, customer_id: &str, outcome: &LookupOutcome);

    fn fetch_started(&mut self, agent_id: &str);

    fn fetch_finished(&mut self, agent_id: &str, outcome: &FetchOutcome);

    fn finished(&mut self, report: &InspectionReport);
}

/// Renders inspection events as the human-readable console report.
///
/// The first write error is kept and every later event is dropped; call
/// [`ConsoleReporter::finish`] to get it back.
pub struct ConsoleReporter<W: Write> {
    out: W,
    first_message_chars: usize,
    error: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(first_message_chars: usize) -> Self {
        Self::new(io::stdout(), first_message_chars)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, first_message_chars: usize) -> Self {
        Self {
            out,
            first_message_chars,
            error: None,
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn line(&mut self, text: impl AsRef<str>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", text.as_ref()) {
            self.error = Some(e);
        }
    }

    fn fetch_failure(&mut self, detail: String) {
        self.line(format!("      ❌ {}", detail.red()));
    }
}

impl<W: Write> InspectionObserver for ConsoleReporter<W> {
    fn lookup_started(&mut self, customer_id: &str) {
        self.line("");
        self.line(
            format!("--- 1. Searching for Customer ID: {} ---", customer_id)
                .cyan()
                .bold()
                .to_string(),
        );
    }

    fn lookup_finished(&mut self, customer_id: &str, outcome: &LookupOutcome) {
        match outcome {
            LookupOutcome::Failed(e) => {
                self.line(format!(
                    "❌ {}",
                    format!("Error fetching from data store: {}", e).red()
                ));
            }
            LookupOutcome::NotFound => {
                self.line(format!(
                    "❌ {}",
                    format!("No customer found with ID: {}", customer_id).red()
                ));
            }
            LookupOutcome::NoAgents => {
                self.line(format!(
                    "✅ {}",
                    "Customer found, but 'agents' column is empty.".yellow()
                ));
            }
            LookupOutcome::Linked(list) => {
                self.line(format!(
                    "✅ {}",
                    format!(
                        "Found {} assistant(s) linked to this customer.",
                        list.segment_count()
                    )
                    .green()
                ));
                self.line("");
            }
        }
    }

    fn fetch_started(&mut self, agent_id: &str) {
        self.line(format!("   -> Fetching Vapi config for: {} ...", agent_id));
    }

    fn fetch_finished(&mut self, _agent_id: &str, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(config) => {
                let summary = config.summary(self.first_message_chars);
                self.line(format!("      ✅ {}", "Success!".green()));
                self.line(format!("         Name: {}", summary.name));
                self.line(format!("         Model: {}", summary.model));
                self.line(format!("         First Message: {}...", summary.first_message));
            }
            FetchOutcome::HttpError { status, body } => {
                self.fetch_failure(format!(
                    "Failed to fetch Vapi config (Status {}): {}",
                    status, body
                ));
            }
            FetchOutcome::TransportError(detail) => {
                self.fetch_failure(format!("Network Error: {}", detail));
            }
            FetchOutcome::DecodeError(detail) => {
                self.fetch_failure(format!("Invalid response: {}", detail));
            }
        }
    }

    fn finished(&mut self, report: &InspectionReport) {
        if report.lookup.is_linked() {
            self.line("-".repeat(SEPARATOR_WIDTH).dimmed().to_string());
        }
    }
}
