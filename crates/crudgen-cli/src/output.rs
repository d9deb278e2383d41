//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crudgen_core::application::{BatchReport, Outcome, Summary, TargetReport};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    targets: &'a [TargetReport],
}

/// Writes everything the user sees on stdout.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    verbose: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Flag wins over config; Auto resolves by TTY.
        let requested = if args.output_format == OutputFormat::Auto {
            OutputFormat::from_config(&config.output.format)
        } else {
            args.output_format
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            verbose: args.verbose > 0,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Raw payload that must reach stdout regardless of mode (rendered
    /// files, completions).
    pub fn raw(&self, text: &str) -> io::Result<()> {
        self.term.write_str(text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{2713}", msg, |s| s.green().bold().to_string(), |m| {
            m.green().to_string()
        })
    }

    /// Shown even in quiet mode. JSON mode carries failures in the report.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{26a0}", msg, |s| s.yellow().bold().to_string(), |m| {
            m.yellow().to_string()
        })
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.symbol_line("\u{2139}", msg, |s| s.blue().bold().to_string(), |m| {
            m.blue().to_string()
        })
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty-printed JSON on stdout.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    // ── Reports ───────────────────────────────────────────────────────────

    /// One line per target, as it happens.
    pub fn target(&self, target: &TargetReport) -> io::Result<()> {
        let path = target.path().display();
        match &target.outcome {
            Outcome::Failed { reason } => self.error(&format!("{path}: {reason}")),
            Outcome::Created => self.success(&format!("created   {path}")),
            Outcome::Patched { rewrites } => {
                self.success(&format!("patched   {path} ({rewrites} rewrites)"))
            }
            Outcome::Planned => self.info(&format!("would create {path}")),
            Outcome::MissingModule => {
                self.warning(&format!("no module directory at {path}, skipped"))
            }
            Outcome::SkippedExisting | Outcome::Unchanged if self.verbose => {
                self.print(&format!("  {:<9} {path}", target.outcome.label()))
            }
            Outcome::SkippedExisting | Outcome::Unchanged => Ok(()),
        }
    }

    /// Closing summary, or the full report in JSON mode.
    pub fn report(&self, report: &BatchReport) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.json(&JsonReport {
                summary: report.summary(),
                targets: report.targets(),
            });
        }
        let s = report.summary();
        self.print("")?;
        self.header("Summary")?;
        self.print(&format!(
            "  created {}  planned {}  skipped {}  patched {} ({} rewrites)  unchanged {}  failed {}",
            s.created, s.planned, s.skipped, s.patched, s.rewrites, s.unchanged, s.failed
        ))?;
        if s.missing_modules > 0 {
            self.print(&format!("  modules without a directory: {}", s.missing_modules))?;
        }
        Ok(())
    }

    /// Progress bar for a batch on a TTY; hidden otherwise.
    pub fn progress(&self, len: usize) -> ProgressBar {
        if self.is_silent() || !io::stdout().is_terminal() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  {bar:32.cyan/dim} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn is_silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    fn symbol_line(
        &self,
        symbol: &str,
        msg: &str,
        paint_symbol: impl Fn(&str) -> String,
        paint_msg: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{symbol} {msg}")
        } else {
            format!("{} {}", paint_symbol(symbol), paint_msg(msg))
        };
        self.term.write_line(&line)
    }
}
