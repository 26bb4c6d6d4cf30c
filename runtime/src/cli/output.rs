//! Shared CLI output: colors, status symbols, and machine-readable mode.
//!
//! Human output goes to stderr; stdout carries only exported documents and
//! `--json` payloads so it can be piped.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::Path;

pub const NO_COLOR_ENV: &str = "SITEMAP_SUITE_NO_COLOR";
pub const QUIET_ENV: &str = "SITEMAP_SUITE_QUIET";
pub const JSON_ENV: &str = "SITEMAP_SUITE_JSON";
pub const VERBOSE_ENV: &str = "SITEMAP_SUITE_VERBOSE";

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() || std::env::var_os(NO_COLOR_ENV).is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    pub fn info_sym(&self) -> &str {
        if self.use_color {
            "\x1b[34m\u{25cb}\x1b[0m"
        } else {
            "--"
        }
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }
}

/// Branded header line.
pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("Sitemap Suite"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

pub fn print_section(s: &Styled, title: &str) {
    eprintln!();
    eprintln!("  {}", s.bold(title));
}

/// A labelled value line with a leading symbol.
pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<18} {value}");
}

/// A labelled value line without a symbol.
pub fn print_row(label: &str, value: &str) {
    eprintln!("    {label:<20} {value}");
}

pub fn print_warning(s: &Styled, msg: &str) {
    eprintln!("  {} {}", s.warn_sym(), s.yellow(msg));
}

/// Format bytes into human-readable size (e.g., "28.7 MB").
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Thousands separators, e.g. 12,345.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn is_quiet() -> bool {
    std::env::var_os(QUIET_ENV).is_some()
}

pub fn is_verbose() -> bool {
    std::env::var_os(VERBOSE_ENV).is_some()
}

pub fn is_json() -> bool {
    std::env::var_os(JSON_ENV).is_some()
}

/// Write a generated document to `path`, or to stdout when no path is given.
pub fn write_document(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !is_quiet() && !is_json() {
                let s = Styled::new();
                eprintln!(
                    "  {} Wrote {} ({})",
                    s.ok_sym(),
                    path.display(),
                    format_size(content.len() as u64)
                );
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("failed to write to stdout")?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n").context("failed to write to stdout")?;
            }
        }
    }
    Ok(())
}

/// Print JSON output to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_styling() {
        let s = Styled::plain();
        assert_eq!(s.ok_sym(), "OK");
        assert_eq!(s.warn_sym(), "??");
        assert_eq!(s.green("done"), "done");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(50 * 1024 * 1024), "50.0 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
