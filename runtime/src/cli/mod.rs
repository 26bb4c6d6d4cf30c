//! Command-line front end for the `sitemap-suite` binary.

pub mod compare_cmd;
pub mod context;
pub mod convert_cmd;
pub mod fetch_cmd;
pub mod input;
pub mod merge_cmd;
pub mod output;
pub mod progress;
pub mod serve;
pub mod stats_cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use context::AppContext;
use sitemap_core::{ExportFormat, MergeOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-suite",
    version,
    about = "Fetch, convert, compare, merge and analyze XML sitemaps"
)]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress and summaries
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show full lists and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file (default: ~/.sitemap-suite/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fetch through a deployed proxy instead of in-process
    #[arg(long, global = true, value_name = "ENDPOINT")]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fetch proxy (POST /api/fetch-sitemap)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load a remote sitemap, resolving indexes, and summarize or export it
    Fetch {
        /// Sitemap URL or bare domain
        url: String,
        #[arg(long, short, value_enum)]
        format: Option<FormatArg>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Convert a local sitemap to another format
    Convert {
        input: PathBuf,
        #[arg(long, short, value_enum)]
        format: FormatArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Build a sitemap XML from a CSV URL list
    CsvToXml {
        input: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Diff two sitemaps (files or URLs)
    Compare {
        old: String,
        new: String,
        /// Write a Markdown report
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// Merge several sitemaps into one
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<String>,
        /// Keep every occurrence of a URL
        #[arg(long)]
        keep_duplicates: bool,
        /// Order by descending priority
        #[arg(long)]
        sort_by_priority: bool,
        #[arg(long, short, value_enum, default_value_t = FormatArg::Xml)]
        format: FormatArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Summary statistics for a sitemap (file or URL)
    Stats { input: String },

    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
    Xml,
    Xls,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Xml => ExportFormat::Xml,
            FormatArg::Xls => ExportFormat::Xls,
        }
    }
}

impl Cli {
    /// Mirror the global flags into the environment read by [`output`].
    pub fn export_output_flags(&self) {
        let flags = [
            (self.json, output::JSON_ENV),
            (self.quiet, output::QUIET_ENV),
            (self.no_color, output::NO_COLOR_ENV),
            (self.verbose, output::VERBOSE_ENV),
        ];
        for (set, key) in flags {
            if set {
                std::env::set_var(key, "1");
            }
        }
    }

    /// Default log directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "sitemap_runtime=debug,sitemap_core=debug"
        } else if self.quiet {
            "sitemap_runtime=error"
        } else {
            crate::logging::DEFAULT_DIRECTIVE
        }
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        proxy,
        command,
        ..
    } = cli;

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "sitemap-suite", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = AppContext::load(config.as_deref(), proxy.as_deref())?;

    match command {
        Commands::Serve { host, port } => serve::run(ctx.config.clone(), host, port).await,
        Commands::Fetch {
            url,
            format,
            output,
        } => fetch_cmd::run(&ctx, &url, format.map(Into::into), output.as_deref()).await,
        Commands::Convert {
            input,
            format,
            output,
        } => convert_cmd::run(&ctx, &input, format.into(), output.as_deref()).await,
        Commands::CsvToXml { input, output } => {
            convert_cmd::csv_to_xml(&input, output.as_deref()).await
        }
        Commands::Compare { old, new, report } => {
            compare_cmd::run(&ctx, &old, &new, report.as_deref()).await
        }
        Commands::Merge {
            inputs,
            keep_duplicates,
            sort_by_priority,
            format,
            output,
        } => {
            let options = MergeOptions {
                remove_duplicates: !keep_duplicates,
                sort_by_priority,
            };
            merge_cmd::run(&ctx, &inputs, options, format.into(), output.as_deref()).await
        }
        Commands::Stats { input } => stats_cmd::run(&ctx, &input).await,
        Commands::Completions { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge() {
        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "merge",
            "a.xml",
            "b.xml",
            "--keep-duplicates",
            "--format",
            "csv",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Merge {
                inputs,
                keep_duplicates,
                sort_by_priority,
                format,
                ..
            } => {
                assert_eq!(inputs, ["a.xml", "b.xml"]);
                assert!(keep_duplicates);
                assert!(!sort_by_priority);
                assert_eq!(ExportFormat::from(format), ExportFormat::Csv);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_merge_needs_two_inputs() {
        assert!(Cli::try_parse_from(["sitemap-suite", "merge", "a.xml"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "fetch",
            "example.com",
            "--proxy",
            "https://tools.example.com",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.proxy.as_deref(), Some("https://tools.example.com"));
        assert_eq!(cli.log_directive(), "sitemap_runtime=error");
    }

    #[tokio::test]
    async fn test_convert_and_csv_to_xml_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("urls.csv");
        std::fs::write(&csv, "url\nhttps://a.com/\nhttps://a.com/b\n").unwrap();
        let xml = dir.path().join("out.xml");
        let out_csv = dir.path().join("round.csv");

        let config = dir.path().join("config.json");
        std::fs::write(&config, "{}").unwrap();

        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "csv-to-xml",
            csv.to_str().unwrap(),
            "-o",
            xml.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).await.unwrap();
        let written = std::fs::read_to_string(&xml).unwrap();
        assert!(written.contains("<loc>https://a.com/b</loc>"));

        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "convert",
            xml.to_str().unwrap(),
            "--format",
            "csv",
            "-o",
            out_csv.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).await.unwrap();
        let written = std::fs::read_to_string(&out_csv).unwrap();
        assert_eq!(
            written,
            "URL,Last Modified,Change Frequency,Priority\nhttps://a.com/,,,\nhttps://a.com/b,,,"
        );
    }

    #[tokio::test]
    async fn test_csv_to_xml_without_valid_rows_fails() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("urls.csv");
        std::fs::write(&csv, "url,lastmod\nnot-a-url,2024-01-01\nftp://a.com/x,\n").unwrap();
        let xml = dir.path().join("out.xml");
        let config = dir.path().join("config.json");
        std::fs::write(&config, "{}").unwrap();

        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "csv-to-xml",
            csv.to_str().unwrap(),
            "-o",
            xml.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(err.to_string(), "No valid URLs to convert");
        assert!(!xml.exists());
    }

    #[tokio::test]
    async fn test_compare_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.xml");
        let new = dir.path().join("new.xml");
        std::fs::write(
            &old,
            "<urlset><url><loc>https://a.com/</loc><lastmod>2024-01-01</lastmod></url></urlset>",
        )
        .unwrap();
        std::fs::write(
            &new,
            "<urlset><url><loc>https://a.com/</loc><lastmod>2024-02-01</lastmod></url>\
             <url><loc>https://a.com/new</loc></url></urlset>",
        )
        .unwrap();
        let report = dir.path().join("report.md");
        let config = dir.path().join("config.json");
        std::fs::write(&config, "{}").unwrap();

        let cli = Cli::try_parse_from([
            "sitemap-suite",
            "compare",
            old.to_str().unwrap(),
            new.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).await.unwrap();

        let md = std::fs::read_to_string(&report).unwrap();
        assert!(md.starts_with("# Sitemap Comparison Report"));
        assert!(md.contains("Generated: "));
        assert!(md.contains("- https://a.com/new"));
        assert!(md.contains("- **lastmod**: `2024-01-01` \u{2192} `2024-02-01`"));
    }
}
