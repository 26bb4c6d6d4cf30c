use clap::Parser;
use sitemap_runtime::cli::{self, output, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.export_output_flags();
    sitemap_runtime::logging::init(cli.log_json, cli.log_directive());

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if output::is_json() {
                output::print_json(&serde_json::json!({ "error": format!("{err:#}") }));
            } else {
                let s = output::Styled::new();
                eprintln!("  {} {err:#}", s.fail_sym());
            }
            ExitCode::FAILURE
        }
    }
}
