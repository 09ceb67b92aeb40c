use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use lendprobe::cli::{Cli, Commands};
use lendprobe::reporter::{write_text, ConsoleReporter, HtmlExporter, JsonExporter};
use lendprobe::scanner::{
    BoundaryScanner, PasswordResetScanner, RateLimitScanner, SensitiveDataScanner,
    SpecialCharScanner,
};

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(clean) => process::exit(if clean { 0 } else { 1 }),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Boundary { url, output, timeout } => run_boundary(&url, &output, timeout).await,
        Commands::PasswordReset { url, output, timeout } => {
            run_password_reset(&url, &output, timeout).await
        }
        Commands::RateLimit {
            url,
            output,
            timeout,
            attempts,
            concurrency,
        } => run_rate_limit(&url, &output, timeout, attempts, concurrency).await,
        Commands::SensitiveData { url, output, timeout } => {
            run_sensitive_data(&url, &output, timeout).await
        }
        Commands::SpecialChars {
            url,
            output,
            timeout,
            concurrency,
        } => run_special_chars(&url, &output, timeout, concurrency).await,
    }
}

async fn run_boundary(url: &str, output: &str, timeout: u64) -> Result<bool> {
    banner("Boundary Condition Testing Scanner");
    let out_dir = ensure_output_dir(output)?;

    let report = BoundaryScanner::new(url, timeout)?.run().await?;

    let console = ConsoleReporter::new();
    console.print_results(&report);
    console.print_summary("BOUNDARY TEST", &report);

    JsonExporter::export(&report, &out_dir.join("boundary-report.json"))?;
    HtmlExporter::export(
        "Boundary Condition Test Report",
        &report,
        &[],
        &out_dir.join("boundary-report.html"),
    )?;
    println!("[✓] Reports saved to {}", out_dir.display());

    Ok(report.is_clean())
}

async fn run_password_reset(url: &str, output: &str, timeout: u64) -> Result<bool> {
    banner("Password Reset Validation Tests");
    let out_dir = ensure_output_dir(output)?;

    let report = PasswordResetScanner::new(url, timeout)?.run().await?;

    JsonExporter::export(&report, &out_dir.join("password-reset-report.json"))?;
    println!("[✓] Reports saved to {}", out_dir.display());

    Ok(report.is_clean())
}

async fn run_rate_limit(
    url: &str,
    output: &str,
    timeout: u64,
    attempts: usize,
    concurrency: usize,
) -> Result<bool> {
    banner("RATE LIMITING ANALYSIS");
    let out_dir = ensure_output_dir(output)?;

    let run = RateLimitScanner::new(url, timeout, attempts, concurrency)?
        .run()
        .await?;

    let text = run.assessment.render_text();
    println!("\n{}", text);

    write_text(&text, &out_dir.join("rate-limit-report.txt"))?;
    JsonExporter::export(&run.assessment, &out_dir.join("rate-limit-report.json"))?;
    println!("\n[✓] Reports saved to {}", out_dir.display());

    Ok(run.assessment.violations.is_empty())
}

async fn run_sensitive_data(url: &str, output: &str, timeout: u64) -> Result<bool> {
    banner("Sensitive Data Exposure Scanner");
    let out_dir = ensure_output_dir(output)?;

    let run = SensitiveDataScanner::new(url, timeout)?.run().await?;

    let console = ConsoleReporter::new();
    console.print_findings(&run.findings);

    let text = run.render_text();
    write_text(&text, &out_dir.join("sensitive-data-report.txt"))?;
    JsonExporter::export(&run, &out_dir.join("sensitive-data-report.json"))?;
    HtmlExporter::export(
        "Sensitive Data Exposure Scan Report",
        &run.report,
        &run.findings,
        &out_dir.join("sensitive-data-report.html"),
    )?;
    println!("\n[✓] Reports saved to {}", out_dir.display());

    Ok(run.is_clean())
}

async fn run_special_chars(
    url: &str,
    output: &str,
    timeout: u64,
    concurrency: usize,
) -> Result<bool> {
    banner("Special Character Handling Scanner");
    println!("API URL: {}", url);
    println!("Output: {}\n", output);
    let out_dir = ensure_output_dir(output)?;

    let run = SpecialCharScanner::new(url, timeout, concurrency)?
        .run()
        .await?;

    let console = ConsoleReporter::new();
    console.print_results(&run.report);
    console.print_summary("SPECIAL CHARACTER TEST", &run.report);

    JsonExporter::export(&run, &out_dir.join("special-characters-report.json"))?;
    HtmlExporter::export(
        &run.title,
        &run.report,
        &[],
        &out_dir.join("special-characters-report.html"),
    )?;
    println!("[✓] Reports saved to {}", out_dir.display());

    Ok(run.report.is_clean())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn ensure_output_dir(output: &str) -> Result<PathBuf> {
    let path = Path::new(output).to_path_buf();
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))?;
    Ok(path)
}
