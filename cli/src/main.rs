//! fontaudit CLI - PPTX font embedding audit tool
//!
//! Audits a PowerPoint presentation for font-rendering risk and reports
//! embedded vs requested typefaces, uncovered paragraphs and runs, and
//! unsupported style-variant usage.

use clap::Parser;
use colored::*;
use fontaudit::AuditReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Exit code signalling that requested typefaces are not embedded.
const EXIT_UNKNOWN_REQUESTED: i32 = 2;

/// Audit embedded vs requested fonts in a PowerPoint presentation
#[derive(Parser)]
#[command(
    name = "fontaudit",
    version,
    about = "Audit embedded vs requested fonts in a .pptx package",
    long_about = "fontaudit - PPTX font embedding audit.\n\n\
                  Detects typefaces requested by slide content but not embedded in the\n\
                  package, paragraphs and runs with no typeface at all, and embedded\n\
                  fonts missing the style variants (bold, italic, bold-italic) that\n\
                  slide runs actually use.\n\n\
                  Exits 0 when every requested face is embedded, 2 otherwise."
)]
struct Cli {
    /// Path to the .pptx package
    input: PathBuf,

    /// Write the JSON report to this path
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,

    /// Suppress the human-readable summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let pb = create_spinner("Auditing presentation...");
    let report = fontaudit::audit_file(&cli.input)?;
    pb.finish_and_clear();

    if let Some(ref out) = cli.out {
        write_report(out, &report, cli.compact)?;
        if !cli.quiet {
            println!(
                "{} Report written to {}",
                "✓".green().bold(),
                out.display()
            );
        }
    }

    if !cli.quiet {
        print_summary(&cli.input, &report);
    }

    Ok(if report.has_unknown_requested() {
        EXIT_UNKNOWN_REQUESTED
    } else {
        0
    })
}

fn write_report(path: &Path, report: &AuditReport, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = if compact {
        serde_json::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    fs::write(path, json)?;
    Ok(())
}

fn print_summary(input: &Path, report: &AuditReport) {
    println!("{}", "PPTX Font Audit".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Package".bold(), input.display());
    println!(
        "{}: {} / {}",
        "Theme major/minor".bold(),
        report.theme_major_latin.as_deref().unwrap_or("(none)"),
        report.theme_minor_latin.as_deref().unwrap_or("(none)")
    );
    println!(
        "{} ({}): {}",
        "Embedded typefaces".bold(),
        report.embedded_typefaces.len(),
        report.embedded_typefaces.join(", ")
    );

    if !report.embedded_font_binaries.is_empty() {
        println!("{}", "Embedded font binaries (sample):".bold());
        for entry in report.embedded_font_binaries.iter().take(10) {
            println!(
                "  - {} {} {} :: {}",
                entry.typeface.as_deref().unwrap_or("(unnamed)"),
                entry.style,
                entry.part_name.as_deref().unwrap_or("(unresolved)"),
                entry.name_strings.join(", ")
            );
        }
    }

    println!(
        "{} ({}): {}",
        "Requested faces".bold(),
        report.requested_faces.len(),
        report.requested_faces.keys().collect::<Vec<_>>().join(", ")
    );
    println!(
        "{} ({}): {}",
        "Requested theme tokens".bold(),
        report.requested_theme_tokens.len(),
        report
            .requested_theme_tokens
            .keys()
            .collect::<Vec<_>>()
            .join(", ")
    );

    let top_requested = report.requested_typefaces.top_items(10);
    let top_resolved = report.requested_resolved.top_items(10);
    println!(
        "{}: {}",
        "Top requested (raw)".bold(),
        if top_requested.is_empty() {
            "(none)".to_string()
        } else {
            top_requested
        }
    );
    println!(
        "{}: {}",
        "Top resolved".bold(),
        if top_resolved.is_empty() {
            "(none)".to_string()
        } else {
            top_resolved
        }
    );

    let missing = &report.missing_typeface_runs;
    println!(
        "{}: runs={} paragraphs={} total={}",
        "Missing typeface runs".bold(),
        missing.runs,
        missing.paragraphs,
        missing.total
    );
    println!(
        "{}: empty={} nonempty={} runs-with-text={}",
        "Missing detail".bold(),
        report.missing_paragraphs_empty,
        report.missing_paragraphs_nonempty,
        report.missing_runs_with_text
    );
    for loc in report.missing_paragraph_locations.iter().take(10) {
        println!(
            "  - {} s{} p{} {}",
            loc.slide_file, loc.shape_index, loc.paragraph_index, loc.snippet
        );
    }

    if report.unsupported_style_usage.counts.is_empty() {
        println!("{}: none", "Unsupported style usage".bold());
    } else {
        println!("{}:", "Unsupported style usage".bold());
        for (typeface, styles) in &report.unsupported_style_usage.counts {
            let parts: Vec<String> = styles
                .iter()
                .map(|(style, count)| format!("{}={}", style, count))
                .collect();
            println!("  - {}: {}", typeface, parts.join(", "));
        }
        for violation in report.unsupported_style_usage.violations.iter().take(10) {
            println!(
                "  - {} s{} p{} r{} {} b={} i={} {}",
                violation.slide_file,
                violation.shape_id.as_deref().unwrap_or("?"),
                violation.paragraph_index,
                violation.run_index,
                violation.typeface,
                violation.bold,
                violation.italic,
                violation.snippet
            );
        }
    }

    if report.has_unknown_requested() {
        println!(
            "{} ({}): {}",
            "Unknown requested".red().bold(),
            report.unknown_requested.len(),
            report.unknown_requested.join(", ")
        );
    } else {
        println!("{}: none", "Unknown requested".green().bold());
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
