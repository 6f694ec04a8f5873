//! CLI argument parsing and command handling

use crate::aggregate::{count_by_group, summarize, GroupKey};
use crate::config::{ReportConfig, MAX_DPI};
use crate::dataset::Dataset;
use crate::output::{CsvExporter, JsonExporter};
use crate::report::{ReportGenerator, REPORTS};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Render blockchain request metrics into a gallery of charts
#[derive(Parser, Debug)]
#[command(name = "metrics-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Metrics CSV file to read
    #[arg(short, long, env = "METRICS_REPORT_INPUT", default_value = "metrics.csv")]
    pub input: PathBuf,

    /// Directory the charts are written to
    #[arg(short, long, env = "METRICS_REPORT_OUTPUT_DIR", default_value = "graphs")]
    pub output_dir: PathBuf,

    /// Resolution of the charts (pixels per inch)
    #[arg(
        long,
        default_value = "300",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DPI))
    )]
    pub dpi: u32,

    /// Also export summary.csv and summary.json
    #[arg(long)]
    pub summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> ReportConfig {
        ReportConfig::new(&self.input)
            .with_output_dir(&self.output_dir)
            .with_dpi(self.dpi)
            .with_summary(self.summary)
    }

    /// Load the metrics and write every chart
    pub fn run(&self) -> Result<()> {
        let config = self.config();
        config.validate()?;

        tracing::info!("Input: {}", config.input.display());
        tracing::info!("Output directory: {}", config.output_dir.display());
        tracing::info!("DPI: {}", config.dpi);

        let dataset = Dataset::load(&config.input)
            .with_context(|| format!("Failed to load metrics from: {}", config.input.display()))?;

        tracing::info!("Loaded {} records", dataset.len());
        print_overview(&config, &dataset);

        // Source order; the generator reorders rows for the time charts
        let summaries = config.summary.then(|| summarize(&dataset));

        let mut generator =
            ReportGenerator::new(dataset, &config.output_dir, config.render_settings());
        generator
            .run_with(|def, path| println!("✓ {}: {}", def.file_name, path.display()))
            .with_context(|| {
                format!("Failed to generate charts in: {}", config.output_dir.display())
            })?;

        if let Some(summaries) = summaries {
            let csv_path = generator.output_dir().join("summary.csv");
            CsvExporter::export_summary(&summaries, &csv_path).with_context(|| {
                format!("Failed to export CSV summary to: {}", csv_path.display())
            })?;
            println!("✓ CSV summary exported to: {}", csv_path.display());

            let json_path = generator.output_dir().join("summary.json");
            JsonExporter::export_summary(generator.dataset(), &summaries, &json_path)
                .with_context(|| {
                    format!("Failed to export JSON summary to: {}", json_path.display())
                })?;
            println!("✓ JSON summary exported to: {}", json_path.display());
        }

        println!("{}", "=".repeat(70));
        println!();
        println!("{}", success_message(&config));

        Ok(())
    }
}

/// Final line printed after a successful run
pub fn success_message(config: &ReportConfig) -> String {
    format!(
        "Graphs have been generated in the '{}' directory!",
        config.output_dir.display()
    )
}

fn print_overview(config: &ReportConfig, dataset: &Dataset) {
    println!("\n{}", "=".repeat(70));
    println!("   Metrics Report");
    println!("{}", "=".repeat(70));
    println!();
    println!("Dataset:");
    println!("  Input:        {}", config.input.display());
    println!("  Records:      {}", dataset.len());
    if let Some((start, end)) = dataset.time_span() {
        println!("  From:         {}", start);
        println!("  To:           {}", end);
    }
    println!();
    println!("Operations:");
    for (op, count) in count_by_group(dataset, GroupKey::OperationType) {
        println!("  {:<24} {}", op, count);
    }
    println!("{}", "=".repeat(70));
    println!();
    println!("Rendering {} charts at {} dpi...\n", REPORTS.len(), config.dpi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["metrics-report"]);
        assert_eq!(cli.config(), ReportConfig::default());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::parse_from([
            "metrics-report",
            "-i",
            "run.csv",
            "-o",
            "charts",
            "--dpi",
            "96",
            "--summary",
            "-v",
        ]);
        let config = cli.config();
        assert_eq!(config.input, PathBuf::from("run.csv"));
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.dpi, 96);
        assert!(config.summary);
        assert!(cli.verbose);
    }

    #[test]
    fn test_zero_dpi_rejected() {
        assert!(Cli::try_parse_from(["metrics-report", "--dpi", "0"]).is_err());
    }

    #[test]
    fn test_oversized_dpi_rejected() {
        assert!(Cli::try_parse_from(["metrics-report", "--dpi", "100000"]).is_err());
        assert!(Cli::try_parse_from(["metrics-report", "--dpi", "1200"]).is_ok());
    }

    #[test]
    fn test_success_message_names_directory() {
        let config = ReportConfig::default().with_output_dir("out/charts");
        assert_eq!(
            success_message(&config),
            "Graphs have been generated in the 'out/charts' directory!"
        );
    }
}
