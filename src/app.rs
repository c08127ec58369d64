//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module:
//! - loads `.env` and parses CLI arguments
//! - sets up logging for the chosen verbosity
//! - loads a price CSV or generates a sample series
//! - runs the valuation pipeline
//! - prints summary, metrics, and plot
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, DemoArgs, FitArgs, ModelArgs, OutputArgs, ShowArgs};
use crate::data::sample::{SampleSpec, generate_table};
use crate::domain::{FitParams, ModelConfig, RunConfig, ValuationParams, Verbosity};
use crate::error::Result;

pub mod pipeline;

/// Entry point for the `gsv` binary.
pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let verbosity = match &cli.command {
        Command::Fit(args) => Verbosity::from_level(args.model.verbose),
        Command::Demo(args) => Verbosity::from_level(args.model.verbose),
        Command::Show(_) => Verbosity::Key,
    };
    init_logging(verbosity);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
        Command::Show(args) => handle_show(args),
    }
}

/// `RUST_LOG` wins over the verbosity flag when set.
fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Silent => "warn",
        Verbosity::Key => "info",
        Verbosity::Detailed => "debug",
    };
    let filter = format!("warn,gsv={level}");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn handle_fit(args: FitArgs) -> Result<()> {
    let config = run_config_from_args(&args.model, &args.output);
    let ingested = crate::io::ingest::load_price_table(&args.csv)?;
    if !ingested.row_errors.is_empty() {
        log::warn!(
            "{} of {} CSV rows were skipped.",
            ingested.row_errors.len(),
            ingested.rows_read
        );
    }

    let run = pipeline::run_valuation(&config, &ingested.table)?;
    present(&config, &run)
}

fn handle_demo(args: DemoArgs) -> Result<()> {
    let config = run_config_from_args(&args.model, &args.output);
    let spec = sample_spec_from_args(&args);
    let table = generate_table(&spec, &config.price_field)?;

    let run = pipeline::run_valuation(&config, &table)?;
    present(&config, &run)
}

fn handle_show(args: ShowArgs) -> Result<()> {
    let file = crate::io::metrics::read_metrics_json(&args.metrics)?;
    println!("{}", crate::report::format_metrics_file(&file));
    Ok(())
}

fn present(config: &RunConfig, run: &pipeline::RunOutput) -> Result<()> {
    println!("{}", crate::report::format_run_summary(&run.fit));
    println!("{}", crate::report::format_metrics(&run.metrics));

    if config.plot {
        let plot = crate::plot::render_ascii_chart(&run.fit, config.plot_width, config.plot_height)?;
        println!("{plot}");
    }

    if let Some(path) = &config.export_points {
        crate::io::export::write_points_csv(path, &run.fit)?;
        log::info!("Wrote fitted points to {}.", path.display());
    }
    if let Some(path) = &config.export_metrics {
        let file = crate::io::metrics::metrics_file(&run.fit, &run.metrics);
        crate::io::metrics::write_metrics_json(path, &file)?;
        log::info!("Wrote metrics to {}.", path.display());
    }
    if let Some(path) = &config.chart {
        let title = format!("{} trend as of {}", run.fit.price_field, run.fit.current_date);
        crate::plot::write_svg_chart(path, &run.fit, &title)?;
        log::info!("Wrote chart to {}.", path.display());
    }

    Ok(())
}

pub fn run_config_from_args(model: &ModelArgs, output: &OutputArgs) -> RunConfig {
    RunConfig {
        price_field: model.price_col.trim().to_ascii_lowercase(),
        model: ModelConfig {
            recent_months: model.recent_months,
            train_years: model.train_years,
            date_end: model.date_end,
            verbosity: Verbosity::from_level(model.verbose),
        },
        fit: FitParams {
            log_space: !model.linear,
            n_std: model.n_std,
        },
        valuation: ValuationParams {
            min_annual_return: model.min_annual_return,
            under_value_weight: model.under_value_weight,
        },
        plot: output.plot && !output.no_plot,
        plot_width: output.width,
        plot_height: output.height,
        export_points: output.export.clone(),
        export_metrics: output.export_metrics.clone(),
        chart: output.chart.clone(),
    }
}

fn sample_spec_from_args(args: &DemoArgs) -> SampleSpec {
    SampleSpec {
        start: args.start,
        days: args.days,
        start_price: args.start_price,
        annual_growth: args.growth,
        noise: args.noise,
        jump_prob: args.jump_prob,
        jump_scale: args.jump_scale,
        seed: args.seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_lowercases_price_column_and_resolves_plot() {
        let cli = Cli::try_parse_from([
            "gsv", "fit", "--csv", "p.csv", "--price-col", "Close", "--linear", "--no-plot", "-v", "1",
            "--export-metrics", "m.json",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config_from_args(&args.model, &args.output);
        assert_eq!(config.price_field, "close");
        assert!(!config.fit.log_space);
        assert!(!config.plot);
        assert_eq!(config.model.verbosity, Verbosity::Key);
        assert_eq!(config.export_metrics.as_deref(), Some(std::path::Path::new("m.json")));
        assert!(config.export_points.is_none());
    }

    #[test]
    fn demo_args_map_onto_sample_spec() {
        let cli = Cli::try_parse_from(["gsv", "demo", "--days", "400", "--growth", "0.2", "--seed", "7"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        let spec = sample_spec_from_args(&args);
        assert_eq!(spec.days, 400);
        assert_eq!(spec.annual_growth, 0.2);
        assert_eq!(spec.seed, 7);
        assert_eq!(spec.start, chrono::NaiveDate::from_ymd_opt(2014, 1, 1).unwrap());
    }
}
