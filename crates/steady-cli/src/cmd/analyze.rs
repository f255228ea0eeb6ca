use crate::reports;
use clap::Args;
use steady_core::adaptive::recommended_level;
use steady_core::config::Config;
use steady_core::error::{SaResult, SteadyError};
use steady_core::trace::{analyze_windows, load_trace, worst_profile};
use steady_core::tremor::TremorAnalyzer;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with `x,y,timestamp_ms` columns
    #[arg(long)]
    pub trace: String,

    /// Samples between analyses (defaults to the tremor interval)
    #[arg(long)]
    pub stride: Option<usize>,

    /// Only print the summary
    #[arg(long, default_value_t = false)]
    pub summary_only: bool,
}

pub fn run(args: AnalyzeArgs, config: Config) -> SaResult<()> {
    let samples = load_trace(&args.trace)?;
    let stride = args.stride.unwrap_or(config.timing.tremor_interval);
    if stride == 0 {
        return Err(SteadyError::Config("stride must be at least 1".into()));
    }

    let analyzer = TremorAnalyzer::default();
    let windows = analyze_windows(&samples, config.timing.history_length, stride, &analyzer);
    info!("Analysed {} windows", windows.len());

    let worst = worst_profile(&windows);
    // A trace carries no click outcomes, so only tremor drives the level.
    let level = recommended_level(1.0, worst.severity, 0.0);

    println!("\n=== TRACE ANALYSIS: {} ===", args.trace);
    if !args.summary_only {
        reports::print_window_report(&windows);
    }
    reports::print_trace_summary(samples.len(), &worst, level);
    Ok(())
}
