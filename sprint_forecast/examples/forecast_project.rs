use sprint_forecast::{
    EvaluationConfig, ForecastConfig, ForecastEngine, ForecastEvaluator, ForecastMetric,
};
use sprint_metrics::utils::generate_test_records;
use sprint_metrics::{build_project_series, SeriesConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows model fitting details
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let records = generate_test_records(16, 12_000.0, 300.0, 35.0, 0.1, 2024);
    let series = build_project_series(&records, &SeriesConfig::default())?;

    let summary = series.summary();
    println!("Project history: {} sprints", summary.sprint_count);
    println!("  total cost:            {:.2}", summary.total_cost);
    println!("  mean ROI:              {}", summary.mean_roi);
    println!("  cumulative est. value: {:.2}", summary.cumulative_business_value);

    println!("\nSprints above the high-ROI threshold:");
    for sprint in series.default_high_roi_sprints() {
        println!("  {} ({})", sprint.sprint_id(), sprint.roi_label());
    }

    let engine = ForecastEngine::new();
    let evaluator = ForecastEvaluator::new();
    let config = ForecastConfig::default().with_horizon(4).with_confidence_level(0.9);

    for metric in [ForecastMetric::Cost, ForecastMetric::EstimatedValue, ForecastMetric::Roi] {
        let forecast = engine.forecast(&series, metric, &config)?;
        let report = evaluator.evaluate(&series, metric, &EvaluationConfig::default())?;

        println!("\nForecast of {} using {}:", metric, forecast.model());
        for point in forecast.points() {
            println!(
                "  sprint {:>2}: {:>12.2}  [{:.2}, {:.2}]",
                point.sprint_index, point.value, point.lower, point.upper
            );
        }
        match report.mean_absolute_error {
            Some(mae) => println!(
                "  back-test on {} sprints: MAE {:.2}, MAPE {}",
                report.holdout, mae, report.mean_absolute_percentage_error
            ),
            None => println!("  back-test unavailable (low confidence)"),
        }
    }

    Ok(())
}
