use anyhow::Context;
use backend::dashboards::d404_superstore_overview::{repository, service};
use backend::shared::{config, format::format_number};
use contracts::dashboards::d404_superstore_overview::{FilterSelection, GroupAggregate};

fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        // stdout carries the snapshot JSON
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn log_series(title: &str, series: &GroupAggregate) {
    tracing::info!(
        "{} ({} by {}): {}",
        title,
        series.measure.label(),
        series.dimension.label(),
        series
            .rows
            .iter()
            .map(|r| format!("{}={:.2}", r.key, r.value))
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = config::load_config()?;
    let dataset_path = config::get_dataset_path(&config)?;

    let dataset = repository::load_cached(&dataset_path)
        .with_context(|| format!("failed to load dataset {}", dataset_path.display()))?;
    tracing::info!(
        "Dataset ready: {} rows, {} skipped",
        format_number(dataset.len()),
        format_number(dataset.skipped_rows)
    );

    let options = service::filter_options(&dataset.records);
    let selection = FilterSelection::all(&options);
    let snapshot = service::build_dashboard(&dataset, &selection, &config.dashboard);

    for card in &snapshot.cards {
        tracing::info!("{}: {}", card.label, card.value);
    }
    log_series("Total Sales by Year", &snapshot.sales_by_year);
    log_series("Total Sales by Segment", &snapshot.sales_by_segment);
    log_series("Top Most Profitable Sub-Categories", &snapshot.top_profitable_sub_categories);
    log_series("Top States by Sales", &snapshot.top_states_by_sales);

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
