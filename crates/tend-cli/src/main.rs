//! `tend` demo: seeds an in-memory garden, runs the debounced notification
//! scheduler, records some care and prints what would be pending on the device.
//!
//! Usage: `tend [config.toml]`. Logs go to stderr (`RUST_LOG` overrides `info`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{Duration as Days, NaiveDate};
use tend_core::app::{EngineBuilder, RescheduleOutcome, Trigger};
use tend_core::config::EngineConfig;
use tend_core::domain::{
    CareKind, Plant, RecurrenceRule, TaskId, Task, classify, compute_due_date, triage,
};
use tend_core::impls::{InMemoryNotificationCenter, InMemoryTaskStore, SharedPreferences};
use tend_core::ports::{Clock, FixedClock, IdGenerator, NotificationCenter, SystemClock, TaskStore, UlidGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => EngineConfig::default(),
    };

    let clock = Arc::new(FixedClock::new(SystemClock.now()));
    let today = clock.today();
    let store = Arc::new(InMemoryTaskStore::new());
    let prefs = Arc::new(SharedPreferences::new(config.default_settings()));
    let center = Arc::new(InMemoryNotificationCenter::new());

    let ids = UlidGenerator::new(Arc::clone(&clock));
    let watering = seed_garden(&store, &ids, today).await?;

    let engine = EngineBuilder::new()
        .store(store.clone())
        .notification_center(center.clone())
        .preferences(prefs.clone())
        .clock(clock.clone())
        .config(config.clone())
        .build()?;
    let (driver, care) = engine.start();
    let _settings = driver.forward(prefs.subscribe(), Trigger::SettingsChanged);
    tracing::info!(%today, "tend demo started");

    settle(&config).await;
    print_pending("after the first pass", center.as_ref()).await?;

    let task = care.mark_done(watering).await?;
    println!(
        "\nwatered Monty; next due {}",
        task.due_date().map_or_else(|| "never".to_string(), |d| d.to_string())
    );
    match care
        .reschedule(watering, RecurrenceRule::daily(3)?, today)
        .await?
    {
        RescheduleOutcome::Ignored { message } => println!("reschedule ignored: {message}"),
        RescheduleOutcome::Rescheduled(task) => {
            println!("rescheduled; next due {:?}", task.due_date());
        }
    }

    settle(&config).await;
    print_pending("after watering", center.as_ref()).await?;

    let rows = store.fetch_due_tasks(today).await?;
    println!("\nlate tasks on {today}:");
    for late in triage(&rows, today) {
        println!(
            "  {:>3} days  {} ({})",
            late.days_late,
            late.row.plant_name,
            late.row.task.kind()
        );
    }
    println!("\nall tasks:");
    for row in &rows {
        println!(
            "  {:<12} {:<12} {:?}",
            row.plant_name,
            row.task.kind().to_string(),
            classify(&row.task, today)
        );
    }

    // turning notifications off clears everything through the settings trigger
    prefs.set_enabled(false);
    settle(&config).await;
    println!("\npending after disabling: {}", center.pending().await.len());

    let status = engine.scheduler().status().await;
    println!("\n{}", serde_json::to_string_pretty(&status)?);

    driver.shutdown_and_join().await;
    Ok(())
}

/// Seeds a few plants and returns the id of Monty's (overdue) watering task.
async fn seed_garden(
    store: &InMemoryTaskStore,
    ids: &impl IdGenerator,
    today: NaiveDate,
) -> anyhow::Result<TaskId> {
    let monty = Plant::new(ids.generate_plant_id(), "Monstera deliciosa").with_nickname("Monty");
    let fern = Plant::new(ids.generate_plant_id(), "Boston fern");
    let basil = Plant::new(ids.generate_plant_id(), "Basil");
    let snake = Plant::new(ids.generate_plant_id(), "Snake plant");
    let ficus = Plant::new(ids.generate_plant_id(), "Ficus lyrata").with_nickname("Fiddle");

    let fortnightly = RecurrenceRule::monthly([1, 15])?;
    let sundays = RecurrenceRule::weekly([1])?;
    let watering = ids.generate_task_id();
    let tasks = vec![
        Task::new(watering, monty.id, CareKind::Watering, RecurrenceRule::daily(7)?, today - Days::days(9)),
        Task::new(ids.generate_task_id(), monty.id, CareKind::Rotating, sundays, next_on_or_after(&sundays, today)),
        Task::new(ids.generate_task_id(), fern.id, CareKind::Misting, RecurrenceRule::daily(2)?, today - Days::days(3)),
        Task::new(ids.generate_task_id(), basil.id, CareKind::Watering, RecurrenceRule::daily(1)?, today),
        Task::new(
            ids.generate_task_id(),
            snake.id,
            CareKind::Fertilizing,
            fortnightly,
            next_on_or_after(&fortnightly, today),
        ),
        Task::unscheduled(ids.generate_task_id(), ficus.id, CareKind::Repotting),
    ];

    for plant in [monty, fern, basil, snake, ficus] {
        store.upsert_plant(plant).await;
    }
    for task in tasks {
        store.add_task(task).await.context("seeding tasks")?;
    }
    Ok(watering)
}

fn next_on_or_after(rule: &RecurrenceRule, day: NaiveDate) -> NaiveDate {
    day.pred_opt()
        .and_then(|yesterday| compute_due_date(rule, day, yesterday))
        .unwrap_or(day)
}

/// Waits out the debounce window and the pass behind it.
async fn settle(config: &EngineConfig) {
    tokio::time::sleep(config.debounce() + Duration::from_millis(200)).await;
}

async fn print_pending(label: &str, center: &dyn NotificationCenter) -> anyhow::Result<()> {
    let pending = center.pending().await;
    println!("\npending notifications {label} ({}):", pending.len());
    println!("{}", serde_json::to_string_pretty(&pending)?);
    Ok(())
}
