use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use engine::{
    CollectionKey, CostCenterInput, EngineError, Intent, Money, Snapshot, Store, budget,
};
use sea_orm::DatabaseConnection;

use crate::{error::AppError, holidays::HolidayFeed};

mod error;
mod holidays;
mod settings;
mod storage;
mod watch;

#[derive(Debug, Parser)]
#[command(name = "costbook", about = "Staffing cost ledger")]
struct Cli {
    /// Config file path (TOML).
    #[arg(long, env = "COSTBOOK_CONFIG", default_value = "costbook.toml")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current state, or one collection, as JSON.
    Show { collection: Option<String> },
    /// Apply a JSON array of intents in order.
    Apply { file: PathBuf },
    /// Planned monthly cost against the monthly budget, per cost center.
    Budget,
    /// Set a cost center's budgets, in major units (`1500000` or `1500000,50`).
    SetBudget {
        /// Cost center code.
        code: String,
        monthly: Money,
        /// Defaults to twelve times the monthly budget.
        #[arg(long)]
        yearly: Option<Money>,
    },
    /// Replace everything with the built-in defaults.
    Reset,
    /// Fetch the holiday calendar once.
    RefreshHolidays,
    /// Read intents from stdin, one JSON object per line, and refresh
    /// holidays periodically.
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "costbook={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = storage::connect(&settings.database).await?;
    let mut store = Store::builder().build();
    let loaded = store.load(storage::load(&db).await?)?;
    if loaded.recalculated {
        storage::persist(&db, &loaded.snapshot).await?;
    }

    let feed = match &settings.holidays.url {
        Some(url) => Some(HolidayFeed::new(
            url,
            Duration::from_secs(settings.holidays.timeout_secs),
        )?),
        None => None,
    };

    match cli.command {
        Command::Show { collection } => show(&store, collection.as_deref())?,
        Command::Apply { file } => apply_file(&mut store, &db, &file).await?,
        Command::Budget => {
            for line in budget_report(&store.snapshot()) {
                println!("{line}");
            }
        }
        Command::SetBudget {
            code,
            monthly,
            yearly,
        } => {
            let intent = set_budget(&store.snapshot(), &code, monthly, yearly)?;
            apply_intents(&mut store, &db, vec![intent]).await?;
        }
        Command::Reset => {
            let transition = store.apply(Intent::ResetToDefaults)?;
            storage::persist(&db, &transition.snapshot).await?;
            tracing::info!("state reset to defaults");
        }
        Command::RefreshHolidays => {
            let feed = feed.ok_or(AppError::NoHolidayFeed)?;
            refresh_holidays(&mut store, &db, &feed).await?;
        }
        Command::Watch => {
            let refresh = Duration::from_secs(settings.holidays.refresh_secs.max(1));
            watch::run(store, db, feed, refresh).await;
        }
    }

    Ok(())
}

fn show(store: &Store, collection: Option<&str>) -> error::Result<()> {
    let snapshot = store.snapshot();
    let value = match collection {
        Some(name) => snapshot.export_one(CollectionKey::try_from(name)?)?,
        None => serde_json::to_value(&*snapshot)?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// One line per cost center, amounts in the configured currency.
fn budget_report(snapshot: &Snapshot) -> Vec<String> {
    let currency = snapshot.settings.currency;
    budget::usage(snapshot)
        .into_iter()
        .map(|row| {
            let limit = row
                .monthly_budget
                .map_or_else(|| "no budget".to_string(), |b| b.in_currency(currency).to_string());
            let flag = if row.is_over_budget() { "  OVER BUDGET" } else { "" };
            format!(
                "{:<10} {:<30} {:>3} allocations  planned {} / {limit}{flag}",
                row.code,
                row.name,
                row.allocations,
                row.planned_monthly.in_currency(currency),
            )
        })
        .collect()
}

fn set_budget(
    snapshot: &Snapshot,
    code: &str,
    monthly: Money,
    yearly: Option<Money>,
) -> error::Result<Intent> {
    let code = code.trim().to_uppercase();
    let center = snapshot
        .cost_centers
        .iter()
        .find(|center| center.code == code)
        .ok_or_else(|| EngineError::KeyNotFound(format!("cost center {code}")))?;
    let yearly = yearly.unwrap_or_else(|| monthly.scale(12.0));
    let input = CostCenterInput::from(center).budgets(Some(monthly), Some(yearly));
    Ok(Intent::update_cost_center(center.id.clone(), input))
}

async fn apply_file(
    store: &mut Store,
    db: &DatabaseConnection,
    file: &std::path::Path,
) -> error::Result<()> {
    let raw = tokio::fs::read_to_string(file).await?;
    let intents: Vec<Intent> = serde_json::from_str(&raw)?;
    apply_intents(store, db, intents).await
}

/// Applies in order, persisting each commit; the first rejection stops the
/// batch and is returned.
async fn apply_intents(
    store: &mut Store,
    db: &DatabaseConnection,
    intents: Vec<Intent>,
) -> error::Result<()> {
    for (index, intent) in intents.into_iter().enumerate() {
        let label = intent.label();
        let transition = store.apply(intent).map_err(|source| AppError::Rejected {
            index,
            label,
            source,
        })?;
        if transition.changed {
            storage::persist(db, &transition.snapshot).await?;
        }
        tracing::info!(index, intent = label, changed = transition.changed, "applied");
    }
    Ok(())
}

async fn refresh_holidays(
    store: &mut Store,
    db: &DatabaseConnection,
    feed: &HolidayFeed,
) -> error::Result<()> {
    let ticket = store.begin_fetch();
    let holidays = match feed.fetch().await {
        Ok(holidays) => holidays,
        Err(err) => {
            tracing::warn!("holiday refresh failed, keeping current calendar: {err}");
            return Ok(());
        }
    };
    if let Some(transition) = store.apply_fetched(ticket, Intent::set_holidays(holidays))? {
        if transition.changed {
            storage::persist(db, &transition.snapshot).await?;
        }
        tracing::info!(holidays = transition.snapshot.holidays.len(), "holidays refreshed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_on_the_command_line_are_parsed() {
        let cli = Cli::try_parse_from([
            "costbook",
            "set-budget",
            "eng",
            "1500000,50",
            "--yearly",
            "18000006",
        ])
        .unwrap();
        let Command::SetBudget {
            code,
            monthly,
            yearly,
        } = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(code, "eng");
        assert_eq!(monthly, Money::new(150_000_050));
        assert_eq!(yearly, Some(Money::from_major(18_000_006)));

        assert!(Cli::try_parse_from(["costbook", "set-budget", "eng", "12.345"]).is_err());
    }

    #[test]
    fn budget_report_uses_the_settings_currency() {
        let mut snapshot = Snapshot::defaults();
        let lines = budget_report(&snapshot);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ENG"));
        assert!(lines[0].contains("planned 0.00 IDR / 500000000.00 IDR"));

        snapshot.settings.currency = engine::Currency::Usd;
        snapshot.cost_centers[1].monthly_budget = None;
        let lines = budget_report(&snapshot);
        assert!(lines[1].contains("planned 0.00 USD / no budget"));
    }

    #[tokio::test]
    async fn set_budget_updates_the_center_by_code() {
        let db = storage::connect(&settings::Database::Memory).await.unwrap();
        let mut store = Store::builder().build();

        let intent = set_budget(&store.snapshot(), " ops ", Money::from_major(1_000_000), None)
            .unwrap();
        apply_intents(&mut store, &db, vec![intent]).await.unwrap();

        let snapshot = store.snapshot();
        let ops = snapshot.cost_centers.iter().find(|c| c.code == "OPS").unwrap();
        assert_eq!(ops.monthly_budget, Some(Money::from_major(1_000_000)));
        assert_eq!(ops.yearly_budget, Some(Money::from_major(12_000_000)));

        let err = set_budget(&snapshot, "nope", Money::from_major(1), None).unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn rejected_intent_stops_the_batch_with_an_error() {
        let db = storage::connect(&settings::Database::Memory).await.unwrap();
        let mut store = Store::builder().build();
        let intents = vec![
            Intent::add_cost_center(CostCenterInput::new("fin", "Finance", "Rina Wijaya")),
            Intent::add_cost_center(CostCenterInput::new("admin", "Administration", "Rina Wijaya")),
            Intent::add_cost_center(CostCenterInput::new("qa1", "Quality", "Rina Wijaya")),
        ];

        let err = apply_intents(&mut store, &db, intents).await.unwrap_err();
        let AppError::Rejected {
            index,
            label,
            source,
        } = &err
        else {
            panic!("unexpected error: {err}");
        };
        assert_eq!((*index, *label), (1, "COST_CENTERS"));
        assert!(matches!(source, EngineError::Validation(_)));
        assert!(err.to_string().starts_with("intent #1 (COST_CENTERS) rejected: "));

        let codes: Vec<String> = store
            .snapshot()
            .cost_centers
            .iter()
            .map(|c| c.code.clone())
            .collect();
        assert!(codes.contains(&"FIN".to_string()));
        assert!(!codes.contains(&"QA1".to_string()));

        let persisted = storage::load(&db).await.unwrap().cost_centers.unwrap();
        assert!(persisted.iter().any(|c| c.code == "FIN"));
    }
}
