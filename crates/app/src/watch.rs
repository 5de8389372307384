//! Long-running mode: one writer task owns the [`Store`] and receives every
//! mutation over a channel, so intents never interleave.

use std::time::Duration;

use engine::{FetchTicket, Holiday, Intent, Store};
use sea_orm::DatabaseConnection;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{error, info, warn};

use crate::{holidays::HolidayFeed, storage};

#[derive(Debug)]
pub enum Command {
    Apply(Intent),
    Fetched(FetchTicket, Vec<Holiday>),
    Shutdown,
}

/// Forwards one intent per stdin line; blank lines are skipped.
async fn read_stdin(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match serde_json::from_str::<Intent>(&line) {
                Ok(intent) => {
                    if tx.send(Command::Apply(intent)).await.is_err() {
                        return;
                    }
                }
                Err(err) => warn!("unreadable intent: {err}"),
            },
            Ok(None) => break,
            Err(err) => {
                error!("failed to read stdin: {err}");
                break;
            }
        }
    }
    let _ = tx.send(Command::Shutdown).await;
}

/// Runs the feed request off the writer task and reports back with its
/// ticket. A failed fetch submits nothing, so the current calendar stays.
fn spawn_fetch(feed: HolidayFeed, ticket: FetchTicket, tx: mpsc::Sender<Command>) {
    tokio::spawn(async move {
        match feed.fetch().await {
            Ok(holidays) => {
                let _ = tx.send(Command::Fetched(ticket, holidays)).await;
            }
            Err(err) => warn!("holiday refresh failed, keeping current calendar: {err}"),
        }
    });
}

async fn persist(db: &DatabaseConnection, store: &Store) {
    if let Err(err) = storage::persist(db, &store.snapshot()).await {
        error!("failed to persist snapshot: {err}");
    }
}

pub async fn run(
    mut store: Store,
    db: DatabaseConnection,
    feed: Option<HolidayFeed>,
    refresh: Duration,
) {
    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(read_stdin(tx.clone()));

    let mut ticker = tokio::time::interval(refresh);
    info!("watching stdin for intents");

    loop {
        tokio::select! {
            _ = ticker.tick(), if feed.is_some() => {
                if let Some(feed) = &feed {
                    spawn_fetch(feed.clone(), store.begin_fetch(), tx.clone());
                }
            }
            command = rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Apply(intent) => match store.apply(intent) {
                        Ok(transition) if transition.changed => persist(&db, &store).await,
                        Ok(_) => {}
                        Err(err) => warn!("intent rejected: {err}"),
                    },
                    Command::Fetched(ticket, holidays) => {
                        match store.apply_fetched(ticket, Intent::set_holidays(holidays)) {
                            Ok(Some(transition)) if transition.changed => {
                                info!(holidays = transition.snapshot.holidays.len(), "holidays refreshed");
                                persist(&db, &store).await;
                            }
                            Ok(_) => {}
                            Err(err) => warn!("holiday refresh rejected: {err}"),
                        }
                    }
                    Command::Shutdown => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    info!("watch stopped");
}
