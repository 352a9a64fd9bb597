//! Summarize the collection.

use anyhow::{bail, Result};
use carsync_core::CollectionStats;

use super::App;
use crate::render;

/// Run the stats command.
pub async fn run(app: &App) -> Result<()> {
    let list = app.list_view();
    list.mount().await;
    let snapshot = list.settled().await;
    let dataset = list.dataset().await;
    list.teardown().await;

    if let Some(error) = snapshot.error {
        bail!(error);
    }
    print!("{}", render::stats(&CollectionStats::from_cars(&dataset)));
    Ok(())
}
