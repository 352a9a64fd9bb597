//! Show the collection.

use anyhow::{bail, Result};

use super::App;
use crate::render;

/// Run the list command.
pub async fn run(app: &App, query: Option<&str>) -> Result<()> {
    let list = app.list_view();
    list.mount().await;
    if let Some(query) = query {
        list.set_query(query).await;
    }

    let snapshot = list.settled().await;
    list.teardown().await;

    if let Some(error) = snapshot.error {
        bail!(error);
    }
    print!("{}", render::snapshot(&snapshot));
    Ok(())
}
