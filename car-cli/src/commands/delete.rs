//! Remove a car.

use anyhow::Result;
use carsync_client::DeleteOutcome;
use carsync_types::CarId;

use super::{App, FormSession};

/// Run the delete command. Without `yes`, asks on stdin first.
pub async fn run(app: &App, id: &CarId, yes: bool) -> Result<()> {
    let session = FormSession::open(app, yes).await;

    let result = session.workflow.delete(id).await;
    session.finish().await?;
    if let DeleteOutcome::Cancelled = result? {
        println!("Cancelled");
    }
    Ok(())
}
