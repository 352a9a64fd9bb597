//! Change a car.

use anyhow::{bail, Result};
use carsync_types::{CarDraft, CarId};

use super::{App, CarArgs, FormSession};

/// Run the edit command. Fields not given keep their current value.
pub async fn run(app: &App, id: &CarId, car: CarArgs) -> Result<()> {
    let session = FormSession::open(app, false).await;

    let current = session
        .list
        .dataset()
        .await
        .iter()
        .find(|c| &c.id == id)
        .map(CarDraft::from_car);
    let current = match current {
        Some(draft) => draft,
        None => {
            session.finish().await?;
            bail!("Cannot edit: no car with id {id}");
        }
    };

    let result = session.workflow.update(id, &car.apply(current)).await;
    session.finish().await?;
    result?;
    Ok(())
}
