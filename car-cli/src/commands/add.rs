//! Create a car.

use anyhow::Result;
use carsync_types::CarDraft;

use super::{App, CarArgs, FormSession};

/// Run the add command.
pub async fn run(app: &App, car: CarArgs) -> Result<()> {
    let draft = car.apply(CarDraft::default());
    let session = FormSession::open(app, false).await;

    let result = session.workflow.create(&draft).await;
    session.finish().await?;
    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carsync_client::{MockCarStore, StoreCall};
    use std::sync::Arc;
    use std::time::Duration;

    fn app(store: MockCarStore) -> App {
        App {
            store: Arc::new(store),
            debounce: Duration::from_millis(300),
        }
    }

    fn lotus() -> CarArgs {
        CarArgs {
            make: Some("Lotus".into()),
            model: Some("Emira".into()),
            year: Some("2023".into()),
            horsepower: Some("400".into()),
            price: Some("$93,900".into()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn creates_and_refetches() {
        let store = MockCarStore::sample();

        run(&app(store.clone()), lotus()).await.unwrap();

        assert_eq!(store.records().len(), 6);
        assert_eq!(store.list_calls(), 2, "mount plus refetch on return");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_model_is_rejected_locally() {
        let store = MockCarStore::sample();
        let args = CarArgs {
            model: None,
            ..lotus()
        };

        let err = run(&app(store.clone()), args).await.unwrap_err();

        assert_eq!(err.to_string(), "Please fill Make & Model");
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, StoreCall::Create(_))));
        assert_eq!(store.list_calls(), 1, "no refetch without navigation");
    }
}
