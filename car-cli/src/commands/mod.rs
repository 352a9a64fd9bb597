//! CLI command implementations.

pub mod add;
pub mod browse;
pub mod delete;
pub mod edit;
pub mod list;
pub mod stats;

use anyhow::{Context, Result};
use carsync_client::{
    CarStore, ClientConfig, HttpCarStore, MockCarStore, MutationWorkflow, SyncCoordinator,
};
use carsync_types::CarDraft;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use crate::render;
use crate::ui::TerminalUi;

/// Store handle shared by the list view and the form.
pub type SharedStore = Arc<dyn CarStore>;

/// What every command needs: a store and the search debounce.
pub struct App {
    /// The remote collection (or the mock).
    pub store: SharedStore,
    /// Search input debounce.
    pub debounce: Duration,
}

impl App {
    /// Open the configured store, or the sample mock with `mock`.
    pub fn open(config: &ClientConfig, mock: bool) -> Result<Self> {
        let store: SharedStore = if mock {
            Arc::new(MockCarStore::sample())
        } else {
            Arc::new(
                HttpCarStore::new(config.store_config())
                    .context("Failed to set up the collection client")?,
            )
        };
        Ok(Self {
            store,
            debounce: config.debounce(),
        })
    }

    /// A fresh list view over the store.
    pub fn list_view(&self) -> SyncCoordinator<SharedStore> {
        SyncCoordinator::new(self.store.clone(), self.debounce)
    }
}

/// Car form fields as flags. Values are taken as typed.
#[derive(Args, Debug, Clone, Default)]
pub struct CarArgs {
    /// Manufacturer
    #[arg(long)]
    pub make: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Model year
    #[arg(long)]
    pub year: Option<String>,

    /// Engine output in hp
    #[arg(long)]
    pub horsepower: Option<String>,

    /// Price
    #[arg(long)]
    pub price: Option<String>,
}

impl CarArgs {
    /// Overlay the given flags on `draft`.
    pub fn apply(self, mut draft: CarDraft) -> CarDraft {
        if let Some(v) = self.make {
            draft.make = v;
        }
        if let Some(v) = self.model {
            draft.model = v;
        }
        if let Some(v) = self.year {
            draft.year = v;
        }
        if let Some(v) = self.horsepower {
            draft.horsepower = v;
        }
        if let Some(v) = self.price {
            draft.price = v;
        }
        draft
    }
}

/// The car form opened on top of a mounted list view.
pub struct FormSession {
    /// The list underneath the form.
    pub list: SyncCoordinator<SharedStore>,
    /// Terminal capabilities handed to the workflow.
    pub ui: Arc<TerminalUi>,
    /// Create/update/delete runner.
    pub workflow: MutationWorkflow<SharedStore>,
}

impl FormSession {
    /// Mount the list, then open the form.
    pub async fn open(app: &App, assume_yes: bool) -> Self {
        let list = app.list_view();
        list.mount().await;

        let ui = Arc::new(TerminalUi::new(assume_yes));
        let workflow = MutationWorkflow::new(app.store.clone(), ui.clone(), ui.clone(), ui.clone());
        Self { list, ui, workflow }
    }

    /// Close the form. If it navigated back, the list regains focus,
    /// refetches and is printed.
    pub async fn finish(self) -> Result<()> {
        if self.ui.take_went_back() {
            self.list.focus().await;
            print!("{}", render::snapshot(&self.list.settled().await));
        }
        self.list.teardown().await;
        Ok(())
    }
}
