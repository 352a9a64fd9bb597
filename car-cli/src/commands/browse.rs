//! Interactive search: each input line replaces the query.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::App;
use crate::render;

/// Refresh command.
pub const REFRESH: &str = ":r";
/// Quit command.
pub const QUIT: &str = ":q";

/// Run the browse command, reading queries from `input` until `:q` or EOF.
pub async fn run<R>(app: &App, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let list = app.list_view();

    // Print every settled snapshot as it is published.
    let mut rx = list.subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.settled {
                println!("{}", render::snapshot(&snapshot));
            }
        }
    });

    println!("Type to search, {REFRESH} to refresh, {QUIT} to quit.");
    list.mount().await;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            QUIT => break,
            REFRESH => {
                list.pull_refresh().await;
            }
            query => list.set_query(query).await,
        }
    }

    list.settled().await;
    list.teardown().await;
    drop(list);
    let _ = printer.await;
    Ok(())
}
