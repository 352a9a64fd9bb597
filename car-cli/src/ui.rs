//! Terminal implementations of the form's notice, navigation and
//! confirmation capabilities.

use async_trait::async_trait;
use carsync_client::{Confirm, Navigator, Notice, Notifier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prints notices, remembers navigation and asks on stdin.
#[derive(Debug, Default)]
pub struct TerminalUi {
    assume_yes: bool,
    went_back: AtomicBool,
    notices: Mutex<Vec<Notice>>,
}

impl TerminalUi {
    /// Create a terminal UI. With `assume_yes`, confirmations are accepted
    /// without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            ..Self::default()
        }
    }

    /// Whether the form asked to go back since the last call.
    pub fn take_went_back(&self) -> bool {
        self.went_back.swap(false, Ordering::AcqRel)
    }

    /// Every notice shown so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Notifier for TerminalUi {
    fn notify(&self, notice: Notice) {
        println!("{}: {}", notice.title, notice.message);
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl Navigator for TerminalUi {
    fn go_back(&self) {
        self.went_back.store(true, Ordering::Release);
    }
}

#[async_trait]
impl Confirm for TerminalUi {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(format!("{prompt} [y/N] ").as_bytes()).await;
        let _ = stdout.flush().await;

        let mut answer = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut answer).await {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// `y` or `yes`, any case. Anything else declines.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
