//! Download link handling

use super::DocumentOpener;
use anyhow::{Context, Result};

/// Copies the download link to the system clipboard
#[derive(Debug, Default)]
pub struct ClipboardOpener;

impl DocumentOpener for ClipboardOpener {
    fn open(&self, locator: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(locator.to_string())
            .context("Failed to copy download link")?;
        tracing::info!("Copied download link to clipboard");
        Ok(())
    }
}
