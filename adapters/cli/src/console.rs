//! Console presentation of HUD frames.

use std::io::Write;

use anyhow::{Context, Result};
use horde_hud::{HudFrame, HudSink};

/// Writes a HUD frame to the provided writer whenever it changes.
#[derive(Debug)]
pub(crate) struct ConsoleHud<W> {
    out: W,
    last: Option<HudFrame>,
}

impl<W: Write> ConsoleHud<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, last: None }
    }
}

impl<W: Write> HudSink for ConsoleHud<W> {
    fn present(&mut self, frame: &HudFrame) -> Result<()> {
        if self.last.as_ref() == Some(frame) {
            return Ok(());
        }

        writeln!(self.out, "{}", frame.visible_lines().join(" | "))
            .context("failed to write HUD frame")?;
        self.out.flush().context("failed to flush HUD output")?;
        self.last = Some(frame.clone());
        Ok(())
    }
}
