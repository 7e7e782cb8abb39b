//! Output plumbing shared by every command
//!
//! Commands write into a boxed `Write`; this module decides whether that is
//! plain stdout or the `minus` pager, and applies the color choice.

use crate::ColorChoice;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter that buffers text into a `minus` pager
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn new(pager: Pager) -> Self {
        PagerWriter { pager }
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where command output goes, plus the pager to show once the command is done
pub struct Output {
    pub writer: Box<dyn Write>,
    pub pager: Option<Pager>,
}

impl Output {
    /// Pick stdout or the pager; the pager is used only on an interactive
    /// terminal and when not disabled
    pub fn select(no_pager: bool) -> Self {
        let interactive = io::stdout().is_terminal();

        if interactive && !no_pager {
            let pager = Pager::new();
            tracing::debug!("paging output");
            Output {
                writer: Box::new(PagerWriter::new(pager.clone())),
                pager: Some(pager),
            }
        } else {
            Output {
                writer: Box::new(io::stdout()),
                pager: None,
            }
        }
    }

    /// Show the buffered pager contents, if any
    pub fn finish(pager: Option<Pager>) -> anyhow::Result<()> {
        if let Some(pager) = pager {
            minus::page_all(pager)?;
        }

        Ok(())
    }
}

/// Apply a color choice globally for the `colored` crate
pub fn apply_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}
