use crate::OutputFormat;
use crate::areas::session::{Session, SlotId};
use crate::artifacts::status::part_status::PartSource;
use crate::artifacts::view::part_view::PartView;
use crate::artifacts::xml::highlight::Highlighter;
use colored::Colorize;
use derive_new::new;

pub const MALFORMED_NOTE: &str = "(not well-formed, shown raw)";

#[derive(Debug, Clone, new)]
pub struct ShowOptions {
    pub part: String,
    pub format: OutputFormat,
}

impl Session {
    pub fn show(&self, opts: &ShowOptions) -> anyhow::Result<()> {
        let package = self
            .package(SlotId::First)
            .ok_or_else(|| anyhow::anyhow!("no package loaded"))?;
        let raw = package.part(&opts.part).ok_or_else(|| {
            anyhow::anyhow!("part '{}' not found in {}", opts.part, package.name())
        })?;

        let highlighter = Highlighter::new()?;
        let view = PartView::render(&opts.part, raw, opts.format, &highlighter);

        let mut writer = self.writer();
        writeln!(writer, "{}", view.title.bold())?;
        if !view.well_formed {
            writeln!(writer, "{}", MALFORMED_NOTE.yellow())?;
        }
        writeln!(writer, "{}", view.body)?;

        Ok(())
    }
}
