use crate::OutputFormat;
use crate::artifacts::xml::canonical::try_canonicalize;
use crate::artifacts::xml::highlight::Highlighter;

/// A single part ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartView {
    pub title: String,
    pub body: String,
    /// false when the part could not be parsed and is shown raw
    pub well_formed: bool,
}

impl PartView {
    pub fn render(path: &str, raw: &str, format: OutputFormat, highlighter: &Highlighter) -> Self {
        let (text, well_formed) = match try_canonicalize(raw) {
            Ok(canonical) => (canonical, true),
            Err(err) => {
                tracing::debug!(part = path, "showing raw text: {err}");
                (raw.to_string(), false)
            }
        };

        let body = match format {
            OutputFormat::Html => text
                .lines()
                .map(|line| highlighter.classify(line))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Text => text
                .lines()
                .map(|line| highlighter.colorize(line))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        PartView {
            title: path.to_string(),
            body,
            well_formed,
        }
    }
}
