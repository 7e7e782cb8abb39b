use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use ooxdiff::areas::package::Package;
use ooxdiff::areas::session::{Session, SlotId};
use ooxdiff::artifacts::core::{Output, apply_color_choice};
use ooxdiff::artifacts::diff::hunk::DEFAULT_CONTEXT;
use ooxdiff::artifacts::status::part_status::{ComparisonMode, DiffFilter};
use ooxdiff::commands::compare::diff::{DEFAULT_MAX_LINES, DiffLayout, DiffOptions};
use ooxdiff::commands::compare::status::StatusOptions;
use ooxdiff::commands::viewer::show::ShowOptions;
use ooxdiff::{ColorChoice, OutputFormat};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "OOXDIFF_LOG";

#[derive(Parser)]
#[command(
    name = "ooxdiff",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Inspect and compare the XML parts of Office documents",
    long_about = "ooxdiff opens .docx, .xlsx and .pptx packages (and their template variants), \
    lists their XML parts, shows them re-indented in a canonical form \
    and compares two packages part by part.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(long, value_enum, default_value_t, global = true, help = "When to color the output")]
    color: ColorChoice,
    #[arg(
        long,
        global = true,
        env = "OOXDIFF_NO_PAGER",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new(),
        help = "Never page the output"
    )]
    no_pager: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "tree",
        about = "List the XML parts of a package",
        long_about = "This command prints the package name and part count, \
        followed by the parts of the package as a directory tree."
    )]
    Tree {
        #[arg(index = 1, help = "The package to inspect")]
        package: PathBuf,
    },
    #[command(
        name = "show",
        about = "Print one part in canonical form",
        long_about = "This command re-indents a part of the package and prints it \
        with syntax highlighting. Parts that are not well-formed XML are printed as they are."
    )]
    Show {
        #[arg(index = 1, help = "The package to inspect")]
        package: PathBuf,
        #[arg(index = 2, help = "The part path inside the package, e.g. word/document.xml")]
        part: String,
        #[arg(long, value_enum, default_value_t, help = "How to render the part")]
        format: OutputFormat,
    },
    #[command(
        name = "status",
        about = "Show which parts differ between two packages",
        long_about = "This command prints the merged part tree of two packages, \
        labelling each part as Modified, Added or Removed."
    )]
    Status {
        #[arg(index = 1, help = "The first (original) package")]
        first: PathBuf,
        #[arg(index = 2, help = "The second (changed) package")]
        second: PathBuf,
        #[arg(long, help = "Only print a status letter and path for each changed part")]
        name_status: bool,
        #[arg(long, value_parser = parse_diff_filter, help = "Only show parts with these statuses (A, D, M, U)")]
        diff_filter: Option<DiffFilter>,
        #[arg(long, help = "Compare raw text instead of canonical XML")]
        raw: bool,
    },
    #[command(
        name = "diff",
        about = "Show line differences between two packages",
        long_about = "This command diffs the canonical form of every changed part, \
        or of the parts named on the command line."
    )]
    Diff {
        #[arg(index = 1, help = "The first (original) package")]
        first: PathBuf,
        #[arg(index = 2, help = "The second (changed) package")]
        second: PathBuf,
        #[arg(index = 3, help = "Parts to diff; defaults to every changed part")]
        parts: Vec<String>,
        #[arg(long, conflicts_with = "format", help = "Show the two sides next to each other")]
        side_by_side: bool,
        #[arg(long, value_enum, help = "Render the comparison panes in this format")]
        format: Option<OutputFormat>,
        #[arg(long, help = "Only print per-part line counts")]
        stat: bool,
        #[arg(short = 'U', long = "unified", env = "OOXDIFF_CONTEXT", default_value_t = DEFAULT_CONTEXT, help = "Lines of context around each change")]
        context: usize,
        #[arg(long, env = "OOXDIFF_MAX_LINES", default_value_t = DEFAULT_MAX_LINES, help = "Skip parts with more lines than this")]
        max_lines: usize,
        #[arg(long, help = "Diff raw text instead of canonical XML")]
        raw: bool,
    },
}

fn parse_diff_filter(s: &str) -> Result<DiffFilter, String> {
    DiffFilter::try_parse(s).ok_or_else(|| format!("invalid diff filter '{s}', expected letters from A, D, M, U"))
}

fn comparison_mode(raw: bool) -> ComparisonMode {
    if raw {
        ComparisonMode::Raw
    } else {
        ComparisonMode::Canonical
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn open_package(path: &Path) -> anyhow::Result<Package> {
    Package::open(path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    apply_color_choice(cli.color);
    let output = Output::select(cli.no_pager);
    let mut session = Session::new(output.writer);

    match cli.command {
        Commands::Tree { package } => {
            session.load(SlotId::First, open_package(&package).await?);
            session.tree()?
        }
        Commands::Show {
            package,
            part,
            format,
        } => {
            session.load(SlotId::First, open_package(&package).await?);
            session.show(&ShowOptions::new(part, format))?
        }
        Commands::Status {
            first,
            second,
            name_status,
            diff_filter,
            raw,
        } => {
            let (first, second) = tokio::try_join!(open_package(&first), open_package(&second))?;
            session.load_next(first);
            session.load_next(second);

            let opts = StatusOptions::new(
                name_status,
                diff_filter.unwrap_or(DiffFilter::all()),
                comparison_mode(raw),
            );
            session.compare_status(&opts)?
        }
        Commands::Diff {
            first,
            second,
            parts,
            side_by_side,
            format,
            stat,
            context,
            max_lines,
            raw,
        } => {
            let (first, second) = tokio::try_join!(open_package(&first), open_package(&second))?;
            session.load_next(first);
            session.load_next(second);

            let layout = match (side_by_side, format) {
                (_, Some(OutputFormat::Html)) => DiffLayout::Html,
                (true, _) => DiffLayout::SideBySide,
                _ => DiffLayout::Unified,
            };
            let opts = DiffOptions::new(parts, layout, stat, context, max_lines, comparison_mode(raw));
            session.compare_diff(&opts)?
        }
    }

    // release the pager writer before paging
    drop(session);
    Output::finish(output.pager)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
