use anyhow::Result;
use clap::Parser;

use gh_list_pr::emoji::EmojiMap;
use gh_list_pr::spinner::Spinner;
use gh_list_pr::{display, layout, model, render, selector};

/// List pull requests and interactively select one to check out using fzf.
///
/// Shows a color-coded PR list with author, title, branch,
/// additions/deletions, changed files, and date. Default branches
/// (main/master/develop/staging) are included when no search filter is
/// applied.
#[derive(Parser, Debug)]
#[command(name = "gh-list-pr", version, about, after_help = EXAMPLES)]
struct Cli {
    /// Print the list without launching the fzf selector
    #[arg(short, long)]
    print: bool,

    /// Filter PRs (passed to `gh pr list`; defaults to 30 items, open only)
    #[arg(short, long, value_name = "OPTS", default_value = "")]
    search_options: String,

    /// Open the selected PR in a web browser
    #[arg(short, long)]
    web: bool,

    /// Additional fzf options
    #[arg(short, long, value_name = "OPTS", default_value = "")]
    fzf_options: String,
}

const EXAMPLES: &str = "\
Examples:
  # Launch fzf and choose a PR to check out
  gh list-pr

  # Print all active PRs without fzf
  gh list-pr -p

  # Open the selected PR in a web browser
  gh list-pr -w

  # Filter PRs by author
  gh list-pr -s '--author=@me'

  # Show more PRs (default: 30)
  gh list-pr -s '--limit 100'

  # Include closed/merged PRs (default: open only)
  gh list-pr -s '--state all'";

fn main() {
    env_logger::init();
    let mut cli = Cli::parse();

    for tool in ["git", "gh"] {
        if which::which(tool).is_err() {
            eprintln!("{tool} not found");
            std::process::exit(2);
        }
    }
    if !cli.print && which::which("fzf").is_err() {
        eprintln!("fzf not found");
        cli.print = true;
    }

    if let Err(err) = run(&cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let spinner = Spinner::start("Fetching pull requests...");

    let mut prs = model::fetch_prs(&cli.search_options)?;
    let branches = if cli.search_options.is_empty() {
        Some(model::default_branches())
    } else {
        None
    };
    let emoji = EmojiMap::load();

    spinner.stop();

    // Warnings wait for the spinner so they aren't overwritten in place.
    match branches {
        Some(Ok(branches)) => prs.extend(branches),
        Some(Err(err)) => eprintln!("Warning: failed to get default branches: {err:#}"),
        None => {}
    }
    let emoji = match emoji {
        Ok(emoji) => emoji,
        Err(err) => {
            eprintln!("Warning: failed to load emojis: {err:#}");
            EmojiMap::default()
        }
    };

    for pr in &mut prs {
        pr.title = emoji.replace(&pr.title);
        pr.resolve_author();
    }

    let margin = selector::fzf_margin(cli.print, &cli.fzf_options);
    let available = display::terminal_width() as isize - margin as isize;
    let plan = layout::compute_layout(&prs, available);
    let lines = render::format_lines(&prs, &plan);

    if cli.print {
        anstream::print!("{lines}");
        return Ok(());
    }

    let selected = selector::run_fzf(&lines, &cli.fzf_options)?;
    selector::handle_selection(&selected, cli.web)
}
