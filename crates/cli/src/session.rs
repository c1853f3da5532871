//! Line-oriented interactive browsing over an [`AssetBrowser`].

use crate::render;
use anyhow::{anyhow, bail, Context, Result};
use asset_browser_core::browser::AssetBrowser;
use asset_browser_core::clock::Clock;
use asset_browser_core::metadata::MetadataProvider;
use asset_browser_core::models::{SortDirection, SortKey, TimeRange};
use std::io::{BufRead, Write};

pub const HELP: &str = "\
commands:
  range <last30_minutes|last24_hours|since_yesterday|since_last_week|today>
  sort <creation_time|name> [ascending|descending]
  search [text]        empty text clears the search
  toggle <dir>         open or close a directory
  expand <dir|all>
  collapse <dir|all>
  reveal <path>        open every directory above an asset
  refresh              rescan with the current settings
  show                 print the tree
  json                 print the tree as JSON
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Range(TimeRange),
    Sort(SortKey, Option<SortDirection>),
    Search(String),
    Toggle(String),
    Expand(String),
    ExpandAll,
    Collapse(String),
    CollapseAll,
    Reveal(String),
    Refresh,
    Show,
    Json,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "range" => Command::Range(rest.parse::<TimeRange>()?),
        "sort" => {
            let mut parts = rest.split_whitespace();
            let key: SortKey = parts
                .next()
                .ok_or_else(|| anyhow!("sort needs a key"))?
                .parse()?;
            let direction: Option<SortDirection> = parts.next().map(str::parse).transpose()?;
            if parts.next().is_some() {
                bail!("too many arguments to sort");
            }
            Command::Sort(key, direction)
        }
        "search" | "/" => Command::Search(rest.to_string()),
        "toggle" => Command::Toggle(required(rest, "toggle")?),
        "expand" if rest == "all" => Command::ExpandAll,
        "expand" => Command::Expand(required(rest, "expand")?),
        "collapse" if rest == "all" => Command::CollapseAll,
        "collapse" => Command::Collapse(required(rest, "collapse")?),
        "reveal" => Command::Reveal(required(rest, "reveal")?),
        "refresh" | "r" => Command::Refresh,
        "show" | "ls" => Command::Show,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command {:?} (try `help`)", other),
    };
    Ok(Some(cmd))
}

fn required(rest: &str, cmd: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("{} needs a path", cmd);
    }
    Ok(rest.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print; the session continues.
    Continue(String),
    Quit,
}

/// Applies `cmd` to the browser. Anything that changes what is drawn
/// answers with the new tree.
pub fn execute<P, C>(browser: &mut AssetBrowser<P, C>, cmd: Command) -> Result<Outcome>
where
    P: MetadataProvider,
    C: Clock,
{
    let text = match cmd {
        Command::Range(range) => {
            browser.set_time_range(range);
            render::render_text(browser)
        }
        Command::Sort(key, direction) => {
            let direction = direction.unwrap_or(browser.view().sort_direction);
            browser.set_sort(key, direction);
            render::render_text(browser)
        }
        Command::Search(query) => {
            browser.set_search(query);
            render::render_text(browser)
        }
        Command::Toggle(dir) => {
            let id = browser
                .tree()
                .find_dir(&dir)
                .with_context(|| format!("no directory {:?} in the tree", dir))?;
            browser.toggle(id);
            render::render_text(browser)
        }
        Command::Expand(dir) => {
            dir_exists(browser, &dir)?;
            browser.expand_dir(&dir);
            render::render_text(browser)
        }
        Command::Collapse(dir) => {
            dir_exists(browser, &dir)?;
            browser.collapse_dir(&dir);
            render::render_text(browser)
        }
        Command::ExpandAll => {
            browser.expand_all();
            render::render_text(browser)
        }
        Command::CollapseAll => {
            browser.collapse_all();
            render::render_text(browser)
        }
        Command::Reveal(path) => {
            let id = browser
                .reveal(&path)
                .with_context(|| format!("no asset {:?} in the tree", path))?;
            let payload = browser.payload_path(id).unwrap_or(&path).to_string();
            format!("{}\n-> {}", render::render_text(browser), payload)
        }
        Command::Refresh => {
            browser.refresh();
            render::render_text(browser)
        }
        Command::Show => render::render_text(browser),
        Command::Json => render::render_view(browser, true)?,
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Continue(text))
}

fn dir_exists<P: MetadataProvider, C: Clock>(browser: &AssetBrowser<P, C>, dir: &str) -> Result<()> {
    if browser.tree().find_dir(dir).is_none() {
        bail!("no directory {:?} in the tree", dir);
    }
    Ok(())
}

/// Reads commands from `input` until `quit` or end of input. Errors from a
/// single command are reported and the session carries on.
pub fn run<P, C, R, W>(browser: &mut AssetBrowser<P, C>, input: R, mut output: W) -> Result<()>
where
    P: MetadataProvider,
    C: Clock,
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render::render_text(browser))?;
    writeln!(output, "type `help` for commands")?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line.context("reading command")?;
        let outcome = parse_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => execute(browser, cmd),
            None => Ok(Outcome::Continue(String::new())),
        });
        match outcome {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Continue(text)) => {
                if !text.is_empty() {
                    writeln!(output, "{}", text.trim_end())?;
                }
            }
            Err(err) => writeln!(output, "error: {:#}", err)?,
        }
        prompt(&mut output)?;
    }
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "> ")?;
    output.flush()?;
    Ok(())
}
