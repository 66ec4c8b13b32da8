use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    CommittedCellPolicy, GridSelectionController, HintPanel, HttpAnswerSubmitter, LetterGrid,
};
use shared::{
    domain::{PuzzleName, VisitorId},
    protocol::PuzzleData,
};
use storage::{FileSessionStore, SessionStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod command;
mod config;

use command::{Command, HELP};
use config::{load_settings, Settings};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "finder.toml")]
    config: PathBuf,
    /// Puzzle payload as JSON, or plain text with one grid row per line.
    #[arg(long)]
    grid: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    puzzle_name: Option<String>,
    #[arg(long)]
    visitor: Option<String>,
    #[arg(long)]
    state_file: Option<PathBuf>,
    /// Let clicks on found words start a new selection.
    #[arg(long)]
    allow_committed: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.server_url {
            settings.server_url = v.clone();
        }
        if let Some(v) = &self.puzzle_name {
            settings.puzzle_name = v.clone();
        }
        if let Some(v) = &self.visitor {
            settings.visitor = v.clone();
        }
        if let Some(v) = &self.state_file {
            settings.state_file = v.clone();
        }
        if self.allow_committed {
            settings.allow_committed = true;
        }
    }
}

struct Session<S: SessionStore> {
    grid: LetterGrid,
    controller: GridSelectionController<S>,
    hints: HintPanel,
    submitter: HttpAnswerSubmitter,
    visitor: VisitorId,
}

impl<S: SessionStore> Session<S> {
    /// Runs one command. Returns false when the driver should stop.
    async fn run(&mut self, command: Command) -> bool {
        match command {
            Command::Click(coord) => {
                let outcome = self.controller.click(&mut self.grid, coord);
                println!("{outcome:?}");
                self.print_grid();
            }
            Command::PointerDown(coord) => {
                let outcome = self.controller.pointer_down(&mut self.grid, coord);
                println!("{outcome:?}");
                self.print_grid();
            }
            Command::PointerMove(coord) => {
                let step = self.controller.pointer_move(&mut self.grid, coord);
                println!("{step:?}");
                self.print_grid();
            }
            Command::PointerUp => {
                self.controller.pointer_up();
                self.print_grid();
            }
            Command::Add => {
                match self.controller.commit(&mut self.grid) {
                    Some(found) => println!("found {}", found.word),
                    None => println!("nothing selected"),
                }
                self.print_grid();
            }
            Command::Remove(word) => {
                if !self.controller.remove_word(&mut self.grid, &word) {
                    println!("'{word}' is not a found word");
                }
                self.print_grid();
            }
            Command::Hint => {
                let label = self.hints.toggle();
                match self.hints.visible_words() {
                    Some(words) => println!("hints: {}  [{label}]", words.join(", ")),
                    None => println!("[{label}]"),
                }
            }
            Command::Show => self.print_grid(),
            Command::Submit => {
                let submitted = self
                    .controller
                    .submit(&mut self.grid, &self.submitter, self.visitor.clone())
                    .await;
                match (submitted, self.grid.document()) {
                    (true, Some(page)) => println!("{page}"),
                    _ => println!("submission failed, try again"),
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        true
    }

    fn print_grid(&self) {
        println!("{}", self.grid);
        if !self.grid.chips().is_empty() {
            println!("found: {}", self.grid.chips().join(" | "));
        }
    }
}

fn load_puzzle(path: &Path) -> Result<PuzzleData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read puzzle file '{}'", path.display()))?;
    parse_puzzle(&raw).with_context(|| format!("invalid puzzle file '{}'", path.display()))
}

fn parse_puzzle(raw: &str) -> Result<PuzzleData> {
    if raw.trim_start().starts_with('{') {
        return serde_json::from_str(raw).context("puzzle JSON does not match the expected shape");
    }
    Ok(PuzzleData::from_text(raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    args.apply(&mut settings);

    let puzzle = load_puzzle(&args.grid)?;
    let mut grid = LetterGrid::from_puzzle(&puzzle)?;
    let store = FileSessionStore::open(&settings.state_file)?;
    info!(path = %store.path().display(), "opened session store");

    let policy = if settings.allow_committed {
        CommittedCellPolicy::Selectable
    } else {
        CommittedCellPolicy::Ignore
    };
    let mut controller =
        GridSelectionController::new(PuzzleName::new(settings.puzzle_name.clone()), store)
            .with_policy(policy);
    controller.rehydrate(&mut grid);

    let submitter = HttpAnswerSubmitter::new(
        &settings.server_url,
        Duration::from_secs(settings.submit_timeout_secs),
    )?;
    info!(
        puzzle = %settings.puzzle_name,
        endpoint = %submitter.endpoint(),
        "word finder ready"
    );

    let mut session = Session {
        grid,
        controller,
        hints: HintPanel::new(puzzle.words),
        submitter,
        visitor: VisitorId::new(settings.visitor.clone()),
    };
    session.print_grid();
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !session.run(command).await {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}
