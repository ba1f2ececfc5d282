use crate::cli::import::read_dialogs;
use crate::cli::opts::*;
use crate::cli::play;

use anyhow::{anyhow, bail, Result};
use dialogcards_core::{all_without_text, Mode, Params};
use dialogcards_json::{load_content, write_content, StateStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn run_cli(args: Cli) -> Result<()> {
    match args.cmd.clone() {
        Command::Play(cmd) => play_cmd(&args, cmd),
        Command::State(cmd) => state_cmd(&args, cmd),
        Command::Validate { content } => validate_cmd(&content),
        Command::Import(cmd) => import_cmd(cmd),
    }
}

pub fn open_store(state_file: Option<&PathBuf>, content: &Path) -> Result<StateStore> {
    let store = match state_file {
        Some(p) => StateStore::open_with(p.clone(), p.with_extension("backups"), 10)?,
        None => StateStore::open_default(&content_key(content)?)?,
    };
    debug!(path = %store.path().display(), "session store opened");
    Ok(store)
}

fn content_key(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("content path has no file name: {}", path.display()))
}

fn play_cmd(args: &Cli, cmd: PlayCmd) -> Result<()> {
    let mut params = load_content(&cmd.content)?;
    if let Some(mode) = cmd.mode {
        params.mode = mode.into();
    }
    if cmd.random {
        params.behaviour.random_cards = true;
    }

    let store = open_store(args.state_file.as_ref(), &cmd.content)?;
    let previous = if cmd.fresh { None } else { store.load() };
    let store = if cmd.no_save { None } else { Some(&store) };

    play::run(params, previous, &cmd, store)
}

fn state_cmd(args: &Cli, cmd: StateCmd) -> Result<()> {
    match cmd {
        StateCmd::Show { content, json } => {
            let store = open_store(args.state_file.as_ref(), &content)?;
            let Some(state) = store.load() else {
                println!("no saved session");
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
                return Ok(());
            }
            if let Some(at) = store.saved_at() {
                println!("saved\t{}", at.to_rfc3339());
            }
            println!("round\t{}", state.round.unwrap_or(1));
            println!("card\t{}", state.current_card_id.map(|p| p + 1).unwrap_or(1));
            println!("cards\t{}", state.card_ids.as_ref().map(|v| v.len()).unwrap_or(0));
            let right = state.results.iter().filter(|r| r.result).count();
            println!("answers\t{} ({} right)", state.results.len(), right);
            if let Some(piles) = &state.card_piles {
                let sizes: Vec<String> = piles.iter().map(|p| p.len().to_string()).collect();
                println!("piles\t{}", sizes.join(" "));
            }
        }
        StateCmd::Clear { content } => {
            let store = open_store(args.state_file.as_ref(), &content)?;
            store.clear()?;
            println!("ok");
        }
    }
    Ok(())
}

fn validate_cmd(content: &Path) -> Result<()> {
    let params = load_content(content)?;
    let valid = params.valid_dialogs();

    for (i, d) in params.dialogs.iter().enumerate() {
        if !d.is_valid() {
            let side = if d.has_front() { "back" } else { "front" };
            println!("dialog {}\tempty {side}, dropped", i + 1);
        }
    }
    if !valid.is_empty() && all_without_text(&valid) {
        println!("note\tno dialog carries text");
    }
    println!("valid\t{} of {}", valid.len(), params.dialogs.len());

    if valid.is_empty() {
        bail!("no valid dialogs in {}", content.display());
    }
    Ok(())
}

fn import_cmd(cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Csv { path, out, title, mode } => {
            let dialogs = read_dialogs(File::open(&path)?)?;
            let params = Params {
                title,
                mode: Mode::from(mode),
                dialogs,
                ..Params::default()
            };
            write_content(&out, &params)?;
            println!("wrote {} ({} dialogs)", out.display(), params.dialogs.len());
        }
    }
    Ok(())
}
