use clap::{Args, Parser, Subcommand, ValueEnum};
use dialogcards_core::Mode;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Normal,
    Repetition,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Normal => Mode::Normal,
            ModeArg::Repetition => Mode::Repetition,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(name = "dialogcards", version, about = "Dialog Cards in the terminal")]
pub struct Cli {
    /// Session file (defaults to the app data dir, keyed by content file name)
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Work through a card set
    Play(PlayCmd),
    /// Inspect or drop a saved session
    #[command(subcommand)]
    State(StateCmd),
    /// Report dialogs that would be dropped from a content file
    Validate { content: PathBuf },
    /// Build a content file from other formats
    #[command(subcommand)]
    Import(ImportCmd),
}

#[derive(Debug, Args, Clone)]
pub struct PlayCmd {
    /// Content params (JSON)
    pub content: PathBuf,
    /// Override the mode set in the content
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Shuffle the card order once per round
    #[arg(long)]
    pub random: bool,
    /// Seed for every shuffle, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,
    /// Ignore any saved session
    #[arg(long)]
    pub fresh: bool,
    /// Do not write the session back on exit
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum StateCmd {
    Show {
        content: PathBuf,
        /// Print the raw session as JSON
        #[arg(long)]
        json: bool,
    },
    Clear { content: PathBuf },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    /// Rows of `front,back[,tip]`, with a header line
    Csv {
        path: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
        mode: ModeArg,
    },
}
