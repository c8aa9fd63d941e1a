use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hashpad")]
#[command(bin_name = "hashpad")]
#[command(version)]
#[command(about = "Fragment-addressed plain-text notes in a local store")]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "HASHPAD_DB_PATH",
        default_value = ".hashpad/notes.sqlite3",
        help = "Path to the SQLite note store."
    )]
    pub db: PathBuf,

    #[arg(
        long,
        env = "HASHPAD_CONFIG",
        help = "Optional TOML config (key_prefix, save_policy, capacity_bytes, id_length, log_level)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "HASHPAD_LOG_DIR",
        help = "Directory for rolling log files; logging is off when unset."
    )]
    pub log_dir: Option<PathBuf>,

    #[arg(long, help = "Log level (trace|debug|info|warn|error).")]
    pub log_level: Option<String>,

    #[arg(long, help = "Use a throwaway in-memory store instead of --db.")]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Open a note location, optionally applying new text.")]
    Open(OpenArgs),
    #[command(about = "Edit notes interactively, one line at a time.")]
    Session(SessionArgs),
    #[command(about = "Save content under a note id.")]
    Save(SaveArgs),
    #[command(about = "Print one note.")]
    Load(IdArgs),
    #[command(about = "List all notes, newest first.")]
    List,
    #[command(about = "Evict the oldest note other than --keep.")]
    Evict(EvictArgs),
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    #[arg(
        default_value = "",
        help = "Location such as `#abc12`, `?note=hello#abc12` or a full URL; empty coins a new id."
    )]
    pub location: String,

    #[arg(long, conflicts_with = "stdin", help = "Replace the note text and save it.")]
    pub text: Option<String>,

    #[arg(long, help = "Read replacement note text from stdin.")]
    pub stdin: bool,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[arg(default_value = "", help = "Initial location; empty coins a new id.")]
    pub location: String,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct EvictArgs {
    #[arg(long, help = "Note id that must survive eviction.")]
    pub keep: String,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn open_accepts_location_and_text() {
        let cli = Cli::try_parse_from(["hashpad", "--memory", "open", "#ab12c", "--text", "hi"])
            .unwrap();
        assert!(cli.memory);
        match cli.command {
            Commands::Open(args) => {
                assert_eq!(args.location, "#ab12c");
                assert_eq!(args.text.as_deref(), Some("hi"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn text_and_stdin_conflict() {
        assert!(
            Cli::try_parse_from(["hashpad", "open", "#a", "--text", "x", "--stdin"]).is_err()
        );
    }
}
