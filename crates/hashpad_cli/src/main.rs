//! `hashpad` terminal host.
//!
//! Plays the page around the note controller: the process arguments are the
//! address bar, stdin/stdout the editing surface.

mod cli;
mod commands;
mod terminal_view;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = commands::run(cli) {
        log::error!("event=cli_exit module=cli status=error error={err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
