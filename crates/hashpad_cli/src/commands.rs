use crate::cli::{Cli, Commands, EvictArgs, IdArgs, OpenArgs, SaveArgs, SessionArgs};
use crate::terminal_view::TerminalView;
use hashpad_core::presentation::{format_timestamp, note_rows};
use hashpad_core::{
    default_log_level, init_logging, parse_location, repository_from_config, HashpadConfig,
    KeyValueStore, LocationHost, MemoryLocation, MemoryStore, NoteController, NoteService,
    NoteView, SaveFailure, SaveOutcome, SqliteStore,
};
use std::error::Error;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

type CliResult = Result<(), Box<dyn Error>>;

pub fn run(cli: Cli) -> CliResult {
    let mut config = match cli.config.as_ref() {
        Some(path) => HashpadConfig::load(path)?,
        None => HashpadConfig::default(),
    };
    if let Some(level) = cli.log_level.as_ref() {
        config.log_level = Some(level.clone());
    }
    if let Some(log_dir) = cli.log_dir.as_ref() {
        start_logging(log_dir, &config)?;
    }

    if cli.memory {
        let store = config
            .capacity_bytes
            .map_or_else(MemoryStore::new, MemoryStore::with_capacity);
        dispatch(store, &config, cli.command)
    } else {
        let store = SqliteStore::open(&cli.db, config.capacity_bytes)?;
        dispatch(store, &config, cli.command)
    }
}

fn start_logging(log_dir: &Path, config: &HashpadConfig) -> CliResult {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir)?;
    Ok(())
}

fn dispatch<S: KeyValueStore>(store: S, config: &HashpadConfig, command: Commands) -> CliResult {
    match command {
        Commands::Open(args) => run_open(store, config, args),
        Commands::Session(args) => run_session(store, config, args),
        Commands::Save(args) => run_save(store, config, args),
        Commands::Load(args) => run_load(store, config, args),
        Commands::List => run_list(store, config),
        Commands::Evict(args) => run_evict(store, config, args),
    }
}

fn controller_for<S: KeyValueStore, W: Write>(
    store: S,
    config: &HashpadConfig,
    location: &str,
    view: TerminalView<W>,
) -> Result<NoteController<S, TerminalView<W>, MemoryLocation>, Box<dyn Error>> {
    let location = MemoryLocation::new(parse_location(location)?);
    let service = NoteService::new(repository_from_config(store, config));
    Ok(NoteController::new(service, view, location).with_id_length(config.id_length))
}

fn run_open<S: KeyValueStore>(store: S, config: &HashpadConfig, args: OpenArgs) -> CliResult {
    let replacement = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        args.text
    };

    let view = TerminalView::new(io::stdout(), false);
    let mut controller = controller_for(store, config, &args.location, view)?;
    controller.start();

    let outcome = replacement.map(|text| {
        controller.view_mut().type_text(&text);
        controller.handle_input()
    });

    let location = controller.location().location();
    let view = controller.view_mut();
    let summary = format!(
        "location: {location}\nid: {}\ntitle: {}\n{}\n",
        view.note_id, view.title, view.stats
    );
    let text = view.text();
    let out = view.out();
    out.write_all(summary.as_bytes())?;
    if !text.is_empty() {
        writeln!(out, "\n{text}")?;
    }

    match outcome {
        Some(SaveOutcome::Failed { reason, .. }) => Err(describe_failure(&reason).into()),
        Some(SaveOutcome::SkippedBlank) => {
            eprintln!("blank content was not saved");
            Ok(())
        }
        _ => Ok(()),
    }
}

fn run_session<S: KeyValueStore>(store: S, config: &HashpadConfig, args: SessionArgs) -> CliResult {
    let view = TerminalView::new(io::stdout(), true);
    let mut controller = controller_for(store, config, &args.location, view)?;
    controller.start();
    println!("type to append lines; :go <id>, :list, :close, :show, :quit");

    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" => break,
            ":list" => {
                controller.show_all_notes();
            }
            ":close" => controller.close_notes_table(),
            ":show" => println!("{}", controller.view().text()),
            command if command.starts_with(":go ") => {
                let id = command[":go ".len()..].trim();
                controller.location_mut().navigate_to_fragment(id);
                if !controller.handle_fragment_change() {
                    println!("already on #{id}");
                }
            }
            _ => {
                controller.view_mut().append_line(&line);
                controller.handle_input();
            }
        }
    }

    if let SaveOutcome::Failed { reason, .. } = controller.handle_teardown() {
        return Err(describe_failure(&reason).into());
    }
    Ok(())
}

fn run_save<S: KeyValueStore>(store: S, config: &HashpadConfig, args: SaveArgs) -> CliResult {
    let mut service = NoteService::new(repository_from_config(store, config));
    match service.save_with_eviction(&args.id, &args.content) {
        SaveOutcome::Saved { evicted } => {
            for id in evicted {
                println!("evicted {id}");
            }
            println!("saved {}", args.id);
            Ok(())
        }
        SaveOutcome::SkippedBlank => {
            println!("skipped blank content for {}", args.id);
            Ok(())
        }
        SaveOutcome::Failed { reason, .. } => Err(describe_failure(&reason).into()),
    }
}

fn run_load<S: KeyValueStore>(store: S, config: &HashpadConfig, args: IdArgs) -> CliResult {
    let repo = repository_from_config(store, config);
    let Some(note) = repo.load(&args.id)? else {
        return Err(format!("note `{}` not found", args.id).into());
    };
    println!("#{} {}", note.id, format_timestamp(note.timestamp));
    println!("{}", note.content);
    Ok(())
}

fn run_list<S: KeyValueStore>(store: S, config: &HashpadConfig) -> CliResult {
    let repo = repository_from_config(store, config);
    let rows = note_rows(&repo.get_all_notes()?);
    TerminalView::new(io::stdout(), false).show_notes_table(&rows);
    Ok(())
}

fn run_evict<S: KeyValueStore>(store: S, config: &HashpadConfig, args: EvictArgs) -> CliResult {
    let mut repo = repository_from_config(store, config);
    match repo.remove_oldest_note_id(&args.keep)? {
        Some(id) => println!("evicted {id}"),
        None => println!("nothing to evict"),
    }
    Ok(())
}

fn describe_failure(reason: &SaveFailure) -> String {
    match reason {
        SaveFailure::QuotaExhausted => {
            "save failed: store is full and no other note can be evicted".to_string()
        }
        SaveFailure::Store(message) => format!("save failed: {message}"),
        SaveFailure::NoActiveNote => "save failed: no active note".to_string(),
    }
}
