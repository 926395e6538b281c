//! `caselog` - CLI for the case record store
//!
//! Opens the store when the command needs it, runs the command, and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;
use uuid::Uuid;

use caselog::cli::{Cli, Command, ConfigCommand, EditCommand};
use caselog::{init_logging, Config, Draft, Record, RecordStore};

/// Date format used in human-readable output.
const DATE_FORMAT: &str = "%A, %B %d, %Y";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    debug!("Running {:?}", cli.command);
    let open_store = || {
        RecordStore::open(&config)
            .with_context(|| format!("opening {}", config.database_path().display()))
    };

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::List(cmd) => handle_list(&open_store()?, cmd.json),
        Command::Show(cmd) => handle_show(&open_store()?, cmd.id, cmd.json),
        Command::New(cmd) => {
            let record = cmd.to_record();
            open_store()?.create(&record)?;
            println!("{}", record.id());
            Ok(())
        }
        Command::Edit(cmd) => handle_edit(&open_store()?, &cmd),
        Command::Delete(cmd) => {
            let store = open_store()?;
            let record = find(&store, cmd.id)?;
            store.delete(&record)?;
            println!("Deleted {}", record.id());
            Ok(())
        }
        Command::PhotoPath(cmd) => {
            let store = open_store()?;
            let record = find(&store, cmd.id)?;
            println!("{}", store.photo_path_for(&record).display());
            Ok(())
        }
        Command::Status(cmd) => handle_status(&open_store()?, cmd.json),
    }
}

fn find(store: &RecordStore, id: Uuid) -> anyhow::Result<Record> {
    match store.get_by_id(&id)? {
        Some(record) => Ok(record),
        None => bail!("no record with id {id}"),
    }
}

fn summary_line(record: &Record) -> String {
    let mark = if record.is_resolved() { "x" } else { " " };
    let suspect = if record.has_suspect() {
        format!(" ({})", record.suspect())
    } else {
        String::new()
    };
    format!(
        "{}  [{mark}]  {}  {}{suspect}",
        record.id(),
        record.occurred_at().format("%Y-%m-%d"),
        record.title(),
    )
}

fn handle_list(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let records = store.list_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", summary_line(record));
        }
    }
    Ok(())
}

fn handle_show(store: &RecordStore, id: Uuid, json: bool) -> anyhow::Result<()> {
    let record = find(store, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Id:        {}", record.id());
    println!("Title:     {}", record.title());
    println!("Date:      {}", record.occurred_at().format(DATE_FORMAT));
    println!(
        "Resolved:  {}",
        if record.is_resolved() { "yes" } else { "no" }
    );
    println!(
        "Suspect:   {}",
        if record.has_suspect() {
            record.suspect()
        } else {
            "(none)"
        }
    );
    println!("Photo:     {}", store.photo_path_for(&record).display());
    Ok(())
}

fn handle_edit(store: &RecordStore, cmd: &EditCommand) -> anyhow::Result<()> {
    let Some(mut draft) = Draft::load(store, &cmd.id)? else {
        bail!("no record with id {}", cmd.id);
    };
    cmd.apply(&mut draft);

    if !draft.is_dirty() {
        println!("Nothing to change.");
    } else if draft.commit(store)? {
        println!("{}", summary_line(draft.record()));
    } else {
        bail!("record {} was removed before it could be saved", cmd.id);
    }
    Ok(())
}

fn handle_status(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = store.stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "photo_dir": store.photo_dir(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("caselog status");
        println!("--------------");
        println!("Database:    {}", store.path().display());
        println!("Photos:      {}", store.photo_dir().display());
        println!("Records:     {}", stats.total_records);
        println!("Resolved:    {}", stats.resolved_records);
        println!("Unresolved:  {}", stats.unresolved_records);
        if let (Some(oldest), Some(newest)) = (stats.oldest_record, stats.newest_record) {
            println!(
                "Span:        {} to {}",
                oldest.format("%Y-%m-%d"),
                newest.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!("  Photo dir:       {}", config.photo_dir().display());
                println!();
                println!("[Seed]");
                println!("  Enabled:         {}", config.seed.enabled);
                println!("  Count:           {}", config.seed.count);
                match config.seed.rng_seed {
                    Some(seed) => println!("  RNG seed:        {seed}"),
                    None => println!("  RNG seed:        (random)"),
                }
                println!();
                println!("[Worker]");
                println!("  Queue capacity:  {}", config.worker.queue_capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
