//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `plainnote_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use plainnote_core::{default_log_level, init_logging, AppContainer, CoreConfig, Note};

fn main() {
    println!("plainnote_core version={}", plainnote_core::core_version());

    let config = CoreConfig::default();
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        let level = config.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let container = match AppContainer::open_in_memory(&config) {
        Ok(container) => container,
        Err(err) => {
            eprintln!("failed to open in-memory container: {err}");
            std::process::exit(1);
        }
    };

    let repo = container.repository();
    if let Err(err) = repo
        .insert_note(&Note::draft("hello", "first note"))
        .and_then(|_| repo.insert_note(&Note::draft("world", "second note")))
    {
        eprintln!("smoke insert failed: {err}");
        std::process::exit(1);
    }

    match repo.get_all_notes() {
        Ok(notes) => {
            for note in notes {
                println!("note id={} title={}", note.id, note.title);
            }
        }
        Err(err) => {
            eprintln!("smoke read failed: {err}");
            std::process::exit(1);
        }
    }
}
