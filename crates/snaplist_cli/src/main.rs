//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `snaplist_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use snaplist_core::db::open_db_in_memory;
use snaplist_core::{LocalTodoRepository, SqliteSlotStore, Todo, TodoService};

fn main() {
    println!("snaplist_core version={}", snaplist_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("snaplist_cli: failed to open database: {err}");
            std::process::exit(1);
        }
    };

    let store = match SqliteSlotStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("snaplist_cli: failed to open slot store: {err}");
            std::process::exit(1);
        }
    };

    let mut service = TodoService::new(LocalTodoRepository::new(store));
    let updates = service.watch_all();

    // Fixed ids keep the output stable run-to-run.
    run_step(service.create(Todo::with_id("1", "Buy milk")), "create");
    run_step(service.set_completed("1", true), "complete");
    println!(
        "after complete: open={}",
        service.all().iter().filter(|todo| todo.is_open()).count()
    );
    run_step(service.delete("1"), "delete");

    let mut emissions = 0;
    while updates.next_emission().is_some() {
        emissions += 1;
    }
    println!("emissions={emissions} remaining={}", service.all().len());
}

fn run_step(result: snaplist_core::RepoResult<bool>, step: &str) {
    match result {
        Ok(done) => println!("{step}: ok={done}"),
        Err(err) => {
            eprintln!("snaplist_cli: {step} failed: {err}");
            std::process::exit(1);
        }
    }
}
