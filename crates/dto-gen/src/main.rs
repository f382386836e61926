mod cli;
mod codegen;
mod config;
mod core;
mod errlog;
mod error;
mod logging;
mod trace;

use std::path::Path;

use clap::Parser;
use rusqlite::{Connection, OpenFlags};

use crate::{
    cli::Args,
    codegen::CompileUnit,
    config::Config,
    core::{mapper::Mapper, schema, types::StructDecl},
    error::{AppError, AppResult},
    trace::ConsoleTrace,
};

fn main() {
    let args = Args::parse();
    logging::init(&args.log_level);

    if let Err(e) = run(&args) {
        match errlog::write_failure(&e) {
            Ok(path) => eprintln!("{e}\nView full error details in:\n{}", path.display()),
            // No log file; print the full detail instead.
            Err(_) => eprintln!("{}", errlog::detail(&e)),
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> AppResult<()> {
    let config = Config::load(&args.config)?;
    let db_path = config.resolve(&args.cn)?;

    // Connection is scoped to the single schema probe.
    let columns = {
        let conn = open_db(db_path)?;
        schema::read_query_schema(&conn, &args.sql)?
    };
    tracing::debug!(columns = columns.len(), "query schema read");

    let mut decl = StructDecl::new(&args.name);
    let mut traces = ConsoleTrace;
    let count = Mapper::new(&mut traces).emit_members(&columns, &mut decl);
    if decl.fields.is_empty() {
        return Err(AppError::NothingGenerated);
    }

    let unit = CompileUnit::new(
        args.ns.clone(),
        format!("Generated struct from query: {}", args.sql),
        decl,
    );
    let path = unit.write_to(&args.out_dir)?;
    println!("Generated {}: {count} propertie(s) mapped.", path.display());
    Ok(())
}

fn open_db(path: &Path) -> AppResult<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|source| {
        AppError::DbOpenFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}
