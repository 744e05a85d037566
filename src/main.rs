//! CLI entry point for `colshape`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colshape::catalog::metadata::{self, TableRef};
use colshape::executor::runner;
use colshape::generator::column_def;
use colshape::generator::rebuild::DEFAULT_TMP_SUFFIX;

#[derive(Parser)]
#[command(
    name = "colshape",
    about = "Inspect and reshape the column layout of SQLite tables"
)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, default_value = "colshape.db")]
    db: PathBuf,

    /// Print verbose diagnostics
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count columns matching a name substring that hold at least one
    /// non-null value
    Count {
        /// Table name, optionally schema-qualified
        #[arg(long)]
        table: String,

        /// Substring the column names must contain
        #[arg(long)]
        contains: String,

        /// Print the assembled query instead of just the count
        #[arg(long)]
        show_sql: bool,
    },

    /// List a table's columns in declared order with their metadata
    Columns {
        /// Table name, optionally schema-qualified
        #[arg(long)]
        table: String,

        /// Only list columns whose name contains this substring
        #[arg(long)]
        contains: Option<String>,
    },

    /// Rebuild a table with new columns inserted at requested positions
    Reorder {
        /// Table name, optionally schema-qualified
        #[arg(long)]
        table: String,

        /// JSON file with the new-column specs
        #[arg(long)]
        spec: PathBuf,

        /// Suffix for the temporary staging table
        #[arg(long, default_value = DEFAULT_TMP_SUFFIX)]
        suffix: String,

        /// Print the rebuild statements without executing them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut conn = match runner::open_database(&cli.db) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Error opening {}: {e}", cli.db.display());
            process::exit(2);
        }
    };

    match cli.command {
        Command::Count {
            table,
            contains,
            show_sql,
        } => {
            let table = parse_table(&table);

            if cli.verbose {
                match metadata::matching_columns(&conn, &table, &contains) {
                    Ok(columns) => eprintln!(
                        "{} column(s) of {} match '{contains}'",
                        columns.len(),
                        table.qualified_sql()
                    ),
                    Err(e) => {
                        eprintln!("Error reading catalog: {e}");
                        process::exit(2);
                    }
                }
            }

            if show_sql {
                match runner::count_query_sql(&conn, &table, &contains) {
                    Ok(Some(sql)) => println!("{sql}"),
                    Ok(None) => eprintln!("No matching columns; no query to run"),
                    Err(e) => {
                        eprintln!("Error assembling query: {e}");
                        process::exit(2);
                    }
                }
            }

            match runner::count_matching_non_null(&conn, &table, &contains) {
                Ok(count) => println!("{count}"),
                Err(e) => {
                    eprintln!("Error executing count query: {e}");
                    process::exit(2);
                }
            }
        }

        Command::Columns { table, contains } => {
            let table = parse_table(&table);
            let pattern = contains.unwrap_or_default();

            match metadata::table_exists(&conn, &table) {
                Ok(true) => {}
                Ok(false) => {
                    eprintln!("Table not found: {}", table.qualified_sql());
                    process::exit(2);
                }
                Err(e) => {
                    eprintln!("Error reading catalog: {e}");
                    process::exit(2);
                }
            }

            let columns = match metadata::matching_columns(&conn, &table, &pattern) {
                Ok(columns) => columns,
                Err(e) => {
                    eprintln!("Error reading catalog: {e}");
                    process::exit(2);
                }
            };

            for col in &columns {
                println!("{}", describe_column(col));
            }
        }

        Command::Reorder {
            table,
            spec,
            suffix,
            dry_run,
        } => {
            let table = parse_table(&table);

            let specs = match column_def::load_new_columns(&spec) {
                Ok(specs) => specs,
                Err(e) => {
                    eprintln!("Error loading {}: {e}", spec.display());
                    process::exit(2);
                }
            };

            if cli.verbose {
                eprintln!(
                    "Inserting {} column(s) into {}",
                    specs.len(),
                    table.qualified_sql()
                );
            }

            let plan = match runner::plan_rebuild(&conn, &table, &specs, &suffix) {
                Ok(plan) => plan,
                Err(e) => {
                    eprintln!("Error planning rebuild: {e}");
                    process::exit(2);
                }
            };

            if dry_run {
                println!("{}", plan.script());
                return;
            }

            if let Err(e) = runner::apply_rebuild(&mut conn, &plan) {
                eprintln!("Error rebuilding {}: {e}", table.qualified_sql());
                process::exit(2);
            }

            if cli.verbose {
                eprintln!("Rebuilt {}", table.qualified_sql());
            }
        }
    }
}

fn parse_table(name: &str) -> TableRef {
    match TableRef::parse(name) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error parsing table name: {e}");
            process::exit(2);
        }
    }
}

fn describe_column(col: &metadata::ColumnInfo) -> String {
    let mut line = format!("{}\t{}", col.cid, col.name);
    if !col.decl_type.is_empty() {
        line.push('\t');
        line.push_str(&col.decl_type);
    }
    if col.pk_ordinal > 0 {
        line.push_str("\tPK");
    }
    if col.not_null {
        line.push_str("\tNOT NULL");
    }
    if let Some(default) = &col.default {
        line.push_str("\tDEFAULT ");
        line.push_str(default);
    }
    line
}
