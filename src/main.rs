use clap::Parser;
use daybook::args::{Args, Command, LedgerCommand, ShopCommand, TaskCommand};
use daybook::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows running the whole program without touching the filesystem.
    // When DAYBOOK_IN_TEST_MODE is set and non-zero in length, the store
    // mode will be Mode::Memory, otherwise it will be Mode::Disk.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Task { command } => {
            let config = Config::load(home).await?;
            match command {
                TaskCommand::Add {
                    text,
                    due,
                    importance,
                    every,
                } => commands::task_add(&config, mode, text.clone(), *due, *importance, *every)
                    .await?
                    .print(),
                TaskCommand::List => commands::task_list(&config, mode).await?.print(),
                TaskCommand::Done { id } => {
                    commands::task_done(&config, mode, id).await?.print()
                }
                TaskCommand::Rm { id } => commands::task_rm(&config, mode, id).await?.print(),
                TaskCommand::Focus { id } => {
                    commands::task_focus(&config, mode, id).await?.print()
                }
                TaskCommand::Breakdown { id } => {
                    commands::task_breakdown(&config, mode, id).await?.print()
                }
                TaskCommand::Sub { id, text } => {
                    commands::task_sub_add(&config, mode, id, text.clone())
                        .await?
                        .print()
                }
                TaskCommand::SubDone { id, subtask } => {
                    commands::task_sub_done(&config, mode, id, *subtask)
                        .await?
                        .print()
                }
                TaskCommand::SubMove {
                    id,
                    source,
                    target,
                    side,
                } => commands::task_sub_move(&config, mode, id, *source, *target, *side)
                    .await?
                    .print(),
            }
        }

        Command::Ledger { command } => {
            let config = Config::load(home).await?;
            match command {
                LedgerCommand::Add {
                    description,
                    amount,
                    income,
                    date,
                    category,
                    every,
                } => commands::ledger_add(
                    &config,
                    mode,
                    description.clone(),
                    *amount,
                    *income,
                    *date,
                    *category,
                    *every,
                )
                .await?
                .print(),
                LedgerCommand::List => commands::ledger_list(&config, mode).await?.print(),
                LedgerCommand::Rm { id } => {
                    commands::ledger_rm(&config, mode, id).await?.print()
                }
            }
        }

        Command::Shop { command } => {
            let config = Config::load(home).await?;
            match command {
                ShopCommand::Add { text } => {
                    commands::shop_add(&config, mode, text.clone()).await?.print()
                }
                ShopCommand::List => commands::shop_list(&config, mode).await?.print(),
                ShopCommand::Price {
                    id,
                    qty,
                    unit_price,
                } => commands::shop_price(&config, mode, id, *qty, *unit_price)
                    .await?
                    .print(),
                ShopCommand::Reopen { id } => {
                    commands::shop_reopen(&config, mode, id).await?.print()
                }
                ShopCommand::Rm { id } => commands::shop_rm(&config, mode, id).await?.print(),
                ShopCommand::Clear => commands::shop_clear(&config, mode).await?.print(),
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
