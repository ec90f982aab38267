//! Repairflow CLI - Track refurbished laptops through the repair shop

use clap::Parser;
use repairflow::cli::commands::{self, move_ticket::MoveArgs, update::patch_from_args};
use repairflow::cli::{Cli, Commands};
use repairflow::errors::to_exit_code;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> repairflow::Result<()> {
    let cwd = cli.cwd.as_deref();
    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(cwd, force).await,
        Some(Commands::Create {
            code,
            model,
            contact,
            id,
        }) => {
            commands::create::run(
                cwd,
                &code,
                model.as_deref(),
                contact.as_deref(),
                id.as_deref(),
            )
            .await
        }
        Some(Commands::List { json, area }) => commands::list::run(cwd, json, area).await,
        Some(Commands::Show { id, json }) => commands::show::run(cwd, &id, json).await,
        Some(Commands::Sla { json }) => commands::sla::run(cwd, json).await,
        Some(Commands::Check { id, area }) => commands::check::run(cwd, &id, area).await,
        Some(Commands::Move {
            id,
            area,
            answers,
            actor,
            info,
            qa,
        }) => {
            let args = MoveArgs {
                id: &id,
                area,
                answers: answers.as_deref(),
                actor: actor.as_deref(),
                patch: patch_from_args(&info, &qa),
            };
            commands::move_ticket::run(cwd, args).await
        }
        Some(Commands::Update { id, info, qa }) => {
            commands::update::run(cwd, &id, patch_from_args(&info, &qa)).await
        }
        Some(Commands::BulkMove {
            area,
            ids,
            actor,
            json,
        }) => commands::bulk_move::run(cwd, area, &ids, actor.as_deref(), json).await,
        Some(Commands::Audit { id, json }) => commands::audit::run(cwd, &id, json).await,
        Some(Commands::Rules { json }) => commands::rules::run(cwd, json).await,
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
