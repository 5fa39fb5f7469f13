//! Kasboek CLI - Bank statement import and categorization
//!
//! Usage:
//!   kasboek init                          Initialize database
//!   kasboek import --file export.csv      Import a bank export
//!   kasboek rules add Groceries "ah to go" Add a categorization rule
//!   kasboek groups show 1                 Show an imported group

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout stays machine-readable (--json)
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import {
            file,
            name,
            profile,
            dry_run,
            json,
        } => {
            let user = commands::resolve_user(cli.user.as_deref())?;
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(
                &db,
                &user,
                &file,
                name.as_deref(),
                profile.as_deref(),
                dry_run,
                json,
            )
        }
        Commands::Categories => {
            let user = commands::resolve_user(cli.user.as_deref())?;
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_categories(&db, &user)
        }
        Commands::Rules { action } => {
            let user = commands::resolve_user(cli.user.as_deref())?;
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(RulesAction::List) => commands::cmd_rules_list(&db, &user),
                Some(RulesAction::Add { category, keywords }) => {
                    commands::cmd_rules_add(&db, &user, &category, &keywords)
                }
                Some(RulesAction::Delete { id }) => commands::cmd_rules_delete(&db, &user, id),
                Some(RulesAction::Test { description }) => {
                    commands::cmd_rules_test(&db, &user, &description)
                }
                Some(RulesAction::Suggest { description }) => {
                    commands::cmd_rules_suggest(&description)
                }
            }
        }
        Commands::Groups { action } => {
            let user = commands::resolve_user(cli.user.as_deref())?;
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(GroupsAction::List) => commands::cmd_groups_list(&db, &user),
                Some(GroupsAction::Show { id }) => commands::cmd_groups_show(&db, &user, id),
                Some(GroupsAction::Recategorize { category, ids }) => {
                    commands::cmd_groups_recategorize(&db, &user, &category, &ids)
                }
                Some(GroupsAction::RemoveTransactions { ids }) => {
                    commands::cmd_groups_remove_transactions(&db, &user, &ids)
                }
                Some(GroupsAction::Delete { id }) => commands::cmd_groups_delete(&db, &user, id),
            }
        }
    }
}
