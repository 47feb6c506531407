// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! casegate: run case access decisions against a JSON fixture.
//!
//! Results are printed as pretty JSON on stdout; logs go to stderr and are
//! filtered by `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use casegate_cli::{Fixture, World};
use casegate_engine::RequestContext;
use casegate_model::{CaseAccess, CaseDataContent, Event, RoleSet, SecurityClassification};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// casegate: case access control over a JSON fixture.
#[derive(Parser, Debug)]
#[command(name = "casegate", version = VERSION, about = "Case access decisions over a JSON fixture")]
struct Cli {
    /// Fixture file (config, case types, grants, case users, cases).
    #[arg(long, short)]
    fixture: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

/// The acting user.
#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long)]
    user: String,

    /// Comma-separated user roles.
    #[arg(long, value_delimiter = ',')]
    roles: Vec<String>,

    /// Classifications the user's roles carry.
    #[arg(long, value_delimiter = ',')]
    classification: Vec<SecurityClassification>,
}

impl UserArgs {
    fn context(&self) -> RequestContext {
        let roles: RoleSet = self.roles.iter().map(String::as_str).collect();
        RequestContext::new(&self.user, roles).with_classifications(self.classification.iter().copied())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a case as the user may see it.
    GetCase {
        #[command(flatten)]
        user: UserArgs,
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        reference: String,
    },
    /// Create a case from a JSON data document.
    CreateCase {
        #[command(flatten)]
        user: UserArgs,
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        case_type: String,
        #[arg(long)]
        event: String,
        /// State the new case starts in.
        #[arg(long, default_value = "Open")]
        state: String,
        /// Case data as a JSON object.
        #[arg(long, default_value = "{}")]
        data: String,
        /// Write the new case back to the fixture file.
        #[arg(long)]
        save: bool,
    },
    /// Start an event on an existing case.
    StartEvent {
        #[command(flatten)]
        user: UserArgs,
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        event: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Report whether the visibility gate lets the user see a case.
    CanAccess {
        #[command(flatten)]
        user: UserArgs,
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        reference: String,
    },
    /// Grant a user explicit access to a case.
    Grant {
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        reason: Option<String>,
        /// Write the grant back to the fixture file.
        #[arg(long)]
        save: bool,
    },
    /// Revoke a user's explicit access to a case.
    Revoke {
        #[arg(long)]
        jurisdiction: String,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        save: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut fixture = Fixture::load(&cli.fixture)?;
    let world = World::from_fixture(&fixture).await?;

    match cli.command {
        Command::GetCase {
            user,
            jurisdiction,
            reference,
        } => {
            let case = world.get_case(&user.context(), &jurisdiction, &reference).await?;
            print_json(&case)
        }
        Command::CreateCase {
            user,
            jurisdiction,
            case_type,
            event,
            state,
            data,
            save,
        } => {
            let data = serde_json::from_str(&data).context("--data must be a JSON object")?;
            let content = CaseDataContent {
                event: Some(Event::new(event)),
                data,
                token: None,
                ignore_warning: false,
            };
            let ctx = user.context();
            let created = world
                .create_case(&ctx, &jurisdiction, &case_type, &state, Some(&content))
                .await?;
            if save {
                fixture.record_grant(created.stored.id, &ctx.user_id, None);
                fixture.cases.push(created.stored);
                fixture.save(&cli.fixture)?;
            }
            print_json(&created.visible)
        }
        Command::StartEvent {
            user,
            jurisdiction,
            reference,
            event,
            token,
        } => {
            let trigger = world
                .start_event(&user.context(), &jurisdiction, &reference, &event, token)
                .await?;
            print_json(&trigger)
        }
        Command::CanAccess {
            user,
            jurisdiction,
            reference,
        } => {
            let report = world.can_access(&user.context(), &jurisdiction, &reference).await?;
            print_json(&report)
        }
        Command::Grant {
            jurisdiction,
            reference,
            user,
            reason,
            save,
        } => {
            let access = CaseAccess {
                id: user,
                reason_for_access: reason,
            };
            let users = world.grant(&jurisdiction, &reference, &access).await?;
            if save {
                let case = world.find_case(&jurisdiction, &reference).await?;
                fixture.record_grant(case.id, &access.id, access.reason_for_access.as_deref());
                fixture.save(&cli.fixture)?;
                info!(case_id = case.id, user_id = %access.id, "Grant saved");
            }
            print_json(&users)
        }
        Command::Revoke {
            jurisdiction,
            reference,
            user,
            save,
        } => {
            let revoked = world.revoke(&jurisdiction, &reference, &user).await?;
            if save && revoked {
                let case = world.find_case(&jurisdiction, &reference).await?;
                fixture.record_revoke(case.id, &user);
                fixture.save(&cli.fixture)?;
                info!(case_id = case.id, user_id = %user, "Revoke saved");
            }
            print_json(&revoked)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
