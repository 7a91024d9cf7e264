// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{decrypt, info, record, request_decrypt, schedule, schedule_info, setup};
use alloy_primitives::Address;
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use est_config::load_config;
use est_events::{CounterKind, Shutdown, TrackerEvent};
use est_logger::setup_tracing;
use tracing::{info, Level};

/// Demo sender used when no `--user` is given. Stands in for the
/// transaction sender a deployed frontend would supply.
const DEFAULT_USER: Address = Address::repeat_byte(0x11);

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DecryptTarget {
    Daily,
    Total,
    Goal,
    Completed,
    PrioritySum,
    TaskCount,
}

impl From<DecryptTarget> for CounterKind {
    fn from(value: DecryptTarget) -> Self {
        match value {
            DecryptTarget::Daily => CounterKind::Daily,
            DecryptTarget::Total => CounterKind::Total,
            DecryptTarget::Goal => CounterKind::Goal,
            DecryptTarget::Completed => CounterKind::Completed,
            DecryptTarget::PrioritySum => CounterKind::PrioritySum,
            DecryptTarget::TaskCount => CounterKind::TaskCount,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "est")]
#[command(about = "A CLI for the Encrypted Study Tracker", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Identity to act as (defaults to a demo address)
    #[arg(short, long, global = true)]
    user: Option<Address>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `est -vvv`
    /// will give you trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record encrypted study minutes for today
    Record {
        /// Minutes studied; must be a positive integer
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: u32,
    },

    /// Decrypt today's study time for the acting user
    DecryptDaily,

    /// Decrypt the lifetime study time for the acting user
    DecryptTotal,

    /// Round trip a counter through the decryption oracle
    RequestDecrypt {
        #[arg(short, long, value_enum)]
        kind: DecryptTarget,
    },

    /// Show the acting user's tracker entry
    Info,

    /// Fold a schedule entry into the acting user's schedule counters
    Schedule {
        #[arg(short, long)]
        goal: u32,

        #[arg(long)]
        completed: u32,

        #[arg(short, long)]
        priority: u32,
    },

    /// Decrypt and summarize the acting user's schedule counters
    ScheduleInfo,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;

        setup_tracing(self.log_level());
        info!("Config loaded from: {:?}", config.config_file());

        let app = setup::execute(&config).await?;
        let user = self.user.unwrap_or(DEFAULT_USER);

        match self.command {
            Commands::Record { minutes } => record::execute(&app, user, minutes).await?,
            Commands::DecryptDaily => decrypt::execute(&app, user, CounterKind::Daily).await?,
            Commands::DecryptTotal => decrypt::execute(&app, user, CounterKind::Total).await?,
            Commands::RequestDecrypt { kind } => {
                request_decrypt::execute(&app, user, kind.into()).await?
            }
            Commands::Info => info::execute(&app, user).await?,
            Commands::Schedule {
                goal,
                completed,
                priority,
            } => schedule::execute(&app, user, goal, completed, priority).await?,
            Commands::ScheduleInfo => schedule_info::execute(&app, user).await?,
        }

        // Checkpoints reach the store as fire-and-forget inserts, so the
        // write behind the command above may still be queued. The store
        // flushes and stops on Shutdown; delivery is awaited before the
        // process exits, then the rest of the system is told.
        let shutdown = TrackerEvent::from(Shutdown);
        app.store.send(shutdown.clone()).await?;
        app.bus.do_send(shutdown);

        Ok(())
    }
}
