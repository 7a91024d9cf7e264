// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use clap::Parser;
use cli::Cli;

mod cli;
mod decrypt;
mod info;
mod record;
mod request_decrypt;
mod schedule;
mod schedule_info;
mod setup;

#[actix::main]
pub async fn main() {
    if let Err(err) = Cli::parse().execute().await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
