use anyhow::Result;
use clap::Parser;

mod cli;
mod error;
mod ext;
mod filter;
mod github;
mod model;
mod pipeline;
mod report;
mod util;

use crate::cli::{Cli, StdinConfirmer, normalize};
use crate::github::client::HttpExecutor;
use crate::util::SystemClock;

fn main() {
  if let Err(err) = run() {
    eprintln!("{} {err:#}", util::fatal_prefix());
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI + env into effective options
  let opts = normalize(cli, &StdinConfirmer)?;

  // Phase 2: run the pipeline against the real API and clock
  let executor = HttpExecutor::new(opts.client.token.clone());
  pipeline::run(&opts, &executor, &SystemClock)
}
