use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use wellnest::cli::{Cli, run};
use wellnest::core::store::Store;
use wellnest::subsystems::notify::OutboxNotifier;
use wellnest::subsystems::session::Dashboard;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = Store::new(&cli.root);
    let notifier = OutboxNotifier::new(&store);
    let dashboard = Dashboard::new(store, notifier);

    if let Err(e) = run(&dashboard, cli.command) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
