use clap::Parser;
use sortdir::cli::{self, Cli};
use sortdir::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::run(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
