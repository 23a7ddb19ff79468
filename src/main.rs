use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::{Args, Console, PROMPT};

fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the command protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hbnb=error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let mut console = Console::open(args.storage())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            console.cmdloop(BufReader::new(file), &mut out, None)
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal().then_some(PROMPT);
            console.cmdloop(stdin.lock(), &mut out, prompt)
        }
    }
}
