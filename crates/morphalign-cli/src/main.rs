use std::io;

use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use morphalign_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber(env_filter).init();
}

/// `RUST_LOG` directives decide per target what reaches stderr.
fn subscriber(env_filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn target_directives_are_honoured() {
        let sub = subscriber(EnvFilter::new("morphalign_core=debug"));
        tracing::subscriber::with_default(sub, || {
            assert!(tracing::enabled!(target: "morphalign_core", Level::DEBUG));
            assert!(!tracing::enabled!(target: "morphalign_lexicon", Level::DEBUG));
            assert!(!tracing::enabled!(target: "morphalign_core", Level::TRACE));
        });
    }
}
