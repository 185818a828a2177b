use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rss_reader::app::AppContext;
use rss_reader::cli::{commands, Cli};
use rss_reader::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Configuration error")?;
    let plan = cli.plan(&config.reader)?;
    tracing::info!("Starting with {:?}", plan);

    let ctx = AppContext::new(config)?;
    let mut stdout = std::io::stdout().lock();
    commands::run(&ctx, &plan, &mut stdout).await?;

    Ok(())
}

/// The one place a failed run reaches the user.
fn report_failure(e: &anyhow::Error, stderr: &mut dyn Write) {
    tracing::error!("Run failed: {:?}", e);
    let _ = writeln!(stderr, "{:#}", e);
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose { "rss_reader=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rss_reader::app::ReaderError;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_is_logged_as_error_and_printed() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let err = anyhow::Error::from(ReaderError::NoMatchingNews);
        let mut stderr = Vec::new();

        tracing::subscriber::with_default(subscriber, || report_failure(&err, &mut stderr));

        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "There is no news according to your criteria\n"
        );
        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("ERROR"), "{}", logged);
        assert!(logged.contains("Run failed"), "{}", logged);
    }
}
