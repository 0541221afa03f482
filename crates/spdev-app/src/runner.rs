//! Run a sequence until it finishes or the operator interrupts it

use crate::reporter::Reporter;
use spdev_core::prelude::*;
use std::future::Future;
use std::io::Write;

/// How an entry point ended
#[derive(Debug)]
pub enum Outcome {
    /// The sequence ran to the end (possibly with warnings)
    Completed,
    /// A fatal step reported its failure and stopped the sequence
    Aborted,
    /// Ctrl+C or SIGTERM while the sequence ran
    Interrupted,
    /// An error nothing reported yet
    Failed(Error),
}

impl Outcome {
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Completed,
            Err(Error::Aborted { step }) => {
                info!("Sequence aborted at: {}", step);
                Outcome::Aborted
            }
            Err(e) => Outcome::Failed(e),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed | Outcome::Interrupted => 0,
            Outcome::Aborted | Outcome::Failed(_) => 1,
        }
    }

    /// Print the closing line for an interrupt or an unreported error
    pub fn report<W: Write>(&self, reporter: &mut Reporter<W>) {
        match self {
            Outcome::Interrupted => {
                reporter.blank();
                reporter.warning("Interrupted by user");
            }
            Outcome::Failed(e) => {
                reporter.blank();
                reporter.error(format!("Unexpected error: {}", e));
            }
            Outcome::Completed | Outcome::Aborted => {}
        }
    }
}

/// Drive `sequence` and drop it if `interrupt` resolves first.
///
/// An `interrupt` that fails to install its handler is logged and never fires.
pub async fn run_until_interrupted<S, I>(sequence: S, interrupt: I) -> Outcome
where
    S: Future<Output = Result<()>>,
    I: Future<Output = Result<()>>,
{
    let interrupt = async {
        if let Err(e) = interrupt.await {
            error!("Signal handler error: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = sequence => Outcome::from_result(result),
        () = interrupt => {
            info!("Sequence interrupted");
            Outcome::Interrupted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completed_sequence() {
        let outcome = run_until_interrupted(async { Ok(()) }, std::future::pending()).await;
        assert!(matches!(outcome, Outcome::Completed));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_interrupt_drops_sequence() {
        let outcome = run_until_interrupted(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            async { Ok(()) },
        )
        .await;

        assert!(matches!(outcome, Outcome::Interrupted));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_broken_signal_handler_does_not_interrupt() {
        let outcome = run_until_interrupted(
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(Error::aborted("start containers"))
            },
            async { Err(Error::terminal("no signals here")) },
        )
        .await;

        assert!(matches!(outcome, Outcome::Aborted));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_report_lines() {
        let mut reporter = Reporter::new(Vec::new(), false);
        Outcome::Interrupted.report(&mut reporter);
        Outcome::Failed(Error::process("boom")).report(&mut reporter);
        Outcome::Aborted.report(&mut reporter);

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "\n⚠ Interrupted by user\n\n✗ Unexpected error: Process error: boom\n"
        );
    }
}
