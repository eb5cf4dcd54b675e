use log::{debug, warn};
use std::future::Future;
use std::io::IsTerminal;

use crate::cli::args::CardArgs;
use crate::cli::commands::{index_cards, Context};
use crate::error::Result;
use crate::output;
use crate::progress::Spinner;
use crate::router::CancelFlag;

/// Conventional exit status after SIGINT
const EXIT_INTERRUPTED: i32 = 130;

/// Execute show command: every field group of one card
pub async fn execute(args: CardArgs, context: &Context) -> Result<()> {
    let name = args.name();
    let repo = context.repository()?;
    let progress = context.progress();

    if repo.is_online() {
        index_cards(&repo, progress.clone()).await?;
    }

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    let interrupts = tokio::spawn(async move {
        if let Some(code) = watch_interrupts(tokio::signal::ctrl_c, on_interrupt).await {
            std::process::exit(code);
        }
    });

    let spinner = Spinner::new(progress, &format!("Loading '{}'...", name));
    let detail = repo.load_card(&name, &cancel).await;
    spinner.finish_and_clear();
    interrupts.abort();

    let output = output::format_card_detail(&detail?, context.format, std::io::stdout().is_terminal())?;
    println!("{}", output);
    Ok(())
}

/// The first interrupt stops the load between field groups. A second one
/// means the in-flight fetch should not be waited for; the exit status to
/// leave with is returned.
pub(crate) async fn watch_interrupts<F, Fut>(mut interrupted: F, cancel: CancelFlag) -> Option<i32>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    interrupted().await.ok()?;
    debug!("Interrupted, cancelling card load");
    cancel.cancel();

    interrupted().await.ok()?;
    warn!("Interrupted again, exiting");
    Some(EXIT_INTERRUPTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready, Future};
    use std::pin::Pin;

    type Signal = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

    #[tokio::test]
    async fn test_second_interrupt_exits() {
        let cancel = CancelFlag::new();
        let code = watch_interrupts(|| ready(Ok(())), cancel.clone()).await;

        assert!(cancel.is_cancelled());
        assert_eq!(code, Some(EXIT_INTERRUPTED));
    }

    #[tokio::test]
    async fn test_single_interrupt_only_cancels() {
        let cancel = CancelFlag::new();
        let mut signals = 0;
        let watcher = watch_interrupts(
            || {
                signals += 1;
                let signal: Signal = if signals == 1 {
                    Box::pin(ready(Ok(())))
                } else {
                    Box::pin(pending())
                };
                signal
            },
            cancel.clone(),
        );

        let result = tokio::time::timeout(std::time::Duration::from_millis(50), watcher).await;
        assert!(result.is_err());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_signal_listener_failure_does_not_exit() {
        let cancel = CancelFlag::new();
        let code = watch_interrupts(
            || ready(Err(std::io::Error::other("no signal handler"))),
            cancel.clone(),
        )
        .await;

        assert_eq!(code, None);
        assert!(!cancel.is_cancelled());
    }
}
