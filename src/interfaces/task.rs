// Long-running work with a progress bar and Ctrl-C cancellation
use crate::domain::error::ArgosError;
use crate::domain::traits::CancelSignal;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use tokio::sync::watch;

fn progress_bar(title: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(title.to_string());
    pb
}

/// Run `work` as one spawned task while showing a progress bar.
///
/// Ctrl-C flips the cancel signal handed to `work`; it is up to the work
/// to observe it.
pub async fn launch_modal<F, Fut, T>(title: &str, visible: bool, work: F) -> Result<T, ArgosError>
where
    F: FnOnce(ProgressBar, CancelSignal) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let pb = progress_bar(title, visible);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let signal = tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
            // keep the sender alive so the work is not cancelled
            std::future::pending::<()>().await;
        } else {
            eprintln!("\nCancelling, waiting for the current string...");
            let _ = cancel_tx.send(true);
        }
    });

    let result = tokio::spawn(work(pb.clone(), cancel_rx)).await;
    signal.abort();
    pb.finish_and_clear();

    Ok(result?)
}
