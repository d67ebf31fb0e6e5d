use aivan_llm::CancellationToken;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Cancel `cancel` when the user presses Ctrl-C.
///
/// The listener stops once the token is cancelled for any reason.
pub(crate) fn cancel_on_interrupt(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!(signal = "SIGINT", "Signal received, cancelling generation.");
                    cancel.cancel();
                }
                Err(error) => error!(%error, "Couldn't listen for interrupt signal."),
            },
        }
    })
}
