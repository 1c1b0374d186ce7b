use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process and cancels the watch loop. Also
/// returns when the loop cancels itself, so shutdown never hangs.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => {},
    };
}
