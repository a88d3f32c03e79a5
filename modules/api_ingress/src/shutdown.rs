use std::future::Future;

use anyhow::Result;

/// Resolves once the process receives SIGINT/SIGTERM (Ctrl+C elsewhere).
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

/// Graceful-shutdown future for the HTTP server: waits for a signal, falling
/// back to Ctrl+C when the signal listeners cannot be installed.
pub async fn shutdown_signal() {
    wait_or_fallback(wait_for_shutdown(), async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn wait_or_fallback<P, F>(primary: P, fallback: F)
where
    P: Future<Output = Result<()>>,
    F: Future<Output = ()>,
{
    match primary.await {
        Ok(()) => tracing::info!("shutdown: signal received"),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "shutdown: primary waiter failed; falling back to ctrl_c()"
            );
            fallback.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn failed_listener_keeps_waiting_on_fallback() {
        let waiter = wait_or_fallback(
            async { Err(anyhow::anyhow!("no signal support")) },
            std::future::pending::<()>(),
        );
        let res = tokio::time::timeout(Duration::from_millis(50), waiter).await;
        assert!(res.is_err(), "shutdown must not resolve when the listener fails");
    }

    #[tokio::test]
    async fn fallback_resolution_completes_shutdown() {
        let waiter = wait_or_fallback(async { Err(anyhow::anyhow!("no signal support")) }, async {});
        tokio::time::timeout(Duration::from_millis(50), waiter)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn signal_resolves_without_fallback() {
        let waiter = wait_or_fallback(async { Ok(()) }, std::future::pending::<()>());
        tokio::time::timeout(Duration::from_millis(50), waiter)
            .await
            .unwrap();
    }
}
