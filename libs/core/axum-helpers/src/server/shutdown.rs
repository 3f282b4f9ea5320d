use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Shutdown coordinator shared by the server and its cleanup task.
///
/// `shutdown()` flips a flag once and broadcasts to every subscriber;
/// `wait()` resolves as soon as shutdown has been initiated, even if it was
/// initiated before the call.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(1);
        Self {
            tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Initiate shutdown and notify all subscribers. Only the first call has
    /// an effect.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            let _ = self.tx.send(());
        }
    }

    /// Resolve once shutdown has been initiated.
    pub async fn wait(&self) {
        // Subscribe before checking the flag so a concurrent shutdown() is not missed.
        let mut rx = self.subscribe();
        if self.is_shutting_down() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on SIGINT (Ctrl+C) or, on unix, SIGTERM.
///
/// If a handler cannot be installed the failure is logged and that signal
/// source never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_resolves_after_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let waiter = {
            let c = coordinator.clone();
            tokio::spawn(async move { c.wait().await })
        };

        coordinator.shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait() did not resolve")
            .unwrap();
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.shutdown();
        coordinator.shutdown();

        tokio::time::timeout(Duration::from_millis(100), coordinator.wait())
            .await
            .expect("wait() should not block once shut down");
    }

    #[tokio::test]
    async fn test_subscribers_are_notified_once() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx = coordinator.subscribe();

        coordinator.shutdown();
        coordinator.shutdown();

        assert!(rx.recv().await.is_ok());
        assert!(rx.try_recv().is_err());
    }
}
