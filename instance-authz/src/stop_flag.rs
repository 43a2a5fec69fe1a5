use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::{signal, sync::Notify};
use tracing::{error, info};

/// Cooperative shutdown signal shared by the HTTP server and the background refresh
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once [`StopFlag::stop`] has been called, also if that happened before
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

async fn terminate_signal() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut terminate) => {
            terminate.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Stop on Ctrl-C or SIGTERM, whichever arrives first
pub fn register_signal_handler(stop_flag: &StopFlag) {
    let stop_flag = stop_flag.clone();
    tokio::spawn(async move {
        let signal_name = tokio::select! {
            _ = signal::ctrl_c() => "Ctrl-C",
            _ = terminate_signal() => "SIGTERM",
        };
        info!(signal = signal_name, "Shutting down, scope cache refresh and HTTP server will stop");
        stop_flag.stop();
    });
}
