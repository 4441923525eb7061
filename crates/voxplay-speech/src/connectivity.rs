//! Connectivity signal used to gate voice session start and to force-stop
//! an active session when the network drops.

use tokio::sync::watch;

/// Online/offline signal. The platform side calls `set_online`; the session
/// manager subscribes and reacts to changes.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _) = watch::channel(initially_online);
        Self { tx }
    }

    pub fn set_online(&self, online: bool) {
        if *self.tx.borrow() != online {
            tracing::info!(online, "Connectivity changed");
        }
        let _ = self.tx.send(online);
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
