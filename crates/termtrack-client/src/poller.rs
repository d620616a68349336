//! Background update poller
//!
//! After login a plain thread polls the server for projects that
//! changed since the user last looked, printing a warning line per
//! project as the names come in. The thread owns its own fail-fast
//! `ApiClient` and a copy of the token; it shares nothing mutable with
//! the prompt loop and is stopped through an atomic flag on logout or
//! exit. A missed poll just waits for the next tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::api::ApiClient;
use crate::output;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How often the sleeping poller rechecks the stop flag.
const STOP_CHECK: Duration = Duration::from_secs(1);

pub struct UpdatePoller {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl UpdatePoller {
    pub fn start(api: &ApiClient, token: String) -> Self {
        let api = api.without_retries();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || poll_loop(&api, &token, &flag));
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to wind down.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn poll_loop(api: &ApiClient, token: &str, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        match api.project_updates(token) {
            Ok(updated) => {
                for name in updated {
                    output::warning(&format!("Project '{name}' has been updated"));
                }
            }
            Err(err) => tracing::debug!(error = %err, "update poll failed"),
        }

        // sleep in short slices so logout does not wait a full interval
        let mut waited = Duration::ZERO;
        while waited < POLL_INTERVAL && !stop.load(Ordering::Relaxed) {
            thread::sleep(STOP_CHECK);
            waited += STOP_CHECK;
        }
    }
}
