use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use sinker_client::SinkerApi;
use sinker_model::TaskStatusSnapshot;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::poll::PollHandle;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollerState {
    #[default]
    Closed,
    Active { task: String },
}

impl PollerState {
    pub fn task(&self) -> Option<&str> {
        match self {
            PollerState::Closed => None,
            PollerState::Active { task } => Some(task),
        }
    }
}

/// Keeps the status snapshot of the opened task fresh.
///
/// Every `open`/`close` starts a new generation. A fetch result is applied
/// only while its generation is still current, so responses that land after
/// the task was closed or switched are dropped. Within one generation the
/// last response to arrive wins, even if it was issued earlier.
pub struct StatusPoller<A: SinkerApi> {
    api: Arc<A>,
    period: Duration,
    shared: Arc<Shared>,
    slot: Mutex<Slot>,
}

struct Shared {
    generation: AtomicU64,
    snapshot: watch::Sender<Option<TaskStatusSnapshot>>,
}

impl Shared {
    fn clear(&self) {
        self.snapshot.send_if_modified(|current| current.take().is_some());
    }
}

#[derive(Default)]
struct Slot {
    state: PollerState,
    handle: Option<PollHandle>,
}

impl<A: SinkerApi> StatusPoller<A> {
    pub fn new(api: Arc<A>, period: Duration) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            api,
            period,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                snapshot,
            }),
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Opening `None` (or an empty name) closes the poller.
    ///
    /// Re-opening restarts the timer with an immediate fetch; the previous
    /// timer is cancelled first so at most one runs.
    pub fn open(&self, task: Option<&str>) {
        let Some(task) = task.filter(|t| !t.is_empty()) else {
            self.close();
            return;
        };

        let mut slot = self.lock();
        if let Some(old) = slot.handle.take() {
            old.cancel();
        }
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if slot.state.task() != Some(task) {
            self.shared.clear();
        }

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let name: Arc<str> = Arc::from(task);
        slot.handle = Some(PollHandle::spawn("task-status", self.period, move || {
            let fut = fetch(Arc::clone(&api), Arc::clone(&shared), Arc::clone(&name), generation);
            async move {
                fut.await;
            }
        }));
        slot.state = PollerState::Active {
            task: task.to_string(),
        };
        info!(task, generation, "status polling started");
    }

    /// Stops polling and discards the snapshot. In-flight fetches finish but
    /// their results are ignored.
    pub fn close(&self) {
        let mut slot = self.lock();
        if let Some(handle) = slot.handle.take() {
            handle.cancel();
        }
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        self.shared.clear();
        if let PollerState::Active { task } = std::mem::take(&mut slot.state) {
            info!(task = %task, "status polling stopped");
        }
    }

    /// Out-of-band fetch for the open task; the timer keeps its schedule.
    /// Returns whether a new snapshot was applied.
    pub async fn refresh(&self) -> bool {
        let (task, generation) = {
            let slot = self.lock();
            match slot.state.task() {
                Some(task) => (
                    Arc::<str>::from(task),
                    self.shared.generation.load(Ordering::Acquire),
                ),
                None => return false,
            }
        };
        fetch(Arc::clone(&self.api), Arc::clone(&self.shared), task, generation).await
    }

    pub fn state(&self) -> PollerState {
        self.lock().state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.lock().handle.is_some()
    }

    pub fn snapshot(&self) -> Option<TaskStatusSnapshot> {
        self.shared.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TaskStatusSnapshot>> {
        self.shared.snapshot.subscribe()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: SinkerApi> Drop for StatusPoller<A> {
    fn drop(&mut self) {
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
    }
}

async fn fetch<A: SinkerApi>(
    api: Arc<A>,
    shared: Arc<Shared>,
    task: Arc<str>,
    generation: u64,
) -> bool {
    match api.task_status(&task).await {
        Ok(snapshot) => {
            // The generation check and the write happen under the channel lock.
            let applied = shared.snapshot.send_if_modified(|current| {
                if shared.generation.load(Ordering::Acquire) != generation {
                    return false;
                }
                *current = Some(snapshot);
                true
            });
            if !applied {
                debug!(task = %task, generation, "discarding stale status response");
            }
            applied
        }
        Err(e) => {
            warn!(task = %task, error = %e, "task status fetch failed, keeping last snapshot");
            false
        }
    }
}
