use super::api::{source_from_config, CalendarSource};
use super::dto::{normalize_key, parse_calendar, ParsedCalendar};
use super::error::CalendarError;
use super::model::{CalendarData, CalendarEntry, CalendarKind};
use crate::config::model::{Config, DEFAULT_FETCH_TIMEOUT};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Called with every swallowed refresh failure
pub type FailureHook = Arc<dyn Fn(&CalendarError) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub city: usize,
    pub stadium: usize,
    pub article: usize,
    pub skipped: usize,
}

impl From<&ParsedCalendar> for RefreshStats {
    fn from(parsed: &ParsedCalendar) -> Self {
        Self {
            city: parsed.data.count(CalendarKind::City),
            stadium: parsed.data.count(CalendarKind::Stadium),
            article: parsed.data.count(CalendarKind::Article),
            skipped: parsed.skipped,
        }
    }
}

/// In-memory editorial calendar.
///
/// Reads (`lookup`, `snapshot`) are synchronous and never wait on the network: they see
/// whatever snapshot is installed, empty until the first successful fetch. Writes replace
/// the whole snapshot, so a reader sees either the old or the new one, never a mix.
/// Fetch failures are logged and handed to the failure hook, and the previous snapshot
/// stays in place.
pub struct EditorialCalendar {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn CalendarSource>,
    snapshot: RwLock<Arc<CalendarData>>,
    initialized: AtomicBool,
    refresh_interval: Option<Duration>,
    fetch_timeout: Duration,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    failure_hook: RwLock<Option<FailureHook>>,
}

impl EditorialCalendar {
    pub fn new(source: Arc<dyn CalendarSource>, config: &Config) -> Self {
        let fetch_timeout = if config.fetch_timeout.is_zero() {
            warn!("Fetch timeout can't be zero, using {:?}", DEFAULT_FETCH_TIMEOUT);
            DEFAULT_FETCH_TIMEOUT
        } else {
            config.fetch_timeout
        };

        Self {
            inner: Arc::new(Inner {
                source,
                snapshot: RwLock::new(Arc::new(CalendarData::empty())),
                initialized: AtomicBool::new(false),
                refresh_interval: config.refresh_interval.filter(|period| !period.is_zero()),
                fetch_timeout,
                refresh_task: Mutex::new(None),
                failure_hook: RwLock::new(None),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(source_from_config(config), config)
    }

    pub fn set_failure_hook(&self, hook: FailureHook) {
        *self
            .inner
            .failure_hook
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(hook);
    }

    /// Performs the first fetch and schedules the periodic refresh.
    ///
    /// Only the first call does anything, later and concurrent calls return right away.
    /// Never fails: an unreachable source leaves the cache empty.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        if self.inner.initialized.swap(true, Ordering::AcqRel) {
            debug!("Editorial calendar already initialized");
            return;
        }

        self.inner.refresh_or_keep(false).await;
        self.schedule_refresh();
    }

    /// Fetches a fresh snapshot right away, bypassing intermediate HTTP caches.
    ///
    /// On error the installed snapshot is left untouched.
    pub async fn refresh(&self) -> Result<RefreshStats, CalendarError> {
        self.inner.refresh(true).await
    }

    pub fn lookup(&self, kind: CalendarKind, key: &str) -> Option<CalendarEntry> {
        self.snapshot().get(kind, &normalize_key(key)).cloned()
    }

    pub fn snapshot(&self) -> Arc<CalendarData> {
        self.inner.current()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Acquire)
    }

    pub fn is_refresh_scheduled(&self) -> bool {
        self.inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancels the periodic refresh. The current snapshot stays readable.
    pub fn stop(&self) {
        let task = self
            .inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            task.abort();
            info!("Editorial calendar refresh stopped");
        }
    }

    fn schedule_refresh(&self) {
        let Some(period) = self.inner.refresh_interval else {
            debug!("Periodic refresh disabled");
            return;
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available, editorial calendar will not refresh");
            return;
        };

        let inner = Arc::clone(&self.inner);
        let task = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                inner.refresh_or_keep(true).await;
            }
        });

        info!("Refreshing editorial calendar every {:?}", period);

        let previous = self
            .inner
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);

        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Drop for EditorialCalendar {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    fn current(&self) -> Arc<CalendarData> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    async fn refresh(&self, bypass_cache: bool) -> Result<RefreshStats, CalendarError> {
        let body = time::timeout(self.fetch_timeout, self.source.fetch(bypass_cache))
            .await
            .map_err(|_| CalendarError::Timeout(self.fetch_timeout))??;

        let parsed = parse_calendar(&body)?;
        let stats = RefreshStats::from(&parsed);

        // Only the pointer swap happens under the lock
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(parsed.data);

        info!(
            city = stats.city,
            stadium = stats.stadium,
            article = stats.article,
            skipped = stats.skipped,
            "Editorial calendar updated"
        );

        Ok(stats)
    }

    async fn refresh_or_keep(&self, bypass_cache: bool) {
        if let Err(err) = self.refresh(bypass_cache).await {
            warn!(error.kind = err.kind(), "Keeping previous editorial calendar. Err: {err}");

            let hook = self
                .failure_hook
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            if let Some(hook) = hook {
                hook(&err);
            }
        }
    }
}
