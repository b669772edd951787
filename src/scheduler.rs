//! Drives repeated ticks on the tokio timer.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Something the [`Scheduler`] can tick.
pub(crate) trait Tick: Send + Sync + 'static {
    /// Perform one step of run `generation`. Returns the delay before the
    /// next step, or `None` to end the run.
    fn tick(&self, generation: u64) -> Option<Duration>;
}

/// Running flag plus the one pending tick loop of an animation.
///
/// Every `begin` opens a new generation. A tick only takes effect while the
/// scheduler is running and its generation is current, so a timer firing
/// after `halt` or a restart is inert.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    running: bool,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    /// Mark running and open a new generation; `None` if already running.
    pub(crate) fn begin(&mut self) -> Option<u64> {
        if self.running {
            return None;
        }
        self.running = true;
        self.generation += 1;
        Some(self.generation)
    }

    pub(crate) fn halt(&mut self) {
        self.running = false;
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    /// Spawn the tick loop for `generation`, first firing after `delay`.
    ///
    /// Replaces any previous loop. Does nothing if `generation` is stale.
    pub(crate) fn schedule<T: Tick>(&mut self, target: Arc<T>, generation: u64, delay: Duration) {
        if !self.is_current(generation) {
            return;
        }
        self.cancel();
        let mut deadline = Instant::now() + delay;
        self.pending = Some(tokio::spawn(async move {
            loop {
                sleep_until(deadline).await;
                match target.tick(generation) {
                    Some(next) => deadline = Instant::now() + next,
                    None => break,
                }
            }
        }));
    }

    /// Abort the pending tick loop, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Ticks `limit` times, 10ms apart, recording when each tick ran.
    struct Counter {
        scheduler: Mutex<Scheduler>,
        ticks: Mutex<Vec<(u64, Instant)>>,
        limit: usize,
        calls: AtomicUsize,
    }

    impl Counter {
        fn new(limit: usize) -> Arc<Self> {
            Arc::new(Self {
                scheduler: Mutex::new(Scheduler::default()),
                ticks: Mutex::new(Vec::new()),
                limit,
                calls: AtomicUsize::new(0),
            })
        }

        fn start(self: &Arc<Self>) -> Option<u64> {
            let mut scheduler = self.scheduler.lock().unwrap();
            let generation = scheduler.begin()?;
            scheduler.schedule(self.clone(), generation, Duration::from_millis(10));
            Some(generation)
        }
    }

    impl Tick for Counter {
        fn tick(&self, generation: u64) -> Option<Duration> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.scheduler.lock().unwrap().is_current(generation) {
                return None;
            }
            let mut ticks = self.ticks.lock().unwrap();
            ticks.push((generation, Instant::now()));
            (ticks.len() < self.limit).then_some(Duration::from_millis(10))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_target_stops() {
        let counter = Counter::new(3);
        let started = Instant::now();
        assert_eq!(counter.start(), Some(1));
        assert_eq!(counter.start(), None);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let ticks = counter.ticks.lock().unwrap().clone();
        let offsets: Vec<u128> = ticks
            .iter()
            .map(|(_, at)| (*at - started).as_millis())
            .collect();
        assert_eq!(offsets, [10, 20, 30]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_makes_pending_tick_inert() {
        let counter = Counter::new(100);
        counter.start();
        tokio::time::sleep(Duration::from_millis(15)).await;
        counter.scheduler.lock().unwrap().halt();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(counter.ticks.lock().unwrap().len(), 1);
        // The timer still fired once more, but did nothing.
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
        assert!(!counter.scheduler.lock().unwrap().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_opens_new_generation() {
        let counter = Counter::new(100);
        counter.start();
        tokio::time::sleep(Duration::from_millis(15)).await;
        counter.scheduler.lock().unwrap().halt();
        assert_eq!(counter.start(), Some(2));
        tokio::time::sleep(Duration::from_millis(25)).await;
        counter.scheduler.lock().unwrap().cancel();

        let generations: Vec<u64> = counter
            .ticks
            .lock()
            .unwrap()
            .iter()
            .map(|(generation, _)| *generation)
            .collect();
        assert_eq!(generations, [1, 2, 2]);
    }

    #[test]
    fn test_stale_generation_is_not_scheduled() {
        let counter = Counter::new(1);
        let mut scheduler = Scheduler::default();
        // Never began, so no generation is current and nothing is spawned
        // (spawning here would panic outside a runtime).
        scheduler.schedule(counter, 1, Duration::ZERO);
        assert!(scheduler.pending.is_none());
    }
}
