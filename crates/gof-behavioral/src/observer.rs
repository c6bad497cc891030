//! Observer: alarm clocks subscribe to a time service and are told the
//! (possibly accelerated) current time on every tick.
//!
//! Observers stay subscribed by answering [`ObserverAction::Keep`] and leave
//! by answering [`ObserverAction::Detach`]; there is no global service for
//! them to call back into.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, NaiveTime};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{BehavioralError, Result};

/// What an observer wants after being notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverAction {
    Keep,
    Detach,
}

pub trait TimeObserver: Send {
    fn id(&self) -> &str;

    fn time_elapsed(&mut self, now: NaiveDateTime) -> ObserverAction;
}

/// Ticker settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeServiceConfig {
    /// Simulated seconds per real second.
    pub speed: u32,
    /// Real time between notifications.
    pub tick: Duration,
}

impl Default for TimeServiceConfig {
    fn default() -> Self {
        Self {
            speed: 1800,
            tick: Duration::from_millis(100),
        }
    }
}

impl TimeServiceConfig {
    /// Shortest tick the ticker will run with.
    pub const MIN_TICK: Duration = Duration::from_millis(1);

    /// The same settings with `speed` raised to at least 1 and `tick` to at
    /// least [`Self::MIN_TICK`].
    pub fn normalized(self) -> Self {
        Self {
            speed: self.speed.max(1),
            tick: self.tick.max(Self::MIN_TICK),
        }
    }

    /// `start + elapsed * speed`, clamped to the largest representable time.
    pub fn simulated(&self, start: NaiveDateTime, elapsed: Duration) -> NaiveDateTime {
        chrono::Duration::from_std(elapsed.saturating_mul(self.speed))
            .ok()
            .and_then(|d| start.checked_add_signed(d))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Holds the observers and notifies them.
#[derive(Default)]
pub struct TimeService {
    observers: Mutex<Vec<Box<dyn TimeObserver>>>,
}

impl TimeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe, replacing any observer with the same id.
    pub fn attach(&self, observer: impl TimeObserver + 'static) -> Result<()> {
        let mut observers = self.lock()?;
        observers.retain(|o| o.id() != observer.id());
        debug!(id = observer.id(), "observer attached");
        observers.push(Box::new(observer));
        Ok(())
    }

    /// Unsubscribe by id. Returns `false` if no such observer was attached.
    pub fn detach(&self, id: &str) -> Result<bool> {
        let mut observers = self.lock()?;
        let before = observers.len();
        observers.retain(|o| o.id() != id);
        Ok(observers.len() != before)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Notify every observer of `now`, dropping those that answer
    /// [`ObserverAction::Detach`]. Returns the number still attached.
    pub fn notify_all(&self, now: NaiveDateTime) -> Result<usize> {
        let mut observers = self.lock()?;
        observers.retain_mut(|o| match o.time_elapsed(now) {
            ObserverAction::Keep => true,
            ObserverAction::Detach => {
                debug!(id = o.id(), "observer detached");
                false
            }
        });
        Ok(observers.len())
    }

    /// Notify on every tick with `start` advanced at the configured speed,
    /// until the returned handle is stopped or dropped.
    ///
    /// The config is [normalized](TimeServiceConfig::normalized) first. Must
    /// be called from within a tokio runtime.
    pub fn spawn_ticker(
        self: &Arc<Self>,
        config: TimeServiceConfig,
        start: NaiveDateTime,
    ) -> TickerHandle {
        let config = config.normalized();
        let service = Arc::clone(self);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let mut interval = tokio::time::interval(config.tick);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let now = config.simulated(start, started.elapsed());
                        if let Err(e) = service.notify_all(now) {
                            warn!(error = %e, "time service notify failed");
                            break;
                        }
                    }
                }
            }
            debug!("ticker stopped");
        });
        TickerHandle {
            stop: Some(stop_tx),
            task,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Box<dyn TimeObserver>>>> {
        self.observers
            .lock()
            .map_err(|e| BehavioralError::LockPoisoned(e.to_string()))
    }
}

/// Handle to a running ticker.
pub struct TickerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stop the ticker and wait for it to finish.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            // The task may already have exited on its own.
            let _ = stop.send(());
        }
        self.task
            .await
            .map_err(|e| BehavioralError::Ticker(e.to_string()))
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

// ---------------------------------------------------------------------------
// Alarm clock
// ---------------------------------------------------------------------------

/// Rings at a time of day. Repeatable clocks re-arm for the next day after
/// `now`; one-shot clocks detach after ringing.
///
/// A notification that skips several days rings once: missed days collapse
/// into that single ring.
pub struct AlarmClock {
    name: String,
    time: NaiveTime,
    repeatable: bool,
    next: NaiveDateTime,
    occurs: Arc<AtomicU32>,
}

impl AlarmClock {
    /// Arm a clock for `hour:minute`: today if that is not yet past at
    /// `now`, tomorrow otherwise.
    pub fn new(
        name: impl Into<String>,
        hour: u32,
        minute: u32,
        repeatable: bool,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(BehavioralError::InvalidAlarmTime { hour, minute })?;
        let mut next = now.date().and_time(time);
        if next < now {
            next += chrono::Duration::days(1);
        }
        let name = name.into();
        debug!(alarm = %name, next = %next, "alarm armed");
        Ok(Self {
            name,
            time,
            repeatable,
            next,
            occurs: Arc::new(AtomicU32::new(0)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn next(&self) -> NaiveDateTime {
        self.next
    }

    pub fn occurs(&self) -> u32 {
        self.occurs.load(Ordering::SeqCst)
    }

    /// A counter of rings that stays readable after the clock is attached.
    pub fn occurs_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.occurs)
    }
}

impl TimeObserver for AlarmClock {
    fn id(&self) -> &str {
        &self.name
    }

    fn time_elapsed(&mut self, now: NaiveDateTime) -> ObserverAction {
        if now < self.next {
            return ObserverAction::Keep;
        }
        let count = self.occurs.fetch_add(1, Ordering::SeqCst) + 1;
        let at = now.format("%Y-%m-%d %H:%M:%S");
        info!(alarm = %self.name, %at, count, "alarm");
        if self.repeatable {
            while self.next <= now {
                self.next += chrono::Duration::days(1);
            }
            ObserverAction::Keep
        } else {
            ObserverAction::Detach
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn arms_today_or_tomorrow() {
        let now = at(1, 12, 0);
        let lunch = AlarmClock::new("lunch", 12, 30, true, now).unwrap();
        assert_eq!(lunch.next(), at(1, 12, 30));
        let wake = AlarmClock::new("wake", 6, 0, true, now).unwrap();
        assert_eq!(wake.next(), at(2, 6, 0));
        // Exactly now still counts as today.
        let noon = AlarmClock::new("noon", 12, 0, false, now).unwrap();
        assert_eq!(noon.next(), now);
    }

    #[test]
    fn invalid_time() {
        assert!(matches!(
            AlarmClock::new("bad", 24, 0, false, at(1, 0, 0)),
            Err(BehavioralError::InvalidAlarmTime { hour: 24, minute: 0 })
        ));
    }

    #[test]
    fn repeatable_rearms_and_one_shot_detaches() {
        let service = TimeService::new();
        let start = at(1, 0, 0);
        let repeat = AlarmClock::new("night", 22, 0, true, start).unwrap();
        let once = AlarmClock::new("meeting", 14, 30, false, start).unwrap();
        let (repeat_count, once_count) = (repeat.occurs_handle(), once.occurs_handle());
        service.attach(repeat).unwrap();
        service.attach(once).unwrap();

        assert_eq!(service.notify_all(at(1, 14, 0)).unwrap(), 2);
        assert_eq!(service.notify_all(at(1, 14, 30)).unwrap(), 1);
        assert_eq!(service.notify_all(at(1, 22, 5)).unwrap(), 1);
        // Same day again: already re-armed for tomorrow.
        service.notify_all(at(1, 23, 0)).unwrap();
        service.notify_all(at(2, 22, 0)).unwrap();

        assert_eq!(once_count.load(Ordering::SeqCst), 1);
        assert_eq!(repeat_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn skipped_days_ring_once_and_rearm_ahead() {
        let mut clock = AlarmClock::new("wake", 6, 0, true, at(1, 0, 0)).unwrap();
        assert_eq!(clock.time_elapsed(at(4, 7, 0)), ObserverAction::Keep);
        assert_eq!(clock.occurs(), 1);
        assert_eq!(clock.next(), at(5, 6, 0));
        // Ringing exactly on time re-arms for the next day.
        clock.time_elapsed(at(5, 6, 0));
        assert_eq!(clock.next(), at(6, 6, 0));
        assert_eq!(clock.occurs(), 2);
    }

    #[test]
    fn attach_replaces_and_detach_removes() {
        let service = TimeService::new();
        let now = at(1, 0, 0);
        service.attach(AlarmClock::new("a", 1, 0, true, now).unwrap()).unwrap();
        service.attach(AlarmClock::new("a", 2, 0, true, now).unwrap()).unwrap();
        assert_eq!(service.len().unwrap(), 1);
        assert!(service.detach("a").unwrap());
        assert!(!service.detach("a").unwrap());
        assert!(service.is_empty().unwrap());
    }

    #[test]
    fn simulated_time_scales_elapsed() {
        let config = TimeServiceConfig::default();
        let start = at(1, 0, 0);
        assert_eq!(config.simulated(start, Duration::from_secs(2)), at(1, 1, 0));
        assert_eq!(config.simulated(start, Duration::MAX), NaiveDateTime::MAX);
    }

    #[test]
    fn normalized_clamps_zero_settings() {
        let config = TimeServiceConfig {
            speed: 0,
            tick: Duration::ZERO,
        }
        .normalized();
        assert_eq!(config.speed, 1);
        assert_eq!(config.tick, TimeServiceConfig::MIN_TICK);
        assert_eq!(TimeServiceConfig::default().normalized(), TimeServiceConfig::default());
    }

    #[tokio::test]
    async fn ticker_runs_with_zero_tick() {
        let service = Arc::new(TimeService::new());
        let config = TimeServiceConfig {
            speed: 0,
            tick: Duration::ZERO,
        };
        let ticker = service.spawn_ticker(config, at(1, 0, 0));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!ticker.is_finished());
        ticker.stop().await.unwrap();
    }

    #[tokio::test]
    async fn ticker_drives_alarms_until_stopped() {
        let service = Arc::new(TimeService::new());
        let start = at(1, 0, 0);
        let clock = AlarmClock::new("wake", 6, 0, true, start).unwrap();
        let occurs = clock.occurs_handle();
        service.attach(clock).unwrap();

        // One real millisecond is one simulated hour.
        let config = TimeServiceConfig {
            speed: 3_600_000,
            tick: Duration::from_millis(5),
        };
        let ticker = service.spawn_ticker(config, start);

        let deadline = Instant::now() + Duration::from_secs(5);
        while occurs.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        ticker.stop().await.unwrap();

        let seen = occurs.load(Ordering::SeqCst);
        assert!(seen >= 2, "alarm rang {seen} times");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(occurs.load(Ordering::SeqCst), seen);
    }
}
