//! Cycle-driven periodic callbacks.
//!
//! Peripherals that need to keep pace with the CPU (timers, video refresh,
//! a bus pump) register a period in cycles. The engine polls the scheduler
//! after every inner burst; a callback fires once its period has been
//! exceeded and receives the cycles elapsed since it last fired.

use std::fmt;

use emu_core::Ticks;

pub type SyncCallback = Box<dyn FnMut(Ticks) + Send>;

struct Entry {
    period: Ticks,
    last: Ticks,
    callback: SyncCallback,
}

/// Registered callbacks, polled in registration order.
#[derive(Default)]
pub struct SyncScheduler {
    entries: Vec<Entry>,
}

impl fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("callbacks", &self.entries.len())
            .field("quickest_period", &self.quickest_period())
            .finish()
    }
}

impl SyncScheduler {
    pub fn add(&mut self, period: Ticks, callback: impl FnMut(Ticks) + Send + 'static) {
        self.entries.push(Entry {
            period,
            last: Ticks::ZERO,
            callback: Box::new(callback),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The shortest registered period.
    #[must_use]
    pub fn quickest_period(&self) -> Option<Ticks> {
        self.entries.iter().map(|e| e.period).min()
    }

    /// Fire every callback whose period has passed at cycle count `now`.
    pub fn poll(&mut self, now: Ticks) {
        for entry in &mut self.entries {
            let elapsed = now - entry.last;
            if elapsed > entry.period {
                entry.last = now;
                (entry.callback)(elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn fires_only_after_period_is_exceeded() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut sched = SyncScheduler::default();
        let log = Arc::clone(&calls);
        sched.add(Ticks::new(100), move |elapsed| log.lock().unwrap().push(elapsed.get()));

        sched.poll(Ticks::new(100));
        assert!(calls.lock().unwrap().is_empty(), "equal to the period is not enough");
        sched.poll(Ticks::new(101));
        sched.poll(Ticks::new(150));
        sched.poll(Ticks::new(350));
        assert_eq!(*calls.lock().unwrap(), vec![101, 249]);
    }

    #[test]
    fn runs_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut sched = SyncScheduler::default();
        assert!(sched.is_empty());
        for id in 0..3 {
            let order = Arc::clone(&order);
            sched.add(Ticks::new(10), move |_| order.lock().unwrap().push(id));
        }
        assert_eq!(sched.len(), 3);
        sched.poll(Ticks::new(20));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(sched.quickest_period(), Some(Ticks::new(10)));
    }
}
