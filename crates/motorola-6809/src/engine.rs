//! Burst execution, pacing and bounded test runs.

use std::time::Duration;

use emu_core::{Memory, Ticks};

use crate::Mc6809;
use crate::error::{CpuError, Result};

/// Instruction cap for [`Mc6809::test_run`] when the caller has no better one.
pub const DEFAULT_MAX_OPS: u64 = 1_000_000;

impl<M: Memory> Mc6809<M> {
    /// Register `callback` to run every `period` cycles (polled per burst).
    pub fn add_sync_callback(&mut self, period: u64, callback: impl FnMut(Ticks) + Send + 'static) {
        self.sync.add(Ticks::new(period), callback);
    }

    /// Shortest registered sync period, if any.
    #[must_use]
    pub fn quickest_sync_period(&self) -> Option<u64> {
        self.sync.quickest_period().map(Ticks::get)
    }

    pub fn call_sync_callbacks(&mut self) {
        self.sync.poll(self.cycles);
    }

    /// Run `outer_burst_op_count` inner bursts of `inner_burst_op_count`
    /// instructions, polling sync callbacks after each inner burst.
    ///
    /// Returns early, without error, once the CPU has been told to quit,
    /// even if that happens part way through an inner burst.
    pub fn burst_run(&mut self) -> Result<()> {
        for _ in 0..self.burst.outer_burst_op_count {
            for _ in 0..self.burst.inner_burst_op_count {
                if !self.is_running() {
                    return Ok(());
                }
                self.step()?;
            }
            self.call_sync_callbacks();
        }
        Ok(())
    }

    /// [`Mc6809::burst_run`], then sleep so the average speed does not
    /// exceed `target_cycles_per_sec`.
    pub fn delayed_burst_run(&mut self, target_cycles_per_sec: f64) -> Result<()> {
        let old_cycles = self.cycles;
        let start = self.clock.now();

        self.burst_run()?;

        let duration = self.clock.now().saturating_sub(start).as_secs_f64();
        let new_cycles = (self.cycles - old_cycles).get();
        match self.burst.pacing_delay(new_cycles, duration, target_cycles_per_sec) {
            Some(delay) => {
                self.burst.delay = delay;
                self.clock.sleep(delay);
            }
            None => self.burst.delay = Duration::ZERO,
        }

        self.call_sync_callbacks();
        Ok(())
    }

    /// One scheduling slice of the configured length.
    pub fn run(&mut self, target_cycles_per_sec: Option<f64>) -> Result<()> {
        let max_run_time = self.config.max_run_time();
        self.run_for(max_run_time, target_cycles_per_sec)
    }

    /// Run one (optionally paced) burst, then retune the outer burst count
    /// so the next call takes about `max_run_time`, pacing sleep excluded.
    pub fn run_for(&mut self, max_run_time: Duration, target_cycles_per_sec: Option<f64>) -> Result<()> {
        let start = self.clock.now();

        if let Some(target) = target_cycles_per_sec {
            self.delayed_burst_run(target)?;
        } else {
            self.burst.delay = Duration::ZERO;
            self.burst_run()?;
        }

        let busy = self
            .clock
            .now()
            .saturating_sub(start)
            .saturating_sub(self.burst.delay);
        let old = self.burst.outer_burst_op_count;
        let new = self
            .burst
            .calc_new_count(old, busy.as_secs_f64(), max_run_time.as_secs_f64());
        if new != old {
            log::debug!("outer burst count {old} -> {new} ({busy:?} busy)");
        }
        self.burst.outer_burst_op_count = new;
        Ok(())
    }

    /// Execute from `start` until PC reaches `end`.
    ///
    /// # Errors
    ///
    /// [`CpuError::RunawayExecution`] if `end` is not reached within
    /// `max_ops` instructions, plus anything [`Mc6809::step`] raises.
    pub fn test_run(&mut self, start: u16, end: u16, max_ops: u64) -> Result<()> {
        self.regs.pc.set(start.into());
        for _ in 0..max_ops {
            if self.regs.pc.get() == end {
                return Ok(());
            }
            self.step()?;
        }
        let pc = self.regs.pc.get();
        log::error!("max ops {max_ops} reached at ${pc:04X} without hitting ${end:04X}");
        Err(CpuError::RunawayExecution { max_ops, pc })
    }

    /// Execute exactly `count` instructions from `start`, polling sync
    /// callbacks after each one.
    pub fn test_run_steps(&mut self, start: u16, count: u64) -> Result<()> {
        self.regs.pc.set(start.into());
        let saved = (self.burst.outer_burst_op_count, self.burst.inner_burst_op_count);
        self.burst.outer_burst_op_count = count;
        self.burst.inner_burst_op_count = 1;

        let result = self.burst_run();

        (self.burst.outer_burst_op_count, self.burst.inner_burst_op_count) = saved;
        result
    }
}
