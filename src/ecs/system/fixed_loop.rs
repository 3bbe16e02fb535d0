use serde::{Deserialize, Serialize};

use super::SystemScheduler;
use crate::resources::errors::SimError;

const DEFAULT_FIXED_DELTA_MS: f64 = 1000.0 / 60.0;
const DEFAULT_MAX_SUB_STEPS: u32 = 5;
const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 250.0;

/// Read-only view of the current fixed step, handed to every system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStepContext {
    pub fixed_delta_ms: f64,
    pub fixed_delta_seconds: f32,
    pub step_index: u64,
    pub elapsed_ms: f64,
}

impl FixedStepContext {
    pub fn new(fixed_delta_ms: f64) -> Self {
        Self {
            fixed_delta_ms,
            fixed_delta_seconds: (fixed_delta_ms / 1000.0) as f32,
            step_index: 0,
            elapsed_ms: 0.0,
        }
    }
}

impl Default for FixedStepContext {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DELTA_MS)
    }
}

/// Per-frame diagnostics. Never fed back into the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopFrameMetrics {
    /// Wall-clock delta handed to the loop, floored at zero
    pub frame_delta_ms: f64,
    /// Portion of the delta that entered the accumulator
    pub used_delta_ms: f64,
    pub fixed_step_ms: f64,
    pub steps_executed: u32,
    /// Time carried over to the next frame
    pub accumulator_ms: f64,
    /// Time dropped by the frame clamp and the catch-up cap
    pub clamped_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedTimestepLoopOptions {
    pub fixed_delta_ms: f64,
    pub max_sub_steps: u32,
    pub max_frame_delta_ms: f64,
}

impl Default for FixedTimestepLoopOptions {
    fn default() -> Self {
        Self {
            fixed_delta_ms: DEFAULT_FIXED_DELTA_MS,
            max_sub_steps: DEFAULT_MAX_SUB_STEPS,
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA_MS,
        }
    }
}

impl FixedTimestepLoopOptions {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.fixed_delta_ms.is_finite() && self.fixed_delta_ms > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "fixed_delta_ms must be positive, got {}",
                self.fixed_delta_ms
            )));
        }
        if self.max_sub_steps == 0 {
            return Err(SimError::InvalidConfig(
                "max_sub_steps must be at least 1".to_string(),
            ));
        }
        if !(self.max_frame_delta_ms >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "max_frame_delta_ms must be non-negative, got {}",
                self.max_frame_delta_ms
            )));
        }
        Ok(())
    }
}

pub type FrameCallback = Box<dyn FnMut(&LoopFrameMetrics)>;

/// Accumulator-based fixed-step driver for a [`SystemScheduler`].
///
/// Irregular frame deltas are turned into a whole number of fixed steps. The
/// fractional remainder always carries into the next frame unless the
/// catch-up cap drops it.
pub struct FixedTimestepLoop<W> {
    scheduler: SystemScheduler<W>,
    options: FixedTimestepLoopOptions,
    on_frame: Option<FrameCallback>,
    accumulator_ms: f64,
    last_timestamp: Option<f64>,
    step_index: u64,
    elapsed_ms: f64,
    running: bool,
    context: FixedStepContext,
}

impl<W> FixedTimestepLoop<W> {
    pub fn new(options: FixedTimestepLoopOptions) -> Self {
        Self::with_scheduler(SystemScheduler::new(), options)
    }

    pub fn with_scheduler(scheduler: SystemScheduler<W>, options: FixedTimestepLoopOptions) -> Self {
        Self {
            scheduler,
            options,
            on_frame: None,
            accumulator_ms: 0.0,
            last_timestamp: None,
            step_index: 0,
            elapsed_ms: 0.0,
            running: false,
            context: FixedStepContext::new(options.fixed_delta_ms),
        }
    }

    pub fn set_on_frame(&mut self, callback: FrameCallback) {
        self.on_frame = Some(callback);
    }

    pub fn scheduler(&self) -> &SystemScheduler<W> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut SystemScheduler<W> {
        &mut self.scheduler
    }

    pub fn options(&self) -> &FixedTimestepLoopOptions {
        &self.options
    }

    pub fn fixed_delta_seconds(&self) -> f32 {
        self.context.fixed_delta_seconds
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
    }

    /// Stops frame-driven advancement. Accumulator and step index are kept.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.last_timestamp = None;
    }

    /// Frame-source callback. Returns `None` while stopped and on the first
    /// frame after a start, which only records the timestamp.
    pub fn frame(&mut self, timestamp_ms: f64, world: &mut W) -> Option<LoopFrameMetrics> {
        if !self.running {
            return None;
        }

        let Some(last) = self.last_timestamp.replace(timestamp_ms) else {
            return None;
        };

        Some(self.step(timestamp_ms - last, world))
    }

    /// Advances by `frame_delta_ms` and reports the frame to the `on_frame` callback.
    pub fn step(&mut self, frame_delta_ms: f64, world: &mut W) -> LoopFrameMetrics {
        let metrics = self.advance(frame_delta_ms, world);
        if let Some(on_frame) = self.on_frame.as_mut() {
            on_frame(&metrics);
        }
        metrics
    }

    pub fn advance(&mut self, frame_delta_ms: f64, world: &mut W) -> LoopFrameMetrics {
        let fixed_delta_ms = self.options.fixed_delta_ms;
        let max_sub_steps = self.options.max_sub_steps;

        // f64::max returns the non-NaN operand
        let raw_delta = frame_delta_ms.max(0.0);
        let limited_delta = raw_delta.min(self.options.max_frame_delta_ms);
        let mut clamped_ms = raw_delta - limited_delta;

        self.accumulator_ms += limited_delta;
        let max_accumulator = fixed_delta_ms * f64::from(max_sub_steps);
        if self.accumulator_ms > max_accumulator {
            clamped_ms += self.accumulator_ms - max_accumulator;
            self.accumulator_ms = max_accumulator;
        }

        let mut steps_executed = 0;
        while self.accumulator_ms >= fixed_delta_ms && steps_executed < max_sub_steps {
            self.run_fixed_step(world);
            self.accumulator_ms -= fixed_delta_ms;
            steps_executed += 1;
        }

        LoopFrameMetrics {
            frame_delta_ms: raw_delta,
            used_delta_ms: raw_delta - clamped_ms,
            fixed_step_ms: fixed_delta_ms,
            steps_executed,
            accumulator_ms: self.accumulator_ms,
            clamped_ms,
        }
    }

    fn run_fixed_step(&mut self, world: &mut W) {
        self.step_index += 1;
        self.context.step_index = self.step_index;
        self.context.elapsed_ms = self.elapsed_ms;

        self.scheduler.run_systems(&self.context, world);

        self.elapsed_ms += self.options.fixed_delta_ms;
    }
}
