//! Step observer trait for monitoring cloth simulation progress.

/// What one step had to skip or resolve.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Constraints whose particles coincided, left uncorrected.
    pub degenerate_constraints: usize,
    /// Zero-area faces ignored by the wind generator.
    pub degenerate_faces: usize,
    /// Obstacle contacts with no usable push-out direction.
    pub degenerate_contacts: usize,
    /// Obstacle contacts resolved.
    pub contacts: usize,
    /// Particle pairs separated by the self-collision pass.
    pub self_contacts: usize,
}

impl StepStats {
    /// Total number of corrections skipped for degenerate geometry.
    pub fn skipped(&self) -> usize {
        self.degenerate_constraints + self.degenerate_faces + self.degenerate_contacts
    }
}

/// Trait for observing the phases of a cloth step.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after every enabled force generator has run.
    fn on_forces_applied(&mut self) {}

    /// Called after all particles have been integrated. Not called when
    /// integration is disabled.
    fn on_integrate(&mut self) {}

    /// Called after each constraint relaxation pass.
    fn on_constraint_iteration(&mut self, _pass: usize) {}

    /// Called after obstacle collisions have been resolved.
    fn on_collisions_resolved(&mut self) {}

    /// Called when a step is fully complete.
    fn on_step_complete(&mut self, _stats: &StepStats) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
