/// Lower bound of the ability scale. Every theta the engine produces is clamped here.
pub const THETA_MIN: f64 = -3.0;

/// Upper bound of the ability scale.
pub const THETA_MAX: f64 = 3.0;

/// Standard error reported before any item has been scored.
pub const INITIAL_STANDARD_ERROR: f64 = 1.0;

/// Newton-Raphson stops once a step moves theta by less than this (after clamping).
pub const CONVERGENCE_THRESHOLD: f64 = 0.001;

/// Hard cap on Newton-Raphson iterations per re-estimation.
///
/// With a warm start the loop usually settles in 3-5 steps; histories that
/// pin theta at a bound settle in 2-3 because the clamp absorbs the step.
pub const MAX_NEWTON_ITERATIONS: usize = 20;

/// Step halvings tried when a Newton step lowers the log-likelihood.
pub const MAX_STEP_HALVINGS: usize = 10;

/// Default minimum test length before a precision-based stop is allowed.
pub const DEFAULT_MIN_ITEMS: usize = 20;

/// Default hard ceiling on test length.
pub const DEFAULT_MAX_ITEMS: usize = 30;

/// Default target standard error.
pub const DEFAULT_STOPPING_SE: f64 = 0.3;
