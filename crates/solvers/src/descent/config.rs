use thiserror::Error;

/// Configuration for the descent fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    step_size: f64,
    objective_tol: f64,
    gradient_tol: f64,
    constraint_weight: f64,
}

/// Errors that can occur when validating a descent fitter config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step_size must be finite and positive")]
    StepSize,

    #[error("objective_tol must be finite and non-negative")]
    ObjectiveTol,

    #[error("gradient_tol must be finite and non-negative")]
    GradientTol,

    #[error("constraint_weight must be finite and positive")]
    ConstraintWeight,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(100, 0.1, 1e-12, 1e-10, 1.0).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated step size, tolerances, and weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the step size or constraint weight is not finite
    /// and positive, or if either tolerance is negative or non-finite.
    pub fn new(
        max_iters: usize,
        step_size: f64,
        objective_tol: f64,
        gradient_tol: f64,
        constraint_weight: f64,
    ) -> Result<Self, ConfigError> {
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(ConfigError::StepSize);
        }
        if !objective_tol.is_finite() || objective_tol < 0.0 {
            return Err(ConfigError::ObjectiveTol);
        }
        if !gradient_tol.is_finite() || gradient_tol < 0.0 {
            return Err(ConfigError::GradientTol);
        }
        if !constraint_weight.is_finite() || constraint_weight <= 0.0 {
            return Err(ConfigError::ConstraintWeight);
        }

        Ok(Self {
            max_iters,
            step_size,
            objective_tol,
            gradient_tol,
            constraint_weight,
        })
    }

    /// Returns the maximum number of descent steps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the fixed step length applied to the gradient.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the tolerance on the change in objective between steps.
    #[must_use]
    pub fn objective_tol(&self) -> f64 {
        self.objective_tol
    }

    /// Returns the tolerance on the gradient norm.
    #[must_use]
    pub fn gradient_tol(&self) -> f64 {
        self.gradient_tol
    }

    /// Returns the penalty weight applied to squared constraint values.
    #[must_use]
    pub fn constraint_weight(&self) -> f64 {
        self.constraint_weight
    }
}
