//! Simulator configuration

/// Configuration for a [`Circuit`](crate::Circuit)
///
/// Read at every operation: changing a value through
/// [`Circuit::config_mut`](crate::Circuit::config_mut) affects the next
/// gate application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of worker threads for parallel kernels
    ///
    /// Parallel kernels run inside a circuit-owned pool of this many
    /// threads.
    ///
    /// Default: available parallelism
    pub worker_count: usize,

    /// Minimum register width (in qubits) for parallel kernels
    ///
    /// Specialized one- and two-qubit kernels use their parallel variant
    /// only when the circuit holds strictly more than this many qubits;
    /// smaller states stay single-threaded to avoid fork/join overhead.
    ///
    /// Default: 10
    pub parallel_threshold: usize,

    /// Random seed for measurement sampling
    ///
    /// If None, the circuit draws a fresh seed from the OS. Set to
    /// Some(seed) for reproducible measurement outcomes.
    ///
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            parallel_threshold: 10,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker thread count.
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Set the parallel threshold in qubits.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the measurement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be > 0".to_string());
        }
        Ok(())
    }
}
