//! Performance statistics collection for `--stats` output.

use std::time::{Duration, Instant};

/// Collects phase timings and solver counters.
///
/// Created when `--stats` is passed, threaded as `Option<&mut Stats>`.
pub struct Stats {
    total_start: Instant,
    phases: Vec<(&'static str, Duration)>,
    pub samples: usize,
    pub queries: usize,
    /// Sweeps taken by the iterative solver, when it was used.
    pub solver_iterations: Option<usize>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            total_start: Instant::now(),
            phases: Vec::new(),
            samples: 0,
            queries: 0,
            solver_iterations: None,
        }
    }

    /// Record a completed phase with its duration.
    pub fn add_phase(&mut self, name: &'static str, duration: Duration) {
        self.phases.push((name, duration));
    }

    /// Time `f` and record it as phase `name`.
    pub fn time<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.add_phase(name, start.elapsed());
        out
    }

    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    /// Print the stats table to stderr.
    pub fn display(&self) {
        let total = self.total_start.elapsed();
        eprintln!();
        eprintln!("=== Knotwork Performance Stats ===");

        for (name, dur) in &self.phases {
            eprintln!("  {:<24} {:>8.6}s", name, dur.as_secs_f64());
        }

        eprintln!("  Samples:                {}", self.samples);
        eprintln!("  Queries:                {}", self.queries);
        if let Some(iters) = self.solver_iterations {
            eprintln!("  Solver sweeps:          {}", iters);
        }

        eprintln!("  ─────────────────────────────────");
        eprintln!("  Total:                  {:>8.6}s", total.as_secs_f64());
    }
}
