// Audit Report Types
// Structured output for reviewing a calculator build against its invariants

use serde::Serialize;

// ─── Single Check ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub pass: bool,
    pub detail: String,
}

impl Check {
    pub fn new(name: &'static str, pass: bool, detail: impl Into<String>) -> Self {
        Self { name, pass, detail: detail.into() }
    }
}

// ─── Named Scenario Result ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: &'static str,
    pub label: &'static str,
    pub pass: bool,
    pub checks: Vec<Check>,
}

// ─── Random Sweep Result ────────────────────────────────────────────────────

/// Per-invariant failure counts across all sweep runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvariantTally {
    pub name: &'static str,
    pub evaluated: usize,
    pub failed: usize,
    /// Seeds of the first few failing runs, for reproduction.
    pub failing_seeds: Vec<u64>,
}

impl InvariantTally {
    const MAX_RECORDED_SEEDS: usize = 10;

    pub fn new(name: &'static str) -> Self {
        Self { name, ..Self::default() }
    }

    pub fn record(&mut self, seed: u64, pass: bool) {
        self.evaluated += 1;
        if !pass {
            self.failed += 1;
            if self.failing_seeds.len() < Self::MAX_RECORDED_SEEDS {
                self.failing_seeds.push(seed);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub runs: usize,
    pub base_seed: u64,
    pub qualifying_runs: usize,
    pub redeemable_runs: usize,
    pub mean_points: f64,
    pub mean_final_medal_change: f64,
    pub invariants: Vec<InvariantTally>,
}

impl SweepResult {
    pub fn pass(&self) -> bool {
        self.invariants.iter().all(|t| t.failed == 0)
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioResult>,
    pub sweep: SweepResult,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub scenarios_total: usize,
    pub scenarios_passed: usize,
    pub sweep_pass: bool,
}
