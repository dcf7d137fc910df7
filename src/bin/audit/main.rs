// Rebate Engine Audit Runner v0.1.0 — invariant validation for the rewards calculator
// Named scenarios with known answers, plus seeded random sweeps (ChaCha8Rng)
//
// Usage:
//   cargo run --release --bin audit                     # All scenarios, 1000-run sweep
//   cargo run --release --bin audit -- --runs 100       # Quick mode
//   cargo run --release --bin audit -- MEDAL            # Filter scenarios by name
//   cargo run --release --bin audit -- --seed 42        # Custom base seed
//   RUST_LOG=debug cargo run --bin audit                # Per-run tracing

mod report;
mod scenarios;
mod sweep;

use report::*;
use scenarios::*;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    filter: Option<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self { runs: 1000, seed: 0, filter: None }
    }
}

/// Parse the value following `flag`, keeping `current` when it is missing or malformed.
fn flag_value<T: std::str::FromStr>(flag: &str, value: Option<String>, current: T) -> T {
    match value.as_deref().map(str::parse::<T>) {
        Some(Ok(parsed)) => parsed,
        _ => {
            warn!(flag, value = ?value, "ignoring missing or malformed flag value");
            current
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliArgs {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => cli.runs = flag_value("--runs", args.next(), cli.runs),
            "--seed" => cli.seed = flag_value("--seed", args.next(), cli.seed),
            _ if !arg.starts_with('-') => cli.filter = Some(arg.clone()),
            _ => warn!(argument = %arg, "unknown argument"),
        }
    }

    cli
}

fn write_report(report: &AuditReport, timestamp: &str) -> std::io::Result<PathBuf> {
    let dir = Path::new("audit-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("audit-{}.json", timestamp));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = parse_args(std::env::args().skip(1));
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    println!("\n  Rebate Engine Audit Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Sweep runs: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<26} {:<36} {:>7} {:>6}", "Scenario", "Label", "Checks", "");
    println!("  {}", "-".repeat(80));

    let suite_start = Instant::now();
    let mut results = Vec::new();

    for scenario in &to_run {
        let result = scenario.execute();
        let status = if result.pass { "PASS" } else { "FAIL" };
        println!("  {:<26} {:<36} {:>7} {:>6}",
            result.scenario, result.label, result.checks.len(), status);
        for check in result.checks.iter().filter(|c| !c.pass) {
            println!("      {} — {}", check.name, check.detail);
        }
        results.push(result);
    }

    // ─── Random Sweep ───────────────────────────────────────────────────

    let sweep = sweep::run_sweep(cli.runs, cli.seed);
    info!(
        runs = sweep.runs,
        qualifying = sweep.qualifying_runs,
        redeemable = sweep.redeemable_runs,
        "sweep finished"
    );

    println!("\n  Invariant sweep ({} runs, {} qualifying, {} redeemable):",
        sweep.runs, sweep.qualifying_runs, sweep.redeemable_runs);
    for tally in &sweep.invariants {
        let status = if tally.failed == 0 { "PASS" } else { "FAIL" };
        println!("    {:<24} {:>6}/{:<6} {}", tally.name, tally.evaluated - tally.failed,
            tally.evaluated, status);
        if !tally.failing_seeds.is_empty() {
            println!("      failing seeds: {:?}", tally.failing_seeds);
        }
    }

    // ─── Summary ────────────────────────────────────────────────────────

    let total = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let sweep_pass = sweep.pass();

    println!("  {}", "-".repeat(80));
    println!("  Scenarios: {}/{}  Sweep: {}  Suite time: {:.2}s\n",
        passed, total, if sweep_pass { "PASS" } else { "FAIL" },
        suite_start.elapsed().as_secs_f64());

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string();

    let report = AuditReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        summary: Summary {
            scenarios_total: total,
            scenarios_passed: passed,
            sweep_pass,
        },
        scenarios: results,
        sweep,
    };

    match write_report(&report, &timestamp) {
        Ok(path) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => error!(error = %e, "failed to write audit report"),
    }

    if passed < total || !sweep_pass {
        std::process::exit(1);
    }
}
