//! End-to-end test runner.
//!
//! Each instance is handled sequentially:
//!
//! 1. generate a random network and solve it with the oracle; instances
//!    without a unique solution are skipped,
//! 2. feed the test case to the subject and capture its output,
//! 3. parse the output and compare it with the oracle's answer.
//!
//! Subject failures of any kind (spawn error, non-zero exit, timeout,
//! malformed output) fail the instance; the run continues.

mod subject;

pub use subject::{SubjectCommand, SubjectOutput};

use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use rand::Rng;

use crate::compare::{compare, Tolerances};
use crate::error::Result;
use crate::generate::{generate_network, GeneratorConfig};
use crate::network::Network;
use crate::solver::{Solver, SolverConfig};
use crate::text::{parse_answer, write_answer, write_case, write_file};

/// Configuration for a test run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Program under test.
    pub subject: SubjectCommand,
    /// Number of instances to generate.
    pub tests: usize,
    /// Random network parameters.
    pub generator: GeneratorConfig,
    /// Comparison tolerances.
    pub tolerances: Tolerances,
    /// Oracle solver parameters.
    pub solver: SolverConfig,
    /// Directory where failing instances are written, if any.
    pub keep_dir: Option<PathBuf>,
}

impl RunnerConfig {
    /// Create a configuration with defaults for everything but the subject.
    pub fn new(subject: SubjectCommand) -> Self {
        Self {
            subject,
            tests: 10,
            generator: GeneratorConfig::default(),
            tolerances: Tolerances::default(),
            solver: SolverConfig::default(),
            keep_dir: None,
        }
    }

    /// Set the number of instances.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.tests = tests;
        self
    }

    /// Set the generator configuration.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Set the comparison tolerances.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Set the solver configuration.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Persist failing instances into `dir`.
    pub fn with_keep_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.keep_dir = Some(dir.into());
        self
    }
}

/// Result of one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Subject output matched the oracle
    Passed,
    /// Subject output did not match, or the subject failed
    Failed(String),
    /// The network has no unique solution; nothing to compare against
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed(reason) => write!(f, "FAILED: {}", reason),
            Outcome::Skipped => write!(f, "skipped (no unique solution)"),
        }
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Instances that passed.
    pub passed: usize,
    /// Instances that were compared.
    pub total: usize,
    /// Instances skipped for lack of a unique solution.
    pub skipped: usize,
}

impl RunSummary {
    /// Fold one outcome into the summary.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => {
                self.passed += 1;
                self.total += 1;
            }
            Outcome::Failed(_) => self.total += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// Whether every compared instance passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passed {} out of {}", self.passed, self.total)
    }
}

/// Drives the subject against oracle answers.
pub struct Runner {
    config: RunnerConfig,
    solver: Solver,
}

impl Runner {
    /// Create a runner.
    pub fn new(config: RunnerConfig) -> Self {
        let solver = Solver::with_config(config.solver.clone());
        Self { config, solver }
    }

    /// Run all instances, calling `on_instance` after each one.
    pub fn run<R, F>(&self, rng: &mut R, mut on_instance: F) -> Result<RunSummary>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, &Outcome),
    {
        info!(
            "running {} tests of {} nodes against {}",
            self.config.tests,
            self.config.generator.node_count,
            self.config.subject.program.display()
        );

        let mut summary = RunSummary::default();
        for index in 1..=self.config.tests {
            let network = generate_network(rng, &self.config.generator)?;
            let outcome = self.run_instance(index, &network)?;
            summary.record(&outcome);
            on_instance(index, &outcome);
        }

        info!("{} ({} skipped)", summary, summary.skipped);
        Ok(summary)
    }

    /// Check the subject against one network.
    ///
    /// Errors are reserved for harness failures (writing kept files);
    /// anything the subject does wrong is a [`Outcome::Failed`].
    pub fn run_instance(&self, index: usize, network: &Network) -> Result<Outcome> {
        let solution = match self.solver.solve(network) {
            Ok(solution) => solution,
            Err(e) if e.is_singular() => {
                warn!("test {}: no unique solution, skipping", index);
                return Ok(Outcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let case = write_case(network);
        let answer = solution.measurements(network);

        let (outcome, stdout) = match self.config.subject.run(&case) {
            Err(e) => (Outcome::Failed(e.to_string()), String::new()),
            Ok(output) if !output.status.success() => {
                let stderr = output.stderr.lines().next().unwrap_or("").trim().to_string();
                let reason = if stderr.is_empty() {
                    format!("subject exited with {}", output.status)
                } else {
                    format!("subject exited with {}: {}", output.status, stderr)
                };
                (Outcome::Failed(reason), output.stdout)
            }
            Ok(output) => {
                let outcome = match parse_answer(&output.stdout) {
                    Err(e) => Outcome::Failed(format!("unreadable output: {}", e)),
                    Ok(result) => {
                        let verdict = compare(&result, &answer, &self.config.tolerances);
                        if verdict.passed() {
                            Outcome::Passed
                        } else {
                            Outcome::Failed(verdict.diagnostic())
                        }
                    }
                };
                (outcome, output.stdout)
            }
        };

        if let (Outcome::Failed(_), Some(dir)) = (&outcome, &self.config.keep_dir) {
            let case_path = dir.join(format!("case_{}.txt", index));
            write_file(&case_path, &case)?;
            write_file(&case_path.with_extension("txt.ans"), &write_answer(&answer))?;
            write_file(&case_path.with_extension("txt.out"), &stdout)?;
            info!("test {}: kept failing case in {}", index, case_path.display());
        }

        Ok(outcome)
    }
}
