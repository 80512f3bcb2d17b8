//! Kirchhoff - DC resistive-network oracle
//!
//! Solves test cases, generates random ones, compares result files, and runs
//! a solver under test against oracle answers.
//!
//! # Usage
//!
//! ```bash
//! kirchhoff solve case.txt
//! kirchhoff generate --nodes 6 --output case.txt --answer --seed 1
//! kirchhoff compare result.txt case.txt.ans
//! kirchhoff run --tests 100 --nodes 8 -- ./my_solver
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kirchhoff_oracle::{
    compare::{compare, Tolerances, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_RELATIVE_TOLERANCE},
    error::{OracleError, Result},
    generate::{generate_network, GeneratorConfig},
    runner::{Runner, RunnerConfig, SubjectCommand},
    solver::{SolverConfig, DEFAULT_PIVOT_TOLERANCE},
    text, Solver,
};

/// Reference oracle for DC resistive-network solvers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a test case and print the answer
    Solve {
        /// Test case file (stdin when absent)
        #[arg(value_name = "CASE_FILE")]
        case_file: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Generate a random test case
    Generate {
        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,

        /// Where to write the test case
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Also write the oracle answer to FILE.ans
        #[arg(short, long)]
        answer: bool,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Compare a result file with an answer file
    Compare {
        /// Output of the solver under test
        #[arg(value_name = "RESULT_FILE")]
        result: PathBuf,

        /// Reference answer
        #[arg(value_name = "ANSWER_FILE")]
        answer: PathBuf,

        #[command(flatten)]
        tolerances: ToleranceArgs,
    },

    /// Run a solver under test against random instances
    Run {
        /// Number of instances
        #[arg(short, long, default_value_t = 10)]
        tests: usize,

        /// Nodes per instance
        #[arg(short, long)]
        nodes: usize,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Kill the solver under test after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Write failing instances into this directory
        #[arg(long, value_name = "DIR")]
        keep: Option<PathBuf>,

        #[command(flatten)]
        tolerances: ToleranceArgs,

        #[command(flatten)]
        solver: SolverArgs,

        /// Solver under test and its arguments (after `--`)
        #[arg(last = true, required = true, value_name = "SUBJECT")]
        subject: Vec<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct ToleranceArgs {
    /// Relative tolerance for currents
    #[arg(long, default_value_t = DEFAULT_RELATIVE_TOLERANCE)]
    rel_tol: f64,

    /// Absolute tolerance for currents (A)
    #[arg(long, default_value_t = DEFAULT_ABSOLUTE_TOLERANCE)]
    abs_tol: f64,
}

impl ToleranceArgs {
    fn tolerances(&self) -> Result<Tolerances> {
        Tolerances::new(self.rel_tol, self.abs_tol)
    }
}

#[derive(ClapArgs, Debug)]
struct SolverArgs {
    /// Pivot tolerance for singularity detection (on the equilibrated matrix)
    #[arg(long, default_value_t = DEFAULT_PIVOT_TOLERANCE)]
    pivot_tol: f64,
}

impl SolverArgs {
    fn solver_config(&self) -> Result<SolverConfig> {
        SolverConfig::new().with_pivot_tolerance(self.pivot_tol)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Solve { case_file, solver } => {
            let input = match &case_file {
                Some(path) => text::read_file(path)?,
                None => io::read_to_string(io::stdin()).map_err(|e| OracleError::FileRead {
                    path: "<stdin>".to_string(),
                    source: e,
                })?,
            };
            let network = text::parse_case(&input)?;
            let solution = Solver::with_config(solver.solver_config()?).solve(&network)?;

            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text::write_answer(&solution.measurements(&network)).as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| OracleError::FileWrite {
                    path: "<stdout>".to_string(),
                    source: e,
                })?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Generate {
            nodes,
            output,
            answer,
            seed,
            solver,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            info!("seed {}", seed);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let network = generate_network(&mut rng, &GeneratorConfig::new().with_node_count(nodes))?;
            text::write_file(&output, &text::write_case(&network))?;

            if answer {
                let mut answer_path = OsString::from(output.as_os_str());
                answer_path.push(".ans");
                let answer_path = PathBuf::from(answer_path);

                match Solver::with_config(solver.solver_config()?).solve(&network) {
                    Ok(solution) => {
                        let rendered = text::write_answer(&solution.measurements(&network));
                        text::write_file(&answer_path, &rendered)?;
                    }
                    Err(e) if e.is_singular() => {
                        warn!("{}: no unique solution, answer not written", output.display());
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Compare {
            result,
            answer,
            tolerances,
        } => {
            let tolerances = tolerances.tolerances()?;
            let answer = text::parse_answer_file(&answer)?;
            let result = match text::parse_answer_file(&result) {
                Ok(result) => result,
                Err(e @ OracleError::Parse { .. }) => {
                    println!("unreadable result: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e),
            };

            let verdict = compare(&result, &answer, &tolerances);
            println!("{}", verdict);
            Ok(if verdict.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Run {
            tests,
            nodes,
            seed,
            timeout,
            keep,
            tolerances,
            solver,
            subject,
        } => {
            let (program, subject_args) = subject
                .split_first()
                .ok_or_else(|| OracleError::invalid_parameter("no subject program given"))?;
            let mut subject = SubjectCommand::new(program).with_args(subject_args.iter().cloned());
            if let Some(secs) = timeout {
                subject = subject.with_timeout(Duration::from_secs(secs));
            }

            if let Some(dir) = &keep {
                std::fs::create_dir_all(dir).map_err(|e| OracleError::FileWrite {
                    path: dir.display().to_string(),
                    source: e,
                })?;
            }

            let mut config = RunnerConfig::new(subject)
                .with_tests(tests)
                .with_generator(GeneratorConfig::new().with_node_count(nodes))
                .with_tolerances(tolerances.tolerances()?)
                .with_solver(solver.solver_config()?);
            if let Some(dir) = keep {
                config = config.with_keep_dir(dir);
            }

            let seed = seed.unwrap_or_else(rand::random);
            println!("Seed: {}", seed);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let summary = Runner::new(config).run(&mut rng, |index, outcome| {
                println!("Test {}: {}", index, outcome);
            })?;

            println!("{}", summary);
            Ok(if summary.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
