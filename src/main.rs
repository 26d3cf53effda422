use clap::Parser;
use knotwork::data;
use knotwork::dense::DenseMatrix;
use knotwork::output;
use knotwork::solver::{IterativeMethod, IterativeParams, IterativeSolver, LinearSolver};
use knotwork::spline::{linspace, CubicSplineBuilder, SplineBoundary, SplineOrder};
use knotwork::stats::Stats;
use std::cell::Cell;
use std::io;
use std::path::PathBuf;

/// Fit a spline through tabulated samples and print it on an even grid
#[derive(Parser)]
#[command(name = "knotwork", version)]
struct Cli {
    /// Data file: `#` comments, comma/tab/space separated columns
    data: PathBuf,

    /// Spline order (1 = linear, 2 = quadratic, 3 = cubic)
    #[arg(long, default_value_t = 3)]
    order: u8,

    /// End condition: natural or not-a-knot
    #[arg(long, default_value = "natural")]
    boundary: String,

    /// Number of evenly spaced output points
    #[arg(long, default_value_t = 100)]
    points: usize,

    /// Solve the spline system iteratively instead of by elimination
    #[arg(long)]
    iterative: bool,

    /// Iterative method: seidel or jacobi
    #[arg(long, default_value = "seidel")]
    method: String,

    /// Relative-change tolerance for the iterative solver
    #[arg(long, default_value_t = 1e-8)]
    tol: f64,

    /// Column holding x values (0-based)
    #[arg(long, default_value_t = 0)]
    x_column: usize,

    /// Column holding y values (0-based)
    #[arg(long, default_value_t = 1)]
    y_column: usize,

    /// Print performance stats to stderr
    #[arg(long)]
    stats: bool,
}

/// Iterative solver that remembers how many sweeps its last solve took.
struct SweepCounter {
    inner: IterativeSolver,
    sweeps: Cell<Option<usize>>,
}

impl LinearSolver for SweepCounter {
    fn solve(&self, a: &DenseMatrix, b: &[f64]) -> knotwork::Result<Vec<f64>> {
        let report = self.inner.solve_with_report(a, b, None)?;
        self.sweeps.set(Some(report.iterations));
        Ok(report.x)
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stats = if cli.stats { Some(Stats::new()) } else { None };

    let order = SplineOrder::try_from(cli.order).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let boundary: SplineBoundary = cli.boundary.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let method: IterativeMethod = cli.method.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let load = || data::load_table(&cli.data).and_then(|t| t.xy(cli.x_column, cli.y_column));
    let loaded = match stats.as_mut() {
        Some(s) => s.time("load", load),
        None => load(),
    };
    let (xd, yd) = loaded.unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", cli.data.display(), e);
        std::process::exit(1);
    });

    let counter = SweepCounter {
        inner: IterativeSolver::new(IterativeParams {
            method,
            tol: cli.tol,
            ..IterativeParams::default()
        }),
        sweeps: Cell::new(None),
    };
    let mut builder = CubicSplineBuilder::new(order).boundary(boundary);
    if cli.iterative {
        builder = builder.solver(&counter);
    }

    let build = || builder.build(&xd, &yd);
    let built = match stats.as_mut() {
        Some(s) => s.time("build", build),
        None => build(),
    };
    let spline = built.unwrap_or_else(|e| {
        eprintln!("Spline error: {}", e);
        std::process::exit(1);
    });

    let (min, max) = spline.domain();
    let xs = linspace(min, max, cli.points);
    let evaluate = || spline.evaluate_par(&xs);
    let evaluated = match stats.as_mut() {
        Some(s) => s.time("evaluate", evaluate),
        None => evaluate(),
    };
    let ys = evaluated.unwrap_or_else(|e| {
        eprintln!("Evaluation error: {}", e);
        std::process::exit(1);
    });

    let mut stdout = io::stdout();
    output::write_samples_csv(&xs, &ys, &mut stdout).unwrap_or_else(|e| {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    });

    if let Some(ref mut stats) = stats {
        stats.samples = xd.len();
        stats.queries = xs.len();
        stats.solver_iterations = counter.sweeps.get();
        stats.display();
    }
}
