use serde_derive::Deserialize;

use knotwork::data;
use knotwork::solver::{IterativeMethod, IterativeSolver};
use knotwork::spline::{CubicSplineBuilder, SplineBoundary, SplineOrder};

// ── Manifest types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub defaults: Defaults,
    #[serde(rename = "dataset")]
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Defaults {
    pub knot_abs_tol: f64,
    pub value_abs_tol: f64,
}

#[derive(Debug, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    pub file: String,
    pub order: u8,
    pub boundary: String,
    pub rows: usize,
    pub domain: [f64; 2],
    pub x_column: Option<usize>,
    pub y_column: Option<usize>,
    /// Iterative method token; the direct solver is used when absent.
    pub iterative: Option<String>,
    pub queries: Option<Vec<f64>>,
    pub expected: Option<Vec<f64>>,
    pub knot_abs_tol: Option<f64>,
    pub value_abs_tol: Option<f64>,
}

// ── Manifest loading ────────────────────────────────────────────

pub fn load_manifest() -> Manifest {
    let content = std::fs::read_to_string("tests/fixtures/manifest.toml")
        .expect("failed to read tests/fixtures/manifest.toml");
    toml::from_str(&content).expect("failed to parse manifest.toml")
}

// ── Macro for test generation ───────────────────────────────────

macro_rules! fixture_tests {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                $crate::fixtures::run_fixture_test(stringify!($name));
            }
        )*
    };
}

pub(crate) use fixture_tests;

// ── Test runner ─────────────────────────────────────────────────

pub fn run_fixture_test(name: &str) {
    let manifest = load_manifest();
    let entry = manifest
        .datasets
        .iter()
        .find(|d| d.name == name)
        .unwrap_or_else(|| panic!("dataset '{name}' not found in manifest"));

    let knot_tol = entry.knot_abs_tol.unwrap_or(manifest.defaults.knot_abs_tol);
    let value_tol = entry.value_abs_tol.unwrap_or(manifest.defaults.value_abs_tol);

    let path = format!("tests/fixtures/data/{}", entry.file);
    let table = data::load_table(&path).unwrap_or_else(|e| panic!("{name}: load failed: {e}"));
    assert_eq!(table.rows.len(), entry.rows, "{name}: row count");

    let (xd, yd) = table
        .xy(entry.x_column.unwrap_or(0), entry.y_column.unwrap_or(1))
        .unwrap_or_else(|e| panic!("{name}: column selection failed: {e}"));

    let order = SplineOrder::try_from(entry.order).expect("bad order in manifest");
    let boundary: SplineBoundary = entry.boundary.parse().expect("bad boundary in manifest");
    let iterative = entry.iterative.as_ref().map(|token| {
        let method: IterativeMethod = token.parse().expect("bad method in manifest");
        IterativeSolver::with_method(method)
    });

    let mut builder = CubicSplineBuilder::new(order).boundary(boundary);
    if let Some(solver) = iterative.as_ref() {
        builder = builder.solver(solver);
    }
    let spline = builder
        .build(&xd, &yd)
        .unwrap_or_else(|e| panic!("{name}: build failed: {e}"));

    assert_eq!(spline.domain(), (entry.domain[0], entry.domain[1]), "{name}: domain");

    let at_knots = spline.evaluate(&xd).expect("knots are inside the domain");
    for (i, (got, want)) in at_knots.iter().zip(&yd).enumerate() {
        assert!(
            (got - want).abs() <= knot_tol,
            "{name}: knot {i} gives {got}, expected {want}"
        );
    }

    if let (Some(queries), Some(expected)) = (&entry.queries, &entry.expected) {
        assert_eq!(queries.len(), expected.len(), "{name}: queries/expected length");
        let values = spline
            .evaluate(queries)
            .unwrap_or_else(|e| panic!("{name}: evaluate failed: {e}"));
        for ((x, got), want) in queries.iter().zip(&values).zip(expected) {
            assert!(
                (got - want).abs() <= value_tol,
                "{name}: f({x}) = {got}, expected {want}"
            );
        }
    }
}
