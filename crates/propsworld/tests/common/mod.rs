//! Shared fixtures for the integration tests.

use std::time::Duration;

use propsworld::test_support::seed_sample_data;
use propsworld::{Config, ExpectedRow, ExpectedRows, World};
use rstest::fixture;

/// A world whose store holds the sample fixtures.
#[fixture]
pub fn world() -> World {
    let config = Config::default()
        .with_default_timeout(Duration::from_secs(5))
        .with_worker_threads(2);
    let world = World::with_config(config).unwrap_or_else(|err| panic!("world should start: {err}"));
    seed_sample_data(&world);
    world
}

/// Build rows from a header line followed by data lines.
pub fn table(grid: &[&[&str]]) -> Vec<ExpectedRow> {
    let cells: Vec<Vec<String>> = grid
        .iter()
        .map(|line| line.iter().map(|cell| (*cell).to_owned()).collect())
        .collect();
    ExpectedRows::try_from(cells)
        .unwrap_or_else(|err| panic!("table should be well formed: {err}"))
        .into_inner()
}
