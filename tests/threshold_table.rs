//! Process-wide threshold table
//!
//! Lives in its own test binary: the global table is shared by every test
//! in a process, so all mutation happens inside a single test function.

use rayo::{DispatchConfig, Matrix, Primitive, ThresholdTable, Tridiagonal};

fn assert_all(table: &ThresholdTable, check: impl Fn(Primitive, usize) -> bool) {
    for primitive in Primitive::ALL {
        let threshold = table.get(primitive);
        assert!(check(primitive, threshold), "{}: {}", primitive.name(), threshold);
    }
}

#[test]
fn integration_global_threshold_lifecycle() {
    let table = ThresholdTable::global();
    table.reset();
    assert_all(table, |p, t| t == p.default_threshold());

    table.clamp_max(16);
    assert_all(table, |p, t| t == p.default_threshold().min(16));

    table.clamp_min(32);
    assert_all(table, |_, t| t >= 32);

    table.clamp_max(8);
    table.clamp_min(4);
    assert_all(table, |_, t| (4..=8).contains(&t));

    table.set(Primitive::Multiply, 3);
    assert_eq!(table.get(Primitive::Multiply), 3);
    assert_eq!(DispatchConfig::global().threshold(Primitive::Multiply), 3);

    // tiny thresholds force every parallel path; results must not change
    table.set_all(1);
    let a = Matrix::from_rows(&[
        [4.0, 1.0, 2.0, 0.5],
        [1.0, 3.0, 0.5, 1.5],
        [2.0, 0.5, 5.0, 1.0],
        [0.5, 1.5, 1.0, 2.0],
    ])
    .unwrap();
    let t = Tridiagonal::decompose(&a, true).unwrap();
    assert!(t.reconstruct().unwrap().max_abs_difference(&a).unwrap() < 1e-12);

    table.reset();
    assert_eq!(table.snapshot(), DispatchConfig::new());
}

#[test]
fn integration_local_table_is_isolated() {
    let local = ThresholdTable::with_defaults();
    local.set_all(2);
    assert_all(&local, |_, t| t == 2);
    assert_eq!(local.snapshot().threshold(Primitive::Fill), 2);
}
