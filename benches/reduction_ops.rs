use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use rayo::{Bidiagonal, HouseholderQr, Matrix, Tridiagonal};

fn general(rows: usize, cols: usize) -> Matrix<f64> {
    let data = (0..rows * cols).map(|i| ((i * 31) % 101) as f64 / 101.0 - 0.5).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn symmetric(n: usize) -> Matrix<f64> {
    let mut a = Matrix::zeros(n, n);
    for j in 0..n {
        for i in j..n {
            let value = ((i * 7 + j * 13) % 53) as f64 / 53.0;
            a.set(i, j, value).unwrap();
            a.set(j, i, value).unwrap();
        }
    }
    a
}

fn bench_bidiagonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("bidiagonal");

    let shapes = vec![(32, 32), (128, 128), (256, 64), (64, 256)];

    for (rows, cols) in shapes {
        let id = format!("{}x{}", rows, cols);
        let a = general(rows, cols);

        group.bench_with_input(BenchmarkId::new("values", &id), &a, |bench, a| {
            bench.iter(|| black_box(Bidiagonal::decompose(black_box(a), false).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("accumulated", &id), &a, |bench, a| {
            bench.iter(|| black_box(Bidiagonal::decompose(black_box(a), true).unwrap()));
        });
    }

    group.finish();
}

fn bench_tridiagonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("tridiagonal");

    for n in [32, 128, 256] {
        let a = symmetric(n);

        // Householder driver vs the classic tred2 sweep
        group.bench_with_input(BenchmarkId::new("householder", n), &a, |bench, a| {
            bench.iter(|| black_box(Tridiagonal::decompose(black_box(a), true).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("tred2", n), &a, |bench, a| {
            bench.iter(|| black_box(Tridiagonal::tred2(black_box(a), true).unwrap()));
        });
    }

    group.finish();
}

fn bench_hermitian_tridiagonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("tridiagonal_complex");

    for n in [32, 128] {
        let real = symmetric(n);
        let mut a = Matrix::<Complex64>::zeros(n, n);
        for j in 0..n {
            for i in 0..n {
                let im = if i > j { 0.25 } else if i < j { -0.25 } else { 0.0 };
                a.set(i, j, Complex64::new(real.as_slice()[i + j * n], im)).unwrap();
            }
        }

        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |bench, a| {
            bench.iter(|| black_box(Tridiagonal::decompose(black_box(a), false).unwrap()));
        });
    }

    group.finish();
}

fn bench_qr(c: &mut Criterion) {
    let mut group = c.benchmark_group("qr");

    for (rows, cols) in [(64, 64), (256, 64), (256, 256)] {
        let id = format!("{}x{}", rows, cols);
        let a = general(rows, cols);

        group.bench_with_input(BenchmarkId::from_parameter(&id), &a, |bench, a| {
            bench.iter(|| black_box(HouseholderQr::decompose(black_box(a), true).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bidiagonal,
    bench_tridiagonal,
    bench_hermitian_tridiagonal,
    bench_qr
);
criterion_main!(benches);
