use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgclause::{QueryBuilder, SortOrder, builder};

/// `n` AND-joined equality predicates, an ORDER BY and a LIMIT:
/// SELECT * FROM t WHERE col0 = $1 AND col1 = $2 ... ORDER BY id DESC LIMIT $n+1
fn build_filtered(n: usize) -> QueryBuilder {
    let mut qb = builder("SELECT * FROM t");
    for i in 0..n {
        qb.and_where(&format!("col{i} = ?"), (i as i64,));
    }
    qb.order_by("id", SortOrder::Desc, ()).limit(50);
    qb
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_filtered(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_compose_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/compose_and_build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let qb = build_filtered(n);
                black_box(qb.build());
            });
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/where_in");

    for n in [5, 20, 100, 500] {
        let ids: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &ids, |b, ids| {
            b.iter(|| {
                let mut qb = builder("SELECT * FROM t");
                qb.where_in("id", ids.iter().copied());
                black_box(qb.build());
            });
        });
    }

    group.finish();
}

fn bench_grouped_conditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/grouped_conditions");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut qb = builder("SELECT * FROM t");
                qb.where_("tenant_id = ?", (1_i64,)).and().open_wrap();
                for i in 0..n {
                    if i > 0 {
                        qb.or();
                    }
                    qb.condition(&format!("col{i} = ?"), (i as i64,));
                }
                qb.close_wrap();
                black_box(qb.build());
            });
        });
    }

    group.finish();
}

fn bench_check_placeholders(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/check_placeholders");

    for n in [10, 100] {
        let qb = build_filtered(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.check_placeholders().is_ok()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_compose_and_build,
    bench_where_in,
    bench_grouped_conditions,
    bench_check_placeholders
);
criterion_main!(benches);
