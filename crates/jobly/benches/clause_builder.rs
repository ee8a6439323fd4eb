use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{Company, FieldMap, Payload, build_company_filter, build_job_filter, build_set_clause};

/// A payload with `n` fields: f0 = 0, f1 = 1, ...
fn wide_payload(n: usize) -> Payload {
    (0..n).map(|i| (format!("f{i}"), i as i64)).collect()
}

fn bench_set_clause(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause/set");

    for n in [1, 5, 10, 50, 100] {
        let payload = wide_payload(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &payload, |b, payload| {
            b.iter(|| black_box(build_set_clause(payload, &FieldMap::identity())));
        });
    }

    group.finish();
}

fn bench_set_clause_mapped(c: &mut Criterion) {
    let payload = Payload::new()
        .with("name", "Acme")
        .with("description", "Widgets")
        .with("numEmployees", 250)
        .with("logoUrl", "http://acme.img");

    c.bench_function("clause/set_mapped", |b| {
        b.iter(|| black_box(build_set_clause(&payload, &Company::FIELDS)));
    });
}

fn bench_filters(c: &mut Criterion) {
    let companies = Payload::new()
        .with("name", "Net")
        .with("minEmployees", 10)
        .with("maxEmployees", "1000");
    let jobs = Payload::new()
        .with("title", "Engineer")
        .with("minSalary", 50000)
        .with("hasEquity", true);

    let mut group = c.benchmark_group("clause/filter");
    group.bench_function("companies", |b| {
        b.iter(|| black_box(build_company_filter(&companies)));
    });
    group.bench_function("jobs", |b| {
        b.iter(|| black_box(build_job_filter(&jobs)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_set_clause,
    bench_set_clause_mapped,
    bench_filters
);
criterion_main!(benches);
