use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lineage::{build, Class, ClassDefinition, ClassRef, Value};

fn chain(depth: usize, mixin: &ClassRef) -> ClassRef {
    let mut current = build(None, ClassDefinition::new().mixin(mixin)).unwrap();
    for _ in 1..depth {
        current = current.extend(ClassDefinition::new()).unwrap();
    }
    current
}

fn bench_has_mixin(c: &mut Criterion) {
    let mut group = c.benchmark_group("has_mixin");

    for depth in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("cold", depth), &depth, |b, &depth| {
            b.iter_batched(
                || {
                    let mixin = build(None, ClassDefinition::new()).unwrap();
                    let leaf = chain(depth, &mixin);
                    (leaf, mixin)
                },
                |(leaf, mixin)| black_box(leaf.has_mixin(&mixin)),
                criterion::BatchSize::SmallInput,
            );
        });

        let mixin = build(None, ClassDefinition::new()).unwrap();
        let leaf = chain(depth, &mixin);
        leaf.has_mixin(&mixin);
        group.bench_with_input(BenchmarkId::new("cached", depth), &depth, |b, _| {
            b.iter(|| black_box(leaf.has_mixin(&mixin)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let m1 = build(None, ClassDefinition::new().member("a", Value::from(1))).unwrap();
    let m2 = build(None, ClassDefinition::new().member("b", Value::from(2))).unwrap();
    let base = Class::root()
        .extend(
            ClassDefinition::new()
                .inherited_static("kind", Value::from("base"))
                .member("c", Value::from(3)),
        )
        .unwrap();

    c.bench_function("extend_with_mixins", |b| {
        b.iter(|| {
            base.extend(
                ClassDefinition::new()
                    .member("d", Value::from(4))
                    .static_member("e", Value::from(5))
                    .mixins([&m1, &m2]),
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, bench_has_mixin, bench_build);
criterion_main!(benches);
