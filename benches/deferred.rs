extern crate dotreflect;

use criterion::{criterion_group, criterion_main, Criterion};
use dotreflect::prelude::*;
use std::{hint::black_box, sync::Arc};

fn bench_module(types: usize) -> ModuleRc {
    let module = Arc::new(Module::new("Bench"));
    for i in 0..types {
        let mut class = ClassBuilder::new(&format!("Bench.Type{i}"));
        for m in 0..16 {
            class = class.method(format!("Method{m}"), |method| {
                method
                    .public()
                    .param("s", TypeSignature::String)
                    .returns(TypeSignature::String)
                    .body(|_, args| Ok(args[0].clone()))
            });
        }
        class.build(&module).unwrap();
    }
    module
}

/// Benchmark a cached method cell against looking the method up on every call
fn bench_lookup(c: &mut Criterion) {
    let module = bench_module(256);
    let module_cell = Arc::new(Deferred::ready(module.clone()));
    let ty = resolve_type(Some(&module_cell), "Bench.Type128").unwrap();
    let method = resolve_method(Some(&ty), "Method15").unwrap();
    method.value().unwrap();

    let mut group = c.benchmark_group("lookup");
    group.bench_function("deferred_cached", |b| {
        b.iter(|| black_box(method.get().unwrap()));
    });
    group.bench_function("uncached", |b| {
        b.iter(|| {
            let ty = module.get_type(black_box("Bench.Type128")).unwrap();
            black_box(get_method(Some(&ty), "Method15").unwrap())
        });
    });
    group.finish();
}

/// Benchmark invocation through a cell, including result coercion
fn bench_invoke(c: &mut Criterion) {
    let module = bench_module(1);
    let module_cell = Arc::new(Deferred::ready(module));
    let ty = resolve_type(Some(&module_cell), "Bench.Type0").unwrap();
    let method = resolve_method(Some(&ty), "Method0").unwrap();
    let instance: ObjectRef = create_instance(Some(&ty), &[]).unwrap();
    let args = [Value::from("payload")];

    c.bench_function("invoke_deferred", |b| {
        b.iter(|| {
            let result: String = invoke(Some(&method), Some(&instance), black_box(&args)).unwrap();
            black_box(result)
        });
    });
}

criterion_group!(benches, bench_lookup, bench_invoke);
criterion_main!(benches);
