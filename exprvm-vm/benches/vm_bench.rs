use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exprvm_bytecode::{InstructionSet, OpcodeRegistry};
use exprvm_core::{CompileBindings, RuntimeBindings, TypeRef};
use exprvm_parser::compile;
use exprvm_stdlib::init_stdlib;
use exprvm_vm::VM;
use std::sync::Arc;

const SOURCES: &[(&str, &str)] = &[
    ("literal", "42"),
    ("simple_call", "name.length()"),
    ("chained", "name.trim().toUpperCase().substring(1, 3).length()"),
    ("variadic", r#""%s is %d chars long".formatted(name, name.length())"#),
];

fn execute_benchmarks(c: &mut Criterion) {
    let registry = Arc::new(init_stdlib());
    let vm = VM::new(registry.clone());
    let declared = CompileBindings::builder()
        .with_variable("name", TypeRef::string())
        .build();
    let runtime = RuntimeBindings::builder()
        .with_variable("name", "  benchmark  ")
        .build();

    let mut group = c.benchmark_group("execute");
    for (label, source) in SOURCES {
        let Ok(program) = compile(source, &declared, registry.as_ref()) else {
            continue;
        };
        group.bench_function(*label, |b| {
            b.iter(|| {
                let _ = black_box(vm.execute(black_box(&program), &runtime));
            });
        });
    }
    group.finish();
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let registry = Arc::new(init_stdlib());
    let vm = VM::new(registry.clone());
    let opcodes = OpcodeRegistry::standard();
    let declared = CompileBindings::builder()
        .with_variable("name", TypeRef::string())
        .build();
    let runtime = RuntimeBindings::builder()
        .with_variable("name", "pipeline")
        .build();
    let source = "name.concat(name.concat(name)).length()";

    let mut group = c.benchmark_group("pipeline");
    group.bench_function("compile_and_execute", |b| {
        b.iter(|| {
            if let Ok(program) = compile(black_box(source), &declared, registry.as_ref()) {
                let _ = black_box(vm.execute(&program, &runtime));
            }
        });
    });

    let bytes = compile(source, &declared, registry.as_ref())
        .expect("benchmark source compiles")
        .to_bytes()
        .expect("benchmark program encodes");
    group.bench_function("decode_and_execute", |b| {
        b.iter(|| {
            if let Ok(program) = InstructionSet::from_bytes(black_box(&bytes), &opcodes) {
                let _ = black_box(vm.execute(&program, &runtime));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, execute_benchmarks, pipeline_benchmarks);
criterion_main!(benches);
