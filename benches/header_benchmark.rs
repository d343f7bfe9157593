use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use headerlens::analysis::{AuditEngine, DocumentAnalyser, HeaderCheck};
use headerlens::config::Config;
use headerlens::report::RunReport;
use headerlens::scanner::TextDocument;

const APACHE_HEADER: &str = "/*\n * Licensed to the Apache Software Foundation (ASF) under one\n * or more contributor license agreements.  See the NOTICE file\n */\n";

// Documents of various shapes: a header that matches early, one that never matches
fn create_documents(count: usize) -> Vec<TextDocument> {
    (0..count)
        .map(|i| {
            let body: String = (0..80).map(|line| format!("let value{line} = {i};\n")).collect();
            let content = match i % 3 {
                0 => format!("{}{}", APACHE_HEADER, body),
                1 => format!("// SPDX-License-Identifier: MIT\n{}", body),
                _ => body,
            };
            TextDocument::new(format!("src/file{}.rs", i), content)
        })
        .collect()
}

fn benchmark_single_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_check");
    let licenses = Config::default().build_license_set().unwrap();
    let mut analyser = DocumentAnalyser::new(licenses, HeaderCheck::default());

    let documents = create_documents(3);
    for (name, document) in ["apache", "spdx", "unknown"].iter().zip(&documents) {
        group.bench_with_input(BenchmarkId::new("analyse", name), document, |b, document| {
            b.iter(|| analyser.analyse(black_box(document)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(20);
    let licenses = Config::default().build_license_set().unwrap();
    let documents = create_documents(300);

    for jobs in [1usize, 4] {
        let engine = AuditEngine::new(licenses.clone(), HeaderCheck::default()).with_jobs(jobs);
        group.bench_with_input(BenchmarkId::new("run", jobs), &documents, |b, documents| {
            b.iter(|| {
                let mut report = RunReport::new("bench", 50);
                engine.run(black_box(documents), &mut report).unwrap();
                report
            });
        });
    }

    group.finish();
}

fn benchmark_build_license_set(c: &mut Criterion) {
    c.bench_function("build_default_license_set", |b| {
        b.iter(|| Config::default().build_license_set().unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_single_document,
    benchmark_engine,
    benchmark_build_license_set
);
criterion_main!(benches);
