//! Library level tests of the matcher, license and analysis pipeline

use headerlens::analysis::{AuditEngine, DocumentAnalyser, HeaderCheck, HeaderOutcome};
use headerlens::config::Config;
use headerlens::error::HeaderLensError;
use headerlens::license::{License, LicenseFamily, LicenseSet};
use headerlens::matchers::{
    BuilderRegistry, ContainerBuilder, CopyrightBuilder, HeaderMatcher, MatchState, MatcherArena,
    MatcherDefinition, TextBuilder,
};
use headerlens::report::{ClaimSink, DocumentType, RunReport};
use headerlens::scanner::{Scanner, TextDocument};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[test]
fn scenario_a_copyright_range_with_owner() {
    let mut arena = MatcherArena::new();
    let root = CopyrightBuilder::new()
        .start("2020")
        .owner("ExampleOrg")
        .build(&mut arena)
        .unwrap();

    let mut matcher = arena.rooted(root);
    assert_eq!(
        matcher.matches("Copyright 2020-2024 ExampleOrg").unwrap(),
        MatchState::Matched
    );
}

#[test]
fn scenario_b_any_records_matching_branch() {
    let mut arena = MatcherArena::new();
    let root = ContainerBuilder::any()
        .child(TextBuilder::new().id("apache").text("Apache License"))
        .child(TextBuilder::new().id("mit").text("MIT License"))
        .build(&mut arena)
        .unwrap();

    let state = arena.rooted(root).matches("This is under the MIT License.").unwrap();
    assert_eq!(state, MatchState::Matched);

    let branch = arena.matched_branch(root).unwrap();
    assert_eq!(arena.id_of(branch), "mit");
}

#[test]
fn scenario_c_sample_keeps_first_fifty_lines() {
    let mut arena = MatcherArena::new();
    let root = TextBuilder::new().text("Apache License").build(&mut arena).unwrap();
    let input: String = (1..=60).map(|i| format!("line {}\n", i)).collect();

    let report = HeaderCheck::new(50)
        .run("big.txt", Cursor::new(input), &mut arena.rooted(root))
        .unwrap();

    let expected: Vec<String> = (1..=50).map(|i| format!("line {}", i)).collect();
    assert_eq!(
        report.outcome,
        HeaderOutcome::Unknown {
            sample: expected.join("\n")
        }
    );
    assert_eq!(report.lines_read, 60);
}

#[test]
fn scenario_d_unresolved_reference_is_fatal() {
    let mut arena = MatcherArena::new();
    let definition = MatcherDefinition::new("matcherRef").with_param("refId", "nonexistent");
    let root = BuilderRegistry::default().build(&definition, &mut arena).unwrap();

    let err = arena.rooted(root).matches("any line").unwrap_err();
    assert!(err.to_string().contains("nonexistent"));

    let config_err = arena.resolve_references().unwrap_err();
    assert!(config_err.to_string().contains("nonexistent"));
}

#[test]
fn scenario_e_approve_and_remove_family() {
    let mut arena = MatcherArena::new();
    let root = TextBuilder::new().text("MIT License").build(&mut arena).unwrap();
    let mut set = LicenseSet::new(arena);
    set.add_family(LicenseFamily::new("MIT", "The MIT License"));
    let family = set.family("MIT").cloned().unwrap();
    set.add_license(License::new("MIT", "MIT", family, root)).unwrap();

    set.approve_family("MIT");
    assert!(set.is_approved_id("MIT"));

    set.remove_family("MIT");
    assert!(!set.is_approved_id("MIT"));
}

#[test]
fn reset_then_same_input_gives_same_outcome() {
    let licenses = Config::default().build_license_set().unwrap();
    let mut analyser = DocumentAnalyser::new(licenses, HeaderCheck::default());
    let documents = [
        TextDocument::new("a.rs", "/* Licensed under the Apache License, Version 2.0 */\n"),
        TextDocument::new("b.rs", "fn b() {}\n"),
    ];

    let first: Vec<_> = documents.iter().map(|d| analyser.analyse(d).unwrap()).collect();
    let second: Vec<_> = documents.iter().map(|d| analyser.analyse(d).unwrap()).collect();
    assert_eq!(first, second);
    assert_eq!(first[0].license_id(), "AL2.0");
    assert!(first[1].is_unknown());
}

#[test]
fn builtin_catalogue_recognises_common_headers() {
    let licenses = Config::default().build_license_set().unwrap();
    let mut analyser = DocumentAnalyser::new(licenses, HeaderCheck::default());

    let cases = [
        ("apache.java", "/*\n * Licensed under the Apache License, Version 2.0\n */", "AL2.0", true),
        (
            "asf.java",
            "/*\n * Licensed to the Apache Software Foundation (ASF) under one\n * or more contributor license agreements.\n */",
            "ASL",
            true,
        ),
        ("url.py", "# See http://www.apache.org/licenses/LICENSE-2.0", "AL2.0", true),
        ("mit.rs", "// SPDX-License-Identifier: MIT", "MIT", true),
        ("dual.rs", "// SPDX-License-Identifier: MIT OR Apache-2.0", "AL2.0", true),
        ("gpl.c", "/* SPDX-License-Identifier: GPL-2.0-or-later */", "GPL2", false),
        (
            "bsd.c",
            "Redistribution and use in source and binary forms, with or without\nmodification...\n3. Neither the name of the copyright holder",
            "BSD-3",
            true,
        ),
    ];

    for (name, content, id, approved) in cases {
        let claim = analyser.analyse(&TextDocument::new(name, content)).unwrap();
        assert_eq!(claim.license_id(), id, "{}", name);
        assert_eq!(claim.is_approved(), approved, "{}", name);
    }
}

#[test]
fn generated_and_bypassed_documents() {
    let licenses = Config::default().build_license_set().unwrap();
    let mut analyser = DocumentAnalyser::new(licenses, HeaderCheck::default());

    let generated = analyser
        .analyse(&TextDocument::new("parser.rs", "// This file is @generated by lalrpop\n"))
        .unwrap();
    assert_eq!(generated.document_type(), DocumentType::Generated);
    assert!(generated.is_approved());

    let notice = analyser.analyse(&TextDocument::new("NOTICE", "anything")).unwrap();
    assert_eq!(notice.document_type(), DocumentType::Notice);

    let archive = analyser.analyse(&TextDocument::new("lib/dep.jar", "PK")).unwrap();
    assert_eq!(archive.document_type(), DocumentType::Archive);

    let binary = analyser.analyse(&TextDocument::new("blob", vec![0u8; 128])).unwrap();
    assert_eq!(binary.document_type(), DocumentType::Binary);
}

#[test]
fn engine_walks_tree_in_parallel() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    for i in 0..30 {
        let content = if i % 3 == 0 {
            "fn undocumented() {}\n".to_string()
        } else {
            format!("// SPDX-License-Identifier: MIT\nfn f{}() {{}}\n", i)
        };
        fs::write(root.join(format!("src/nested/f{:02}.rs", i)), content).unwrap();
    }

    let licenses = Config::default().build_license_set().unwrap();
    let documents = Scanner::new(root).documents().unwrap();
    assert_eq!(documents.len(), 30);

    let engine = AuditEngine::new(licenses, HeaderCheck::default()).with_jobs(4);
    let mut report = RunReport::new(root.display().to_string(), 50);
    engine.run(&documents, &mut report).unwrap();

    assert_eq!(report.statistic.documents, 30);
    assert_eq!(report.statistic.unknown, 10);
    assert_eq!(report.statistic.approved, 20);
    assert_eq!(report.claims[0].document(), "src/nested/f00.rs");
    assert!(report.claims[0].is_unknown());
}

/// Collects document names only
struct Names(Vec<String>);

impl ClaimSink for Names {
    fn report(&mut self, claim: headerlens::report::Claim) {
        self.0.push(claim.document().to_string());
    }

    fn failure(&mut self, document: &str, error: &HeaderLensError) {
        assert!(error.is_document_failure());
        self.0.push(format!("failed:{}", document));
    }
}

#[test]
fn custom_sink_receives_one_event_per_document() {
    let licenses = Config::default().build_license_set().unwrap();
    let engine = AuditEngine::new(licenses, HeaderCheck::default());
    let documents = [
        TextDocument::new("one.rs", "// SPDX-License-Identifier: MIT\n"),
        TextDocument::new("two.rs", "fn two() {}\n"),
    ];

    let mut sink = Names(Vec::new());
    engine.run(&documents, &mut sink).unwrap();
    assert_eq!(sink.0, vec!["one.rs", "two.rs"]);
}
