//! Verifier integration tests through the public API.

use muzzle::config::parse_config;
use muzzle::symbols::{Artifact, Catalog, SymbolEntry, SymbolRef, SymbolSurface};
use muzzle::templates;
use muzzle::verifier::{
    CandidateVersions, DependencySet, Outcome, SkipReason, Verifier, Violation,
};
use muzzle::version::{Coordinate, ModuleKey, Version};
use muzzle::MuzzleError;
use std::path::Path;

const CORE: &str = "com.amazonaws:aws-lambda-java-core";
const EVENTS: &str = "com.amazonaws:aws-lambda-java-events";
const CONTAINER: &str = "com.amazonaws.serverless:aws-serverless-java-container-core";
const JACKSON: &str = "com.fasterxml.jackson.core:jackson-databind";

fn key(s: &str) -> ModuleKey {
    ModuleKey::parse(s).unwrap()
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn sym(s: &str) -> SymbolRef {
    SymbolRef::parse(s).unwrap()
}

fn lambda_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        Artifact::new(key(CORE))
            .with_release(v("1.0.0"))
            .with_release(v("1.2.1"))
            .with_symbol(SymbolEntry::always(sym("com.amazonaws.services.lambda.runtime.Context"))),
    );
    catalog.insert(
        Artifact::new(key(EVENTS))
            .with_release(v("3.2.0"))
            .with_release(v("3.11.0"))
            .with_symbol(SymbolEntry::always(sym(
                "com.amazonaws.services.lambda.runtime.events.SQSEvent",
            ))),
    );
    catalog.insert(
        Artifact::new(key(CONTAINER))
            .with_release(v("1.5.2"))
            .with_release(v("1.6.0"))
            .with_dependency(Coordinate::parse("com.fasterxml.jackson.core:jackson-databind:2.12.3").unwrap())
            .with_symbol(SymbolEntry::always(sym("com.amazonaws.serverless.proxy.model.AwsProxyRequest")))
            .with_symbol(
                SymbolEntry::always(sym("com.amazonaws.serverless.proxy.model.HttpApiV2ProxyRequest"))
                    .since(v("1.6.0")),
            ),
    );
    catalog.insert(
        Artifact::new(key(JACKSON))
            .with_release(v("2.12.3"))
            .with_symbol(SymbolEntry::always(sym("com.fasterxml.jackson.databind.ObjectMapper"))),
    );
    catalog
}

#[test]
fn open_range_passes_at_resolved_version() {
    let surface = SymbolSurface::new(vec![sym("com.amazonaws.services.lambda.runtime.Context")]);
    let mut verifier = Verifier::new(surface, lambda_catalog());
    verifier
        .register_rule("com.amazonaws", "aws-lambda-java-core", "[1.0.0,)", &[])
        .unwrap();

    let deps = DependencySet::from_strings([(CORE, "1.2.1")]).unwrap();
    let results = verifier.verify(&deps);

    assert_eq!(results.len(), 1);
    assert!(results[0].is_pass());
    assert_eq!(results[0].version, Some(v("1.2.1")));
}

#[test]
fn version_below_range_is_skipped() {
    let surface = SymbolSurface::new(vec![sym("com.amazonaws.services.lambda.runtime.events.SQSEvent")]);
    let mut verifier = Verifier::new(surface, lambda_catalog());
    verifier
        .register_rule("com.amazonaws", "aws-lambda-java-events", "[3.3.1,)", &[])
        .unwrap();

    let deps = DependencySet::from_strings([(EVENTS, "3.2.0")]).unwrap();
    let results = verifier.verify(&deps);

    assert!(results[0].is_skipped());
    assert!(matches!(
        results[0].outcome,
        Outcome::Skipped(SkipReason::OutOfRange { .. })
    ));
}

#[test]
fn extra_dependency_missing_class_fails() {
    let surface = SymbolSurface::new(vec![
        sym("com.amazonaws.services.lambda.runtime.events.SQSEvent"),
        sym("com.amazonaws.serverless.proxy.model.HttpApiV2ProxyRequest"),
    ]);
    let mut verifier = Verifier::new(surface, lambda_catalog());
    verifier
        .register_rule(
            "com.amazonaws",
            "aws-lambda-java-events",
            "[3.3.1,)",
            &["com.amazonaws.serverless:aws-serverless-java-container-core:1.5.2"],
        )
        .unwrap();

    let deps = DependencySet::from_strings([(EVENTS, "3.11.0")]).unwrap();
    let results = verifier.verify(&deps);

    assert!(results[0].is_failure());
    match &results[0].violations()[0] {
        Violation::MissingSymbol { symbol, excluded_by } => {
            assert_eq!(symbol.owner(), "com.amazonaws.serverless.proxy.model.HttpApiV2ProxyRequest");
            assert!(excluded_by.is_none());
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

#[test]
fn matrix_failure_carries_report() {
    let surface = SymbolSurface::new(vec![sym(
        "com.amazonaws.serverless.proxy.model.HttpApiV2ProxyRequest",
    )]);
    let mut verifier = Verifier::new(surface, lambda_catalog());
    verifier
        .register_rule(
            "com.amazonaws.serverless",
            "aws-serverless-java-container-core",
            "[1.5.2,)",
            &[],
        )
        .unwrap();

    match verifier.verify_across_matrix(&CandidateVersions::new()) {
        Err(MuzzleError::CompatibilityViolation { failures, report }) => {
            assert_eq!(failures, 1);
            assert_eq!(report.passed(), 1);
            assert_eq!(report.results()[0].version, Some(v("1.5.2")));
        }
        other => panic!("expected a violation, got {:?}", other.map(|r| r.passed())),
    }
}

#[test]
fn exclusion_beats_transitive_availability() {
    let surface = SymbolSurface::new(vec![sym("com.fasterxml.jackson.databind.ObjectMapper")]);
    let mut verifier = Verifier::new(surface, lambda_catalog()).with_exclusion(key(JACKSON));
    verifier
        .register_rule(
            "com.amazonaws",
            "aws-lambda-java-core",
            "[1.0.0,)",
            &["com.amazonaws.serverless:aws-serverless-java-container-core:1.6.0"],
        )
        .unwrap();

    let deps = DependencySet::from_strings([(CORE, "1.2.1")]).unwrap();
    let results = verifier.verify(&deps);

    match &results[0].violations()[0] {
        Violation::MissingSymbol { excluded_by, .. } => {
            assert_eq!(excluded_by.as_ref(), Some(&key(JACKSON)));
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

#[test]
fn malformed_range_is_rejected_at_registration() {
    let mut verifier = Verifier::new(SymbolSurface::new(Vec::new()), Catalog::new());
    let err = verifier
        .register_rule("com.amazonaws", "aws-lambda-java-core", "[2.0,1.0]", &[])
        .unwrap_err();
    assert!(matches!(err, MuzzleError::MalformedRange { .. }));
    assert!(verifier.rules().is_empty());
}

#[test]
fn template_matrix_is_idempotent_and_parallel_safe() {
    for name in templates::names() {
        let mut config = parse_config(templates::get(name).unwrap(), Path::new(name)).unwrap();
        let candidates = CandidateVersions::new();

        let sequential = Verifier::from_config(&config).unwrap().run_matrix(&candidates);
        let again = Verifier::from_config(&config).unwrap().run_matrix(&candidates);
        assert_eq!(sequential.fingerprint(), again.fingerprint());

        config.settings.parallel = true;
        config.settings.max_parallel = 4;
        let parallel = Verifier::from_config(&config).unwrap().run_matrix(&candidates);
        assert_eq!(sequential, parallel, "template {}", name);
    }
}
