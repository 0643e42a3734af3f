//! Integration tests for attribute registration, removal, and querying.

use attrweave::prelude::*;

#[test]
fn test_register_accumulates_disjoint_bits() {
    let resolver = AttributesResolver::new();
    resolver
        .register_attribute("Inject", AttributeTargets::PROPERTY)
        .register_attribute("Inject", AttributeTargets::PARAMETER);

    assert!(resolver.has_attribute(
        "Inject",
        AttributeTargets::PROPERTY | AttributeTargets::PARAMETER
    ));
    assert!(resolver.has_attribute("Inject", AttributeTargets::PROPERTY));
    assert!(resolver.has_attribute("Inject", AttributeTargets::PARAMETER));

    // Disjoint masks miss.
    assert!(!resolver.has_attribute("Inject", AttributeTargets::CLASS));
    assert!(!resolver.has_attribute(
        "Inject",
        AttributeTargets::METHOD | AttributeTargets::CONSTANT
    ));
}

#[test]
fn test_register_all_then_remove_all() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Deprecated", AttributeTargets::ALL);
    assert!(resolver.has_attribute("Deprecated", AttributeTargets::ALL));

    resolver.remove_attribute("Deprecated", AttributeTargets::ALL);
    assert!(!resolver.has_attribute("Deprecated", AttributeTargets::ALL));

    // The entry is gone: re-registering starts from a clean mask.
    resolver.register_attribute("Deprecated", AttributeTargets::METHOD);
    assert!(!resolver.has_attribute("Deprecated", AttributeTargets::CLASS));
}

#[test]
fn test_partial_removal_clears_only_named_bits() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute(
        "Route",
        AttributeTargets::CLASS | AttributeTargets::METHOD,
    );

    resolver.remove_attribute("Route", AttributeTargets::CLASS);
    assert!(!resolver.has_attribute("Route", AttributeTargets::CLASS));
    assert!(resolver.has_attribute("Route", AttributeTargets::METHOD));
}

#[test]
fn test_removal_down_to_empty_mask_disables_kind() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Once", AttributeTargets::METHOD);
    resolver.remove_attribute("Once", AttributeTargets::METHOD);

    // Mask is empty: the kind reports absent for every query.
    assert!(!resolver.has_attribute("Once", AttributeTargets::ALL));
    assert!(!resolver.has_attribute("Once", AttributeTargets::METHOD));
}

#[test]
fn test_unknown_kind_reports_absent() {
    let resolver = AttributesResolver::new();
    assert!(!resolver.has_attribute("Never", AttributeTargets::ALL));
}

#[test]
fn test_lookup_is_case_insensitive_and_trims_separators() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("App::Http::Route", AttributeTargets::METHOD);

    assert!(resolver.has_attribute("app::http::route", AttributeTargets::METHOD));
    assert!(resolver.has_attribute("::App::Http::Route::", AttributeTargets::METHOD));
    assert!(resolver.has_attribute("APP::HTTP::ROUTE", AttributeTargets::ALL));
}

#[test]
fn test_registration_chains_fluently() {
    let resolver = AttributesResolver::new();
    resolver
        .register_attribute("A", AttributeTargets::CLASS)
        .register_attribute("B", AttributeTargets::METHOD)
        .remove_attribute("A", AttributeTargets::ALL);

    assert!(!resolver.has_attribute("A", AttributeTargets::ALL));
    assert!(resolver.has_attribute("B", AttributeTargets::METHOD));
}
