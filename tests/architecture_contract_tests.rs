//! Architecture contract tests.

mod support;

use support::architecture::find_non_test_lines_containing;

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_non_test_lines_containing(
        "src/domain",
        &[
            "crate::port",
            "crate::adapter",
            "crate::app",
            "crate::cli",
            "crate::config",
            "tokio::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_implementations() {
    let hits = find_non_test_lines_containing(
        "src/port",
        &["crate::adapter", "crate::app", "crate::cli", "crate::config"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn app_layer_talks_to_stores_through_the_port() {
    let hits = find_non_test_lines_containing("src/app", &["crate::adapter", "crate::cli"]);

    assert!(
        hits.is_empty(),
        "app layer must not name concrete adapters: {hits:#?}"
    );
}
