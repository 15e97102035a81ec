//! trybuild UI tests for component_macros

#[test]
fn ui_servlet_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/servlet_ok.rs");
    t.pass("tests/trybuild/filter_listener_ok.rs");
    t.pass("tests/trybuild/scan_ok.rs");
}
