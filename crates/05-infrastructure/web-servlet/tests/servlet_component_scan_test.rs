//! Servlet 组件扫描的集成测试

use di_abstractions::{ApplicationContext, BeanDefinitionRegistry, ServletContext};
use di_impl::GenericWebApplicationContext;
use infrastructure_common::{
    AnnotationAttributes, AnnotationMetadata, AttributeValue, CandidateIndex, ClassMetadata,
    InfrastructureError, SERVLET_COMPONENT_SCAN, WEB_FILTER, WEB_SERVLET,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use web_servlet::{
    enable_servlet_component_scan, FilterRegistrationBean, ServletComponentRegisteringPostProcessor,
    ServletRegistrationBean, BEAN_NAME,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn scan_config(type_name: &str, base_packages: &[&str]) -> ClassMetadata {
    let mut attributes = AnnotationAttributes::new();
    if !base_packages.is_empty() {
        attributes.insert("base_packages", strings(base_packages));
    }
    ClassMetadata::new(type_name)
        .with_annotation(AnnotationMetadata::new(SERVLET_COMPONENT_SCAN, attributes))
}

fn index() -> Arc<CandidateIndex> {
    let index = CandidateIndex::new();
    index.register(
        ClassMetadata::new("com::app::web::HelloServlet").with_annotation(AnnotationMetadata::new(
            WEB_SERVLET,
            AnnotationAttributes::new().with("url_patterns", strings(&["/hello"])),
        )),
    );
    index.register(
        ClassMetadata::new("com::app::web::AuditFilter").with_annotation(AnnotationMetadata::new(
            WEB_FILTER,
            AnnotationAttributes::new()
                .with("value", strings(&["/*"]))
                .with(
                    "init_params",
                    AttributeValue::AnnotationArray(vec![AnnotationAttributes::new()
                        .with("name", "level")
                        .with("value", "full")]),
                ),
        )),
    );
    index.register(
        ClassMetadata::new("com::b::ReportServlet").with_annotation(AnnotationMetadata::new(
            WEB_SERVLET,
            AnnotationAttributes::new().with("url_patterns", strings(&["/report"])),
        )),
    );
    Arc::new(index)
}

fn context(index: Arc<CandidateIndex>) -> GenericWebApplicationContext {
    let mut context = GenericWebApplicationContext::new();
    enable_servlet_component_scan(&mut context, index);
    context
}

fn packages_to_scan(context: &GenericWebApplicationContext) -> BTreeSet<String> {
    context
        .registry()
        .get_bean_definition(BEAN_NAME)
        .unwrap()
        .constructor_argument_values()
        .generic_string_set()
        .cloned()
        .unwrap()
}

#[test]
fn test_hello_servlet_is_registered_with_defaults() {
    let mut context = context(index());
    context
        .import_configuration(&scan_config("com::app::Config", &[]))
        .unwrap();

    context.refresh().unwrap();

    let registry = context.bean_definition_registry();
    assert_eq!(registry.application_bean_names(), ["HelloServlet", "AuditFilter"]);

    let hello =
        ServletRegistrationBean::try_from(registry.get_bean_definition("HelloServlet").unwrap())
            .unwrap();
    assert_eq!(hello.url_mappings, ["/hello"]);
    assert_eq!(hello.load_on_startup, -1);

    let audit =
        FilterRegistrationBean::try_from(registry.get_bean_definition("AuditFilter").unwrap())
            .unwrap();
    assert_eq!(audit.url_patterns, ["/*"]);
    assert_eq!(audit.init_parameters.get("level").map(String::as_str), Some("full"));
}

#[test]
fn test_packages_from_all_configurations_are_merged() {
    let mut context = context(index());
    context
        .import_configuration(&scan_config("com::first::Config", &["com::a"]))
        .unwrap();
    context
        .import_configuration(&scan_config("com::second::Config", &["com::a", "com::b"]))
        .unwrap();

    assert_eq!(
        packages_to_scan(&context),
        BTreeSet::from(["com::a".to_string(), "com::b".to_string()])
    );

    context.refresh().unwrap();

    assert!(context.registry().contains_bean_definition("ReportServlet"));
    assert!(!context.registry().contains_bean_definition("HelloServlet"));
}

#[test]
fn test_bound_servlet_context_registers_nothing() {
    let mut context = GenericWebApplicationContext::new()
        .with_servlet_context(ServletContext::new("Apache Tomcat/10.1", "/app"));
    enable_servlet_component_scan(&mut context, index());
    context
        .import_configuration(&scan_config("com::app::Config", &[]))
        .unwrap();
    let before = context.registry().bean_definition_names();

    context.refresh().unwrap();

    assert_eq!(context.registry().bean_definition_names(), before);
}

#[test]
fn test_duplicate_component_name_aborts_refresh() {
    let index = index();
    index.register(
        ClassMetadata::new("com::app::admin::HelloServlet").with_annotation(AnnotationMetadata::new(
            WEB_SERVLET,
            AnnotationAttributes::new().with("url_patterns", strings(&["/admin/hello"])),
        )),
    );
    let mut context = context(index);
    context
        .import_configuration(&scan_config("com::app::Config", &[]))
        .unwrap();

    let err = context.refresh().unwrap_err();

    assert!(matches!(err, InfrastructureError::ComponentError { .. }));
    assert!(!context.is_active());
}

#[test]
fn test_post_processor_is_built_from_merged_definition() {
    let mut context = context(index());
    context
        .import_configuration(&scan_config("com::app::Config", &["com::b"]))
        .unwrap();

    let post_processor = ServletComponentRegisteringPostProcessor::from_bean_definition(
        context.registry().get_bean_definition(BEAN_NAME).unwrap(),
        index(),
    )
    .unwrap();

    assert_eq!(
        post_processor.packages_to_scan(),
        &BTreeSet::from(["com::b".to_string()])
    );
}
