//! 宏声明的组件经全局索引扫描并注册的完整流程

use component_macros::{servlet_component_scan, web_filter, web_listener, web_servlet};
use di_abstractions::{ApplicationContext, BeanDefinitionRegistry};
use di_impl::GenericWebApplicationContext;
use infrastructure_common::{global_candidate_index, AnnotatedType};
use web_servlet::{
    enable_servlet_component_scan, DispatcherType, FilterRegistrationBean,
    ServletListenerRegistrationBean, ServletRegistrationBean,
};

mod site {
    use super::*;

    #[web_servlet(
        url_patterns = ["/upload"],
        load_on_startup = 2,
        init_params = [("charset", "UTF-8")],
        multipart(max_file_size = 2048, max_request_size = 4096)
    )]
    pub struct UploadServlet;

    #[web_filter(url_patterns = ["/upload/*"], dispatcher_types = ["request", "ASYNC"])]
    pub struct ThrottleFilter;

    #[web_listener]
    pub struct SessionListener;
}

mod elsewhere {
    use super::*;

    #[web_servlet(value = "/other")]
    pub struct OtherServlet;
}

#[servlet_component_scan(base_package_classes = [site::UploadServlet])]
pub struct SiteConfig;

fn refreshed_context() -> GenericWebApplicationContext {
    let mut context = GenericWebApplicationContext::new();
    enable_servlet_component_scan(&mut context, global_candidate_index());
    context
        .import_configuration(&SiteConfig::class_metadata())
        .unwrap();
    context.refresh().unwrap();
    context
}

#[test]
fn test_servlet_attributes_reach_registration_bean() {
    let context = refreshed_context();

    let upload = ServletRegistrationBean::try_from(
        context.registry().get_bean_definition("UploadServlet").unwrap(),
    )
    .unwrap();

    assert_eq!(upload.url_mappings, ["/upload"]);
    assert_eq!(upload.load_on_startup, 2);
    assert_eq!(upload.init_parameters.get("charset").map(String::as_str), Some("UTF-8"));
    assert!(upload.servlet_class_name().ends_with("site::UploadServlet"));

    let multipart = upload.multipart_config.unwrap();
    assert_eq!(multipart.max_file_size, 2048);
    assert_eq!(multipart.max_request_size, 4096);
    assert_eq!(multipart.file_size_threshold, 0);
}

#[test]
fn test_filter_dispatcher_types_are_parsed() {
    let context = refreshed_context();

    let throttle = FilterRegistrationBean::try_from(
        context.registry().get_bean_definition("ThrottleFilter").unwrap(),
    )
    .unwrap();

    assert_eq!(throttle.url_patterns, ["/upload/*"]);
    assert!(throttle.dispatcher_types.contains(&DispatcherType::Request));
    assert!(throttle.dispatcher_types.contains(&DispatcherType::Async));
    assert_eq!(throttle.dispatcher_types.len(), 2);
}

#[test]
fn test_listener_is_registered_under_type_name() {
    let context = refreshed_context();
    let listener_name = concat!(module_path!(), "::site::SessionListener");

    let listener = ServletListenerRegistrationBean::try_from(
        context.registry().get_bean_definition(listener_name).unwrap(),
    )
    .unwrap();

    assert_eq!(listener.listener_class_name(), listener_name);
}

#[test]
fn test_components_outside_scanned_package_are_ignored() {
    let context = refreshed_context();

    assert!(!context.registry().contains_bean_definition("OtherServlet"));
    assert_eq!(context.bean_definition_registry().application_bean_names().len(), 3);
}
