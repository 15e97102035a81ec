use component_macros::servlet_component_scan;
use infrastructure_common::{AnnotatedType, SERVLET_COMPONENT_SCAN};

mod web {
    pub struct Marker;
}

#[servlet_component_scan(value = "app::web", base_package_classes = [web::Marker])]
struct WebConfig;

fn main() {
    let metadata = WebConfig::class_metadata();
    let attributes = metadata.annotation_attributes(SERVLET_COMPONENT_SCAN).unwrap();
    assert_eq!(attributes.get_string_array("value").unwrap(), ["app::web"]);
    assert_eq!(attributes.types_or_empty("base_package_classes").unwrap().len(), 1);
    let _ = (WebConfig, web::Marker);
}
