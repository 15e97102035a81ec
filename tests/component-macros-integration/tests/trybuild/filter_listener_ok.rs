use component_macros::{web_filter, web_listener};
use infrastructure_common::{AnnotatedType, WEB_FILTER, WEB_LISTENER};

#[web_filter(filter_name = "audit", servlet_names = ["upload"], async_supported = false)]
struct AuditFilter {
    level: u8,
}

#[web_listener]
enum StartupListener {
    Idle,
}

fn main() {
    assert!(AuditFilter::class_metadata().has_annotation(WEB_FILTER));
    assert!(StartupListener::class_metadata().has_annotation(WEB_LISTENER));
    let filter = AuditFilter { level: 1 };
    assert_eq!(filter.level, 1);
    assert!(matches!(StartupListener::Idle, StartupListener::Idle));
}
