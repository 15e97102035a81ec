use component_macros::web_servlet;
use infrastructure_common::{AnnotatedType, MULTIPART_CONFIG, WEB_SERVLET};

#[web_servlet(
    name = "upload",
    value = "/upload",
    load_on_startup = -1,
    multipart(location = "/tmp", max_file_size = 1048576, file_size_threshold = 0)
)]
struct UploadServlet;

fn main() {
    let metadata = UploadServlet::class_metadata();
    assert_eq!(metadata.simple_name, "UploadServlet");
    assert!(metadata.has_annotation(WEB_SERVLET));
    assert!(metadata.has_annotation(MULTIPART_CONFIG));
    let _ = UploadServlet;
}
