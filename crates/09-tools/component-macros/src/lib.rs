//! # Component Macros
//!
//! 这个 crate 提供了声明 Servlet 组件和扫描配置的过程宏。
//!
//! ## 核心宏
//!
//! - [`web_servlet`] - 声明 Servlet
//! - [`web_filter`] - 声明过滤器
//! - [`web_listener`] - 声明监听器
//! - [`servlet_component_scan`] - 声明扫描配置类
//!
//! 前三个宏在程序启动时把类型的类元数据写入全局候选索引，替代运行时类路径扫描。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{servlet_component_scan, web_filter, web_servlet};
//!
//! #[web_servlet(url_patterns = ["/hello"], load_on_startup = 1)]
//! pub struct HelloServlet;
//!
//! #[web_filter(value = ["/*"], dispatcher_types = ["REQUEST", "ERROR"])]
//! pub struct AuditFilter;
//!
//! #[servlet_component_scan(base_packages = ["app::web"])]
//! pub struct WebConfig;
//! ```
//!
//! 使用这些宏的 crate 需要同时依赖 `infrastructure-common` 和 `ctor`。

use proc_macro::TokenStream;
use servlet::ComponentKind;

mod attributes;
mod scan;
mod servlet;
mod utils;

fn into_token_stream(result: syn::Result<proc_macro2::TokenStream>) -> TokenStream {
    result.unwrap_or_else(syn::Error::into_compile_error).into()
}

/// 声明 Servlet
///
/// # 参数
///
/// - `name = "..."` - Servlet 名称，默认为类型名
/// - `value = [...]` / `url_patterns = [...]` - URL 映射，二者不能同时使用
/// - `load_on_startup = N` - 启动顺序（默认为 -1）
/// - `async_supported` - 是否支持异步
/// - `init_params = [("name", "value"), ...]` - 初始化参数
/// - `multipart(location = "...", max_file_size = N, max_request_size = N, file_size_threshold = N)` - 文件上传配置
///
/// # 示例
///
/// ```rust,ignore
/// #[web_servlet(name = "upload", value = "/upload", multipart(max_file_size = 1048576))]
/// pub struct UploadServlet;
/// ```
#[proc_macro_attribute]
pub fn web_servlet(args: TokenStream, input: TokenStream) -> TokenStream {
    into_token_stream(servlet::expand(ComponentKind::Servlet, args.into(), input.into()))
}

/// 声明过滤器
///
/// # 参数
///
/// - `filter_name = "..."` - 过滤器名称，默认为类型名
/// - `value = [...]` / `url_patterns = [...]` - URL 模式，二者不能同时使用
/// - `servlet_names = [...]` - 应用到的 Servlet
/// - `dispatcher_types = [...]` - 分发类型，默认为 `REQUEST`
/// - `async_supported` - 是否支持异步
/// - `init_params = [("name", "value"), ...]` - 初始化参数
#[proc_macro_attribute]
pub fn web_filter(args: TokenStream, input: TokenStream) -> TokenStream {
    into_token_stream(servlet::expand(ComponentKind::Filter, args.into(), input.into()))
}

/// 声明监听器
///
/// 监听器以完整类型名注册。
#[proc_macro_attribute]
pub fn web_listener(args: TokenStream, input: TokenStream) -> TokenStream {
    into_token_stream(servlet::expand(ComponentKind::Listener, args.into(), input.into()))
}

/// 声明扫描配置类
///
/// # 参数
///
/// - `base_packages = [...]` - 要扫描的模块路径，`value` 为其别名
/// - `base_package_classes = [Type, ...]` - 以这些类型所在的模块作为扫描根
///
/// 所有参数都为空时扫描配置类所在的模块。
#[proc_macro_attribute]
pub fn servlet_component_scan(args: TokenStream, input: TokenStream) -> TokenStream {
    into_token_stream(scan::expand(args.into(), input.into()))
}
