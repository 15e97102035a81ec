//! # Web Servlet
//!
//! Servlet 组件扫描：把带有 `WebServlet`、`WebFilter`、`WebListener` 注解的类型注册为组件注册 Bean，
//! 供内嵌 Web 服务器启动时绑定。
//!
//! ## 流程
//!
//! 1. [`ServletComponentScanRegistrar`] 处理配置类上的 `ServletComponentScan` 注解，创建或合并共享的后置处理器定义
//! 2. [`ServletComponentRegisteringPostProcessor`] 在上下文刷新时扫描配置的包
//! 3. [`ServletComponentHandler`] 把每个匹配的组件转换为注册 Bean 定义
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use di_impl::GenericWebApplicationContext;
//! use infrastructure_common::global_candidate_index;
//! use web_servlet::enable_servlet_component_scan;
//!
//! let mut context = GenericWebApplicationContext::new();
//! enable_servlet_component_scan(&mut context, global_candidate_index());
//! context.import_configuration(&AppConfig::class_metadata())?;
//! context.refresh()?;
//! ```

pub mod handler;
pub mod post_processor;
pub mod registrar;
pub mod registration;
pub mod scan_builder;

pub use handler::{ServletComponentHandler, HANDLERS};
pub use post_processor::ServletComponentRegisteringPostProcessor;
pub use registrar::{ServletComponentScanRegistrar, BEAN_NAME};
pub use registration::{
    DispatcherType, FilterRegistrationBean, MultipartConfigElement, ServletListenerRegistrationBean,
    ServletRegistrationBean, UnknownDispatcherType,
};
pub use scan_builder::ServletComponentScanBuilder;

use di_impl::GenericWebApplicationContext;
use infrastructure_common::CandidateIndex;
use std::sync::Arc;

/// 在应用上下文中启用 Servlet 组件扫描
///
/// 注册配置导入注册器，并让共享后置处理器定义在刷新时从指定索引扫描组件。
pub fn enable_servlet_component_scan(
    context: &mut GenericWebApplicationContext,
    candidate_index: Arc<CandidateIndex>,
) {
    context.register_import_registrar(Arc::new(ServletComponentScanRegistrar::new()));
    context.register_post_processor_factory(
        ServletComponentRegisteringPostProcessor::BEAN_CLASS_NAME,
        ServletComponentRegisteringPostProcessor::factory(candidate_index),
    );
}
