//! # 基础设施组合层
//!
//! 这个 crate 负责把配置加载、日志初始化、配置类导入和 Servlet 组件扫描组合成
//! 一个可刷新的 Web 应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式组装应用上下文
//! - **配置绑定**: 从 TOML/JSON 文件和环境变量加载应用配置
//! - **组件扫描**: 导入 `#[servlet_component_scan]` 配置类并注册 Servlet 组件
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use component_macros::{servlet_component_scan, web_servlet};
//! use infrastructure_composition::{LoggingConfig, WebApplicationBuilder};
//!
//! #[web_servlet(url_patterns = ["/hello"])]
//! pub struct HelloServlet;
//!
//! #[servlet_component_scan]
//! pub struct WebConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let application = WebApplicationBuilder::new()
//!         .add_config_toml("config/app.toml")?
//!         .add_config_env_vars("LORN")
//!         .with_logging(LoggingConfig::development())
//!         .with_configuration::<WebConfig>()
//!         .build()?;
//!
//!     for (name, servlet) in application.servlet_registrations()? {
//!         println!("{} -> {:?}", name, servlet.url_mappings);
//!     }
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod builder;
pub mod properties;

// 重新导出主要类型
pub use application::WebApplication;
pub use builder::{LoggingConfig, WebApplicationBuilder};
pub use properties::{
    ApplicationProperties, ComponentScanProperties, ConfigSource, MainProperties,
    ServletProperties, DEFAULT_ENV_PREFIX,
};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
