//! # 依赖注入具体实现
//!
//! 提供 Bean 定义注册表、基于候选索引的组件扫描器和 Web 应用上下文实现

pub mod context;
pub mod registry;
pub mod scanner;

pub use context::{GenericWebApplicationContext, PostProcessorFactory};
pub use registry::DefaultBeanDefinitionRegistry;
pub use scanner::ClassPathCandidateComponentProvider;
