//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义 Bean 定义模型、注册表和启动期扩展点。
//!
//! ## 核心接口
//!
//! - [`BeanDefinition`] - Bean 定义模型
//! - [`BeanDefinitionRegistry`] - Bean 定义注册表接口
//! - [`CandidateComponentProvider`] - 候选组件扫描接口
//! - [`ApplicationContext`] - 应用上下文接口
//! - [`BeanFactoryPostProcessor`] - Bean 工厂后置处理器接口
//! - [`ImportBeanDefinitionRegistrar`] - 配置导入注册器接口

pub mod bean_definition;
pub mod container;
pub mod environment;
pub mod registry;
pub mod scanner;

pub use bean_definition::*;
pub use container::*;
pub use environment::*;
pub use registry::*;
pub use scanner::*;
