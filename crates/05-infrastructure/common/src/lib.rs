//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn 基础设施层的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`ClassMetadata`] - 编译期生成的类元数据
//! - [`AnnotationAttributes`] - 注解属性及类型化读取
//! - [`CandidateIndex`] - 组件候选索引，替代运行时类路径扫描
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 约定优于配置
//! - 编译期注册，启动期发现

pub mod annotation;
pub mod discovery;
pub mod errors;
pub mod metadata;

pub use annotation::*;
pub use discovery::*;
pub use errors::*;
pub use metadata::*;
