//! 组件扫描器抽象接口
//!
//! 提供按包查找候选组件的能力

use crate::bean_definition::BeanDefinition;
use infrastructure_common::{ClassMetadata, ComponentError};
use std::fmt::Debug;

/// 类型过滤器 trait
///
/// 扫描时用于决定类型是否成为候选组件
pub trait TypeFilter: Debug + Send + Sync {
    /// 检查类元数据是否匹配
    fn matches(&self, metadata: &ClassMetadata) -> bool;
}

/// 按注解类型匹配的过滤器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTypeFilter {
    annotation_type: String,
}

impl AnnotationTypeFilter {
    /// 创建注解类型过滤器
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
        }
    }

    /// 匹配的注解类型
    pub fn annotation_type(&self) -> &str {
        &self.annotation_type
    }
}

impl TypeFilter for AnnotationTypeFilter {
    fn matches(&self, metadata: &ClassMetadata) -> bool {
        metadata.has_annotation(&self.annotation_type)
    }
}

/// 候选组件提供者 trait
pub trait CandidateComponentProvider: Send + Sync {
    /// 添加包含过滤器
    fn add_include_filter(&mut self, filter: Box<dyn TypeFilter>);

    /// 添加排除过滤器
    fn add_exclude_filter(&mut self, filter: Box<dyn TypeFilter>);

    /// 在指定包（含子包）中查找候选组件
    fn find_candidate_components(
        &self,
        base_package: &str,
    ) -> Result<Vec<BeanDefinition>, ComponentError>;
}
