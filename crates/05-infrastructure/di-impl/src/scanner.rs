//! 基于候选索引的组件扫描器

use di_abstractions::{BeanDefinition, CandidateComponentProvider, Environment, TypeFilter};
use infrastructure_common::{CandidateIndex, ComponentError};
use std::sync::Arc;
use tracing::{debug, trace};

/// 类路径候选组件提供者
///
/// 从 [`CandidateIndex`] 中按包查找候选组件：没有排除过滤器匹配，且至少一个包含过滤器匹配。
#[derive(Debug)]
pub struct ClassPathCandidateComponentProvider {
    /// 候选索引
    index: Arc<CandidateIndex>,
    /// 运行环境，用于解析包名中的占位符
    environment: Environment,
    /// 包含过滤器
    include_filters: Vec<Box<dyn TypeFilter>>,
    /// 排除过滤器
    exclude_filters: Vec<Box<dyn TypeFilter>>,
}

impl ClassPathCandidateComponentProvider {
    /// 基于指定索引创建扫描器
    pub fn new(index: Arc<CandidateIndex>) -> Self {
        Self {
            index,
            environment: Environment::default(),
            include_filters: Vec::new(),
            exclude_filters: Vec::new(),
        }
    }

    /// 设置运行环境
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    fn resolve_base_package(&self, base_package: &str) -> Result<String, ComponentError> {
        let resolved = self
            .environment
            .resolve_required_placeholders(base_package)?;
        Ok(resolved.trim().to_string())
    }
}

impl CandidateComponentProvider for ClassPathCandidateComponentProvider {
    fn add_include_filter(&mut self, filter: Box<dyn TypeFilter>) {
        self.include_filters.push(filter);
    }

    fn add_exclude_filter(&mut self, filter: Box<dyn TypeFilter>) {
        self.exclude_filters.push(filter);
    }

    fn find_candidate_components(
        &self,
        base_package: &str,
    ) -> Result<Vec<BeanDefinition>, ComponentError> {
        let package = self.resolve_base_package(base_package)?;
        debug!("扫描包: {}", package);

        let candidates: Vec<BeanDefinition> = self
            .index
            .candidates_in(&package)
            .into_iter()
            .filter(|metadata| {
                let excluded = self
                    .exclude_filters
                    .iter()
                    .any(|filter| filter.matches(metadata));
                let included = self
                    .include_filters
                    .iter()
                    .any(|filter| filter.matches(metadata));
                trace!(
                    "候选组件 {}: included={}, excluded={}",
                    metadata.type_name,
                    included,
                    excluded
                );
                included && !excluded
            })
            .map(BeanDefinition::scanned)
            .collect();

        debug!("扫描包 {} 完成，发现 {} 个候选组件", package, candidates.len());
        Ok(candidates)
    }
}
