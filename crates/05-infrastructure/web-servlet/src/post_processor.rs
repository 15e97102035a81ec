//! Servlet 组件注册后置处理器
//!
//! 在容器刷新期间运行一次：仅在内嵌 Web 服务器中扫描配置的包，并把每个扫描到的组件交给全部处理器。

use crate::handler::HANDLERS;
use di_abstractions::{
    ApplicationContext, BeanDefinition, BeanDefinitionOrigin, BeanFactoryPostProcessor,
    CandidateComponentProvider,
};
use di_impl::{ClassPathCandidateComponentProvider, PostProcessorFactory};
use infrastructure_common::{BeanDefinitionError, CandidateIndex, ComponentError};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Servlet 组件注册后置处理器
#[derive(Debug)]
pub struct ServletComponentRegisteringPostProcessor {
    packages_to_scan: BTreeSet<String>,
    candidate_index: Arc<CandidateIndex>,
}

impl ServletComponentRegisteringPostProcessor {
    /// Bean 类型名称
    pub const BEAN_CLASS_NAME: &'static str =
        concat!(module_path!(), "::ServletComponentRegisteringPostProcessor");

    /// 创建后置处理器
    pub fn new(packages_to_scan: BTreeSet<String>, candidate_index: Arc<CandidateIndex>) -> Self {
        Self {
            packages_to_scan,
            candidate_index,
        }
    }

    /// 从注册表中的 Bean 定义创建，包集合取自第一个集合类型的构造参数
    pub fn from_bean_definition(
        definition: &BeanDefinition,
        candidate_index: Arc<CandidateIndex>,
    ) -> Result<Self, BeanDefinitionError> {
        let packages_to_scan = definition
            .constructor_argument_values()
            .generic_string_set()
            .cloned()
            .ok_or_else(|| {
                BeanDefinitionError::invalid(
                    definition.bean_class_name(),
                    "缺少待扫描包集合构造参数",
                )
            })?;
        Ok(Self::new(packages_to_scan, candidate_index))
    }

    /// 为应用上下文生成后置处理器工厂
    pub fn factory(candidate_index: Arc<CandidateIndex>) -> PostProcessorFactory {
        Arc::new(
            move |definition: &BeanDefinition| -> Result<Box<dyn BeanFactoryPostProcessor>, ComponentError> {
                let post_processor =
                    Self::from_bean_definition(definition, Arc::clone(&candidate_index))?;
                Ok(Box::new(post_processor))
            },
        )
    }

    /// 待扫描的包
    pub fn packages_to_scan(&self) -> &BTreeSet<String> {
        &self.packages_to_scan
    }

    fn create_component_provider(
        &self,
        context: &dyn ApplicationContext,
    ) -> ClassPathCandidateComponentProvider {
        let mut provider = ClassPathCandidateComponentProvider::new(Arc::clone(&self.candidate_index))
            .with_environment(context.environment().clone());
        for handler in HANDLERS {
            provider.add_include_filter(Box::new(handler.type_filter()));
        }
        provider
    }

    fn scan_package(
        &self,
        provider: &dyn CandidateComponentProvider,
        package_to_scan: &str,
        handled: &mut HashSet<String>,
        context: &mut dyn ApplicationContext,
    ) -> Result<usize, ComponentError> {
        let mut registered = 0;
        for candidate in provider.find_candidate_components(package_to_scan)? {
            if !matches!(candidate.origin(), BeanDefinitionOrigin::Scanned(_)) {
                debug!("跳过非扫描来源的候选组件: {}", candidate.bean_class_name());
                continue;
            }
            // 嵌套的包会再次返回同一类型
            if !handled.insert(candidate.bean_class_name().to_string()) {
                debug!("候选组件已处理，跳过: {}", candidate.bean_class_name());
                continue;
            }
            for handler in HANDLERS {
                if handler.handle(&candidate, context.registry_mut())?.is_some() {
                    registered += 1;
                }
            }
        }
        Ok(registered)
    }

    /// 使用指定的候选组件提供者扫描全部包
    ///
    /// 同一类型在多个包中被发现时只处理一次。
    pub fn scan_with(
        &self,
        provider: &dyn CandidateComponentProvider,
        context: &mut dyn ApplicationContext,
    ) -> Result<usize, ComponentError> {
        let mut registered = 0;
        let mut handled = HashSet::new();
        for package_to_scan in &self.packages_to_scan {
            registered += self.scan_package(provider, package_to_scan, &mut handled, context)?;
        }
        Ok(registered)
    }
}

impl BeanFactoryPostProcessor for ServletComponentRegisteringPostProcessor {
    fn name(&self) -> &str {
        crate::registrar::BEAN_NAME
    }

    fn post_process_bean_factory(
        &self,
        context: &mut dyn ApplicationContext,
    ) -> Result<(), ComponentError> {
        if !context.is_running_in_embedded_web_server() {
            debug!(
                "应用上下文 {} 未运行在内嵌 Web 服务器中，跳过 Servlet 组件扫描",
                context.id()
            );
            return Ok(());
        }

        let provider = self.create_component_provider(context);
        let registered = self.scan_with(&provider, context)?;
        info!(
            "Servlet 组件扫描完成: {} 个包, 注册 {} 个组件",
            self.packages_to_scan.len(),
            registered
        );
        Ok(())
    }
}
