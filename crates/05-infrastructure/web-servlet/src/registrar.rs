//! Servlet 组件扫描注册器
//!
//! 处理配置类上的 `ServletComponentScan` 注解，维护唯一的共享后置处理器 Bean 定义，
//! 其构造参数是所有配置请求过的包的并集。

use crate::post_processor::ServletComponentRegisteringPostProcessor;
use di_abstractions::{BeanDefinitionBuilder, BeanDefinitionRegistry, BeanRole, ImportBeanDefinitionRegistrar};
use infrastructure_common::{BeanDefinitionError, ClassMetadata, ComponentError, SERVLET_COMPONENT_SCAN};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// 共享后置处理器的 Bean 名称
pub const BEAN_NAME: &str = "servletComponentRegisteringPostProcessor";

/// 注解属性名称
pub mod attribute_names {
    pub const VALUE: &str = "value";
    pub const BASE_PACKAGES: &str = "base_packages";
    pub const BASE_PACKAGE_CLASSES: &str = "base_package_classes";
}

/// Servlet 组件扫描注册器
#[derive(Debug, Clone, Copy, Default)]
pub struct ServletComponentScanRegistrar;

impl ServletComponentScanRegistrar {
    /// 创建注册器
    pub fn new() -> Self {
        Self
    }

    /// 计算配置类请求扫描的包
    ///
    /// 依次合并 `base_packages`、`value` 和 `base_package_classes` 所在的包；都为空时使用配置类自身所在的包。
    pub fn packages_to_scan(metadata: &ClassMetadata) -> Result<BTreeSet<String>, ComponentError> {
        let attributes = metadata
            .annotation_attributes(SERVLET_COMPONENT_SCAN)
            .ok_or_else(|| {
                ComponentError::invalid_annotation(
                    &metadata.type_name,
                    SERVLET_COMPONENT_SCAN,
                    "配置类未声明该注解",
                )
            })?;
        let invalid = |err: infrastructure_common::AttributeError| {
            err.into_component_error(&metadata.type_name, SERVLET_COMPONENT_SCAN)
        };

        let mut packages_to_scan: BTreeSet<String> = attributes
            .string_array_or_empty(attribute_names::BASE_PACKAGES)
            .map_err(invalid)?
            .iter()
            .chain(
                attributes
                    .string_array_or_empty(attribute_names::VALUE)
                    .map_err(invalid)?,
            )
            .map(|package| package.trim())
            .filter(|package| !package.is_empty())
            .map(str::to_string)
            .collect();

        for base_package_class in attributes
            .types_or_empty(attribute_names::BASE_PACKAGE_CLASSES)
            .map_err(invalid)?
        {
            packages_to_scan.insert(base_package_class.package_name().to_string());
        }

        if packages_to_scan.is_empty() {
            packages_to_scan.insert(metadata.package_name().to_string());
        }
        debug!("配置类 {} 请求扫描的包: {:?}", metadata.type_name, packages_to_scan);
        Ok(packages_to_scan)
    }

    /// 注册共享后置处理器，已存在时把包合并进现有定义
    pub fn register_or_merge(
        registry: &mut dyn BeanDefinitionRegistry,
        packages_to_scan: BTreeSet<String>,
    ) -> Result<(), ComponentError> {
        if registry.contains_bean_definition(BEAN_NAME) {
            Self::update_post_processor(registry, packages_to_scan)
        } else {
            Self::add_post_processor(registry, packages_to_scan)
        }
    }

    fn update_post_processor(
        registry: &mut dyn BeanDefinitionRegistry,
        packages_to_scan: BTreeSet<String>,
    ) -> Result<(), ComponentError> {
        let definition = registry.get_bean_definition_mut(BEAN_NAME)?;
        let merged_packages = definition
            .constructor_argument_values_mut()
            .generic_string_set_mut()
            .ok_or_else(|| BeanDefinitionError::invalid(BEAN_NAME, "缺少待扫描包集合构造参数"))?;

        merged_packages.extend(packages_to_scan);
        debug!("合并后的待扫描包: {:?}", merged_packages);
        Ok(())
    }

    fn add_post_processor(
        registry: &mut dyn BeanDefinitionRegistry,
        packages_to_scan: BTreeSet<String>,
    ) -> Result<(), ComponentError> {
        info!("注册 Servlet 组件扫描后置处理器，待扫描包: {:?}", packages_to_scan);
        let definition = BeanDefinitionBuilder::root_bean_definition(
            ServletComponentRegisteringPostProcessor::BEAN_CLASS_NAME,
        )
        .add_constructor_arg_value(packages_to_scan)
        .role(BeanRole::Infrastructure)
        .description("Servlet 组件扫描")
        .build();

        registry.register_bean_definition(BEAN_NAME, definition)?;
        Ok(())
    }
}

impl ImportBeanDefinitionRegistrar for ServletComponentScanRegistrar {
    fn annotation_type(&self) -> &str {
        SERVLET_COMPONENT_SCAN
    }

    fn register_bean_definitions(
        &self,
        importing_class: &ClassMetadata,
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> Result<(), ComponentError> {
        let packages_to_scan = Self::packages_to_scan(importing_class)?;
        Self::register_or_merge(registry, packages_to_scan)
    }
}
