//! Servlet 组件扫描构建器
//!
//! 在启动前累积所有配置请求的包，最后一次性注册或合并共享后置处理器定义。

use crate::registrar::ServletComponentScanRegistrar;
use di_abstractions::BeanDefinitionRegistry;
use infrastructure_common::{ClassMetadata, ComponentError};
use std::collections::BTreeSet;
use tracing::debug;

/// Servlet 组件扫描构建器
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServletComponentScanBuilder {
    packages: BTreeSet<String>,
}

impl ServletComponentScanBuilder {
    /// 创建空构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置类请求的包
    pub fn add_configuration(&mut self, configuration: &ClassMetadata) -> Result<&mut Self, ComponentError> {
        let packages = ServletComponentScanRegistrar::packages_to_scan(configuration)?;
        self.packages.extend(packages);
        Ok(self)
    }

    /// 添加单个包
    pub fn add_base_package(&mut self, package: impl Into<String>) -> &mut Self {
        let package = package.into();
        let package = package.trim();
        if !package.is_empty() {
            self.packages.insert(package.to_string());
        }
        self
    }

    /// 添加多个包
    pub fn add_base_packages<I, S>(&mut self, packages: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for package in packages {
            self.add_base_package(package);
        }
        self
    }

    /// 已累积的包
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    /// 是否没有任何包
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// 注册或合并共享后置处理器定义
    ///
    /// 没有累积任何包时不修改注册表并返回 `false`。
    pub fn finalize(self, registry: &mut dyn BeanDefinitionRegistry) -> Result<bool, ComponentError> {
        if self.packages.is_empty() {
            debug!("没有需要扫描的 Servlet 组件包");
            return Ok(false);
        }
        ServletComponentScanRegistrar::register_or_merge(registry, self.packages)?;
        Ok(true)
    }
}
