//! 内存 Bean 定义注册表

use di_abstractions::{BeanDefinition, BeanDefinitionRegistry, BeanRole};
use infrastructure_common::BeanDefinitionError;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 默认 Bean 定义注册表
///
/// 保留注册顺序；默认不允许同名覆盖。
#[derive(Debug, Default)]
pub struct DefaultBeanDefinitionRegistry {
    /// Bean 定义
    definitions: HashMap<String, BeanDefinition>,
    /// 按注册顺序排列的名称
    names: Vec<String>,
    /// 是否允许覆盖同名定义
    allow_bean_definition_overriding: bool,
    /// 是否已冻结
    frozen: bool,
}

impl DefaultBeanDefinitionRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否允许覆盖同名定义
    pub fn with_bean_definition_overriding(mut self, allow: bool) -> Self {
        self.allow_bean_definition_overriding = allow;
        self
    }

    /// 是否允许覆盖同名定义
    pub fn is_allow_bean_definition_overriding(&self) -> bool {
        self.allow_bean_definition_overriding
    }

    /// 冻结配置，之后不再接受注册
    pub fn freeze_configuration(&mut self) {
        self.frozen = true;
        info!("Bean 定义注册表已冻结，共 {} 个定义", self.names.len());
    }

    /// 是否已冻结
    pub fn is_configuration_frozen(&self) -> bool {
        self.frozen
    }

    /// 获取应用角色的 Bean 名称，隐藏基础设施定义
    pub fn application_bean_names(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| {
                self.definitions
                    .get(*name)
                    .is_some_and(|definition| definition.role() != BeanRole::Infrastructure)
            })
            .cloned()
            .collect()
    }

    /// 按注册顺序遍历全部定义
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BeanDefinition)> {
        self.names.iter().filter_map(|name| {
            self.definitions
                .get(name)
                .map(|definition| (name.as_str(), definition))
        })
    }
}

impl BeanDefinitionRegistry for DefaultBeanDefinitionRegistry {
    fn register_bean_definition(
        &mut self,
        name: &str,
        definition: BeanDefinition,
    ) -> Result<(), BeanDefinitionError> {
        if name.trim().is_empty() {
            return Err(BeanDefinitionError::invalid(
                name,
                format!("{} 的 Bean 名称不能为空", definition.bean_class_name()),
            ));
        }
        if definition.bean_class_name().trim().is_empty() {
            return Err(BeanDefinitionError::invalid(name, "Bean 类型不能为空"));
        }
        if self.frozen {
            return Err(BeanDefinitionError::RegistryFrozen {
                name: name.to_string(),
            });
        }

        if let Some(existing) = self.definitions.get(name) {
            if !self.allow_bean_definition_overriding {
                return Err(BeanDefinitionError::BeanDefinitionOverride {
                    name: name.to_string(),
                    existing: existing.bean_class_name().to_string(),
                    replacement: definition.bean_class_name().to_string(),
                });
            }
            warn!(
                "覆盖 Bean 定义 '{}': {} -> {}",
                name,
                existing.bean_class_name(),
                definition.bean_class_name()
            );
        } else {
            self.names.push(name.to_string());
        }

        debug!("注册 Bean 定义: {} ({})", name, definition.bean_class_name());
        self.definitions.insert(name.to_string(), definition);
        Ok(())
    }

    fn remove_bean_definition(&mut self, name: &str) -> Result<BeanDefinition, BeanDefinitionError> {
        let definition = self.definitions.remove(name).ok_or_else(|| {
            BeanDefinitionError::NoSuchBeanDefinition {
                name: name.to_string(),
            }
        })?;
        self.names.retain(|existing| existing != name);
        debug!("移除 Bean 定义: {}", name);
        Ok(definition)
    }

    fn get_bean_definition(&self, name: &str) -> Result<&BeanDefinition, BeanDefinitionError> {
        self.definitions
            .get(name)
            .ok_or_else(|| BeanDefinitionError::NoSuchBeanDefinition {
                name: name.to_string(),
            })
    }

    fn get_bean_definition_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut BeanDefinition, BeanDefinitionError> {
        if self.frozen {
            return Err(BeanDefinitionError::RegistryFrozen {
                name: name.to_string(),
            });
        }
        self.definitions
            .get_mut(name)
            .ok_or_else(|| BeanDefinitionError::NoSuchBeanDefinition {
                name: name.to_string(),
            })
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    fn bean_definition_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn bean_definition_count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::BeanDefinitionBuilder;

    fn definition(class: &str) -> BeanDefinition {
        BeanDefinitionBuilder::root_bean_definition(class).build()
    }

    #[test]
    fn test_register_and_lookup_preserves_order() {
        let mut registry = DefaultBeanDefinitionRegistry::new();
        registry.register_bean_definition("b", definition("B")).unwrap();
        registry.register_bean_definition("a", definition("A")).unwrap();

        assert_eq!(registry.bean_definition_names(), ["b", "a"]);
        assert_eq!(registry.get_bean_definition("a").unwrap().bean_class_name(), "A");
        assert!(registry.contains_bean_definition("b"));
        assert_eq!(registry.bean_definition_count(), 2);
    }

    #[test]
    fn test_duplicate_name_is_rejected_by_default() {
        let mut registry = DefaultBeanDefinitionRegistry::new();
        registry.register_bean_definition("hello", definition("A")).unwrap();

        let err = registry
            .register_bean_definition("hello", definition("B"))
            .unwrap_err();

        assert_eq!(
            err,
            BeanDefinitionError::BeanDefinitionOverride {
                name: "hello".to_string(),
                existing: "A".to_string(),
                replacement: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_overriding_keeps_original_position() {
        let mut registry =
            DefaultBeanDefinitionRegistry::new().with_bean_definition_overriding(true);
        registry.register_bean_definition("first", definition("A")).unwrap();
        registry.register_bean_definition("second", definition("B")).unwrap();
        registry.register_bean_definition("first", definition("C")).unwrap();

        assert_eq!(registry.bean_definition_names(), ["first", "second"]);
        assert_eq!(registry.get_bean_definition("first").unwrap().bean_class_name(), "C");
    }

    #[test]
    fn test_infrastructure_beans_are_hidden_from_application_names() {
        let mut registry = DefaultBeanDefinitionRegistry::new();
        registry.register_bean_definition("app", definition("App")).unwrap();
        registry
            .register_bean_definition(
                "internal",
                BeanDefinitionBuilder::root_bean_definition("Internal")
                    .role(BeanRole::Infrastructure)
                    .build(),
            )
            .unwrap();

        assert_eq!(registry.application_bean_names(), ["app"]);
        assert_eq!(registry.bean_definition_count(), 2);
    }

    #[test]
    fn test_frozen_registry_rejects_changes() {
        let mut registry = DefaultBeanDefinitionRegistry::new();
        registry.register_bean_definition("app", definition("App")).unwrap();
        registry.freeze_configuration();

        assert!(matches!(
            registry.register_bean_definition("late", definition("Late")),
            Err(BeanDefinitionError::RegistryFrozen { .. })
        ));
        assert!(registry.get_bean_definition_mut("app").is_err());
        assert!(registry.get_bean_definition("app").is_ok());
    }

    #[test]
    fn test_remove_and_missing_definitions() {
        let mut registry = DefaultBeanDefinitionRegistry::new();
        registry.register_bean_definition("app", definition("App")).unwrap();

        assert!(registry.remove_bean_definition("app").is_ok());
        assert!(registry.bean_definition_names().is_empty());
        assert!(matches!(
            registry.get_bean_definition("app"),
            Err(BeanDefinitionError::NoSuchBeanDefinition { .. })
        ));
        assert!(registry.register_bean_definition(" ", definition("X")).is_err());
    }
}
