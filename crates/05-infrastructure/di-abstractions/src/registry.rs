//! Bean 定义注册表抽象接口

use crate::bean_definition::BeanDefinition;
use infrastructure_common::BeanDefinitionError;

/// Bean 定义注册表 trait
///
/// 以名称为键保存 Bean 定义，是启动期间唯一的共享可变资源。
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 注册 Bean 定义
    fn register_bean_definition(
        &mut self,
        name: &str,
        definition: BeanDefinition,
    ) -> Result<(), BeanDefinitionError>;

    /// 移除 Bean 定义
    fn remove_bean_definition(&mut self, name: &str) -> Result<BeanDefinition, BeanDefinitionError>;

    /// 获取 Bean 定义
    fn get_bean_definition(&self, name: &str) -> Result<&BeanDefinition, BeanDefinitionError>;

    /// 获取可修改的 Bean 定义
    fn get_bean_definition_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut BeanDefinition, BeanDefinitionError>;

    /// 检查是否包含指定名称的 Bean 定义
    fn contains_bean_definition(&self, name: &str) -> bool;

    /// 按注册顺序获取全部 Bean 名称
    fn bean_definition_names(&self) -> Vec<String>;

    /// Bean 定义数量
    fn bean_definition_count(&self) -> usize {
        self.bean_definition_names().len()
    }
}
