//! Bean 定义模型
//!
//! 描述容器将要构建和管理的对象，不包含实例本身。

use infrastructure_common::ClassMetadata;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Bean 属性值或构造参数值
#[derive(Debug, Clone, PartialEq)]
pub enum BeanValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    StringList(Vec<String>),
    StringSet(BTreeSet<String>),
    StringMap(BTreeMap<String, String>),
    Bean(Box<BeanDefinition>),
}

impl BeanValue {
    /// 值类型名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::StringList(_) => "string-list",
            Self::StringSet(_) => "string-set",
            Self::StringMap(_) => "string-map",
            Self::Bean(_) => "bean",
        }
    }
}

impl From<bool> for BeanValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for BeanValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for BeanValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for BeanValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for BeanValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<BTreeSet<String>> for BeanValue {
    fn from(value: BTreeSet<String>) -> Self {
        Self::StringSet(value)
    }
}

impl From<BTreeMap<String, String>> for BeanValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::StringMap(value)
    }
}

impl From<BeanDefinition> for BeanValue {
    fn from(value: BeanDefinition) -> Self {
        Self::Bean(Box::new(value))
    }
}

impl<T: Into<BeanValue>> From<Option<T>> for BeanValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// 构造参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorArgumentValues {
    generic: Vec<BeanValue>,
}

impl ConstructorArgumentValues {
    /// 添加通用构造参数
    pub fn add_generic_argument_value(&mut self, value: impl Into<BeanValue>) {
        self.generic.push(value.into());
    }

    /// 获取第一个字符串集合类型的参数
    pub fn generic_string_set(&self) -> Option<&BTreeSet<String>> {
        self.generic.iter().find_map(|value| match value {
            BeanValue::StringSet(set) => Some(set),
            _ => None,
        })
    }

    /// 获取第一个字符串集合类型的参数（可变）
    pub fn generic_string_set_mut(&mut self) -> Option<&mut BTreeSet<String>> {
        self.generic.iter_mut().find_map(|value| match value {
            BeanValue::StringSet(set) => Some(set),
            _ => None,
        })
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.generic.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.generic.is_empty()
    }
}

/// 属性值集合，保持添加顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    values: Vec<(String, BeanValue)>,
}

impl PropertyValues {
    /// 添加或替换属性
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<BeanValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    /// 获取属性
    pub fn get(&self, name: &str) -> Option<&BeanValue> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// 是否包含属性
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 遍历属性
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BeanValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bean 角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BeanRole {
    /// 应用定义的 Bean
    #[default]
    Application,
    /// 较大配置中的支撑部分
    Support,
    /// 容器内部基础设施，不出现在常规 Bean 列表中
    Infrastructure,
}

/// Bean 定义来源
#[derive(Debug, Clone, PartialEq)]
pub enum BeanDefinitionOrigin {
    /// 通过注解扫描发现
    Scanned(Arc<ClassMetadata>),
    /// 手工声明
    Manual,
}

/// Bean 定义
#[derive(Debug, Clone, PartialEq)]
pub struct BeanDefinition {
    bean_class_name: String,
    role: BeanRole,
    origin: BeanDefinitionOrigin,
    description: Option<String>,
    constructor_arguments: ConstructorArgumentValues,
    property_values: PropertyValues,
}

impl BeanDefinition {
    /// 创建手工声明的 Bean 定义
    pub fn new(bean_class_name: impl Into<String>) -> Self {
        Self {
            bean_class_name: bean_class_name.into(),
            role: BeanRole::Application,
            origin: BeanDefinitionOrigin::Manual,
            description: None,
            constructor_arguments: ConstructorArgumentValues::default(),
            property_values: PropertyValues::default(),
        }
    }

    /// 创建扫描得到的 Bean 定义
    pub fn scanned(metadata: Arc<ClassMetadata>) -> Self {
        let mut definition = Self::new(metadata.type_name.clone());
        definition.origin = BeanDefinitionOrigin::Scanned(metadata);
        definition
    }

    /// Bean 类型名称
    pub fn bean_class_name(&self) -> &str {
        &self.bean_class_name
    }

    /// Bean 角色
    pub fn role(&self) -> BeanRole {
        self.role
    }

    /// 设置 Bean 角色
    pub fn set_role(&mut self, role: BeanRole) {
        self.role = role;
    }

    /// 定义来源
    pub fn origin(&self) -> &BeanDefinitionOrigin {
        &self.origin
    }

    /// 设置定义来源
    pub fn set_origin(&mut self, origin: BeanDefinitionOrigin) {
        self.origin = origin;
    }

    /// 扫描得到的类元数据，非扫描来源返回 `None`
    pub fn scanned_metadata(&self) -> Option<&Arc<ClassMetadata>> {
        match &self.origin {
            BeanDefinitionOrigin::Scanned(metadata) => Some(metadata),
            _ => None,
        }
    }

    /// 描述
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 设置描述
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// 构造参数
    pub fn constructor_argument_values(&self) -> &ConstructorArgumentValues {
        &self.constructor_arguments
    }

    /// 构造参数（可变）
    pub fn constructor_argument_values_mut(&mut self) -> &mut ConstructorArgumentValues {
        &mut self.constructor_arguments
    }

    /// 属性值
    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    /// 属性值（可变）
    pub fn property_values_mut(&mut self) -> &mut PropertyValues {
        &mut self.property_values
    }
}

/// Bean 定义构建器
#[derive(Debug, Clone)]
pub struct BeanDefinitionBuilder {
    definition: BeanDefinition,
}

impl BeanDefinitionBuilder {
    /// 以指定类型创建根 Bean 定义
    pub fn root_bean_definition(bean_class_name: impl Into<String>) -> Self {
        Self {
            definition: BeanDefinition::new(bean_class_name),
        }
    }

    /// 添加属性值
    pub fn add_property_value(mut self, name: impl Into<String>, value: impl Into<BeanValue>) -> Self {
        self.definition.property_values.add(name, value);
        self
    }

    /// 添加构造参数
    pub fn add_constructor_arg_value(mut self, value: impl Into<BeanValue>) -> Self {
        self.definition
            .constructor_arguments
            .add_generic_argument_value(value);
        self
    }

    /// 设置角色
    pub fn role(mut self, role: BeanRole) -> Self {
        self.definition.role = role;
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = Some(description.into());
        self
    }

    /// 构建 Bean 定义
    pub fn build(self) -> BeanDefinition {
        self.definition
    }
}
