//! 组件注册 Bean
//!
//! 处理器把扫描到的 Servlet、Filter、Listener 转换为注册 Bean 定义，内嵌 Web 服务器启动时
//! 再通过 `TryFrom<&BeanDefinition>` 还原为类型化的注册信息并完成绑定。

use di_abstractions::{BeanDefinition, BeanDefinitionBuilder, BeanValue};
use infrastructure_common::BeanDefinitionError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 注册 Bean 的属性名称
pub mod properties {
    pub const ASYNC_SUPPORTED: &str = "async_supported";
    pub const INIT_PARAMETERS: &str = "init_parameters";
    pub const LOAD_ON_STARTUP: &str = "load_on_startup";
    pub const NAME: &str = "name";
    pub const SERVLET: &str = "servlet";
    pub const URL_MAPPINGS: &str = "url_mappings";
    pub const MULTIPART_CONFIG: &str = "multipart_config";
    pub const FILTER: &str = "filter";
    pub const URL_PATTERNS: &str = "url_patterns";
    pub const SERVLET_NAMES: &str = "servlet_names";
    pub const DISPATCHER_TYPES: &str = "dispatcher_types";
    pub const LISTENER: &str = "listener";
    pub const LOCATION: &str = "location";
    pub const MAX_FILE_SIZE: &str = "max_file_size";
    pub const MAX_REQUEST_SIZE: &str = "max_request_size";
    pub const FILE_SIZE_THRESHOLD: &str = "file_size_threshold";
}

/// 请求分发类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DispatcherType {
    Forward,
    Include,
    Request,
    Async,
    Error,
}

impl DispatcherType {
    /// 全部分发类型
    pub const ALL: [Self; 5] = [
        Self::Forward,
        Self::Include,
        Self::Request,
        Self::Async,
        Self::Error,
    ];

    /// 分发类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "FORWARD",
            Self::Include => "INCLUDE",
            Self::Request => "REQUEST",
            Self::Async => "ASYNC",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for DispatcherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知的分发类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的分发类型: {value}")]
pub struct UnknownDispatcherType {
    pub value: String,
}

impl FromStr for DispatcherType {
    type Err = UnknownDispatcherType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dispatcher_type| dispatcher_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDispatcherType {
                value: s.to_string(),
            })
    }
}

/// 文件上传配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartConfigElement {
    /// 临时文件目录
    pub location: String,
    /// 单个文件最大字节数，-1 表示不限制
    pub max_file_size: i64,
    /// 请求最大字节数，-1 表示不限制
    pub max_request_size: i64,
    /// 超过该字节数后写入磁盘
    pub file_size_threshold: i64,
}

impl MultipartConfigElement {
    /// Bean 类型名称
    pub const BEAN_CLASS_NAME: &'static str = concat!(module_path!(), "::MultipartConfigElement");

    /// 创建只指定目录的配置
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// 转换为 Bean 定义
    pub fn into_bean_definition(self) -> BeanDefinition {
        BeanDefinitionBuilder::root_bean_definition(Self::BEAN_CLASS_NAME)
            .add_property_value(properties::LOCATION, self.location)
            .add_property_value(properties::MAX_FILE_SIZE, self.max_file_size)
            .add_property_value(properties::MAX_REQUEST_SIZE, self.max_request_size)
            .add_property_value(properties::FILE_SIZE_THRESHOLD, self.file_size_threshold)
            .build()
    }
}

impl Default for MultipartConfigElement {
    fn default() -> Self {
        Self {
            location: String::new(),
            max_file_size: -1,
            max_request_size: -1,
            file_size_threshold: 0,
        }
    }
}

impl TryFrom<&BeanDefinition> for MultipartConfigElement {
    type Error = BeanDefinitionError;

    fn try_from(definition: &BeanDefinition) -> Result<Self, Self::Error> {
        let reader = PropertyReader::expect(definition, Self::BEAN_CLASS_NAME)?;
        Ok(Self {
            location: reader.string(properties::LOCATION)?,
            max_file_size: reader.int(properties::MAX_FILE_SIZE)?,
            max_request_size: reader.int(properties::MAX_REQUEST_SIZE)?,
            file_size_threshold: reader.int(properties::FILE_SIZE_THRESHOLD)?,
        })
    }
}

/// Servlet 注册 Bean
#[derive(Debug, Clone, PartialEq)]
pub struct ServletRegistrationBean {
    /// Servlet 名称
    pub name: String,
    /// Servlet 自身的 Bean 定义
    pub servlet: BeanDefinition,
    /// URL 映射
    pub url_mappings: Vec<String>,
    /// 初始化参数
    pub init_parameters: BTreeMap<String, String>,
    /// 启动加载顺序，负数表示首次请求时加载
    pub load_on_startup: i64,
    /// 是否支持异步
    pub async_supported: bool,
    /// 文件上传配置
    pub multipart_config: Option<MultipartConfigElement>,
}

impl ServletRegistrationBean {
    /// Bean 类型名称
    pub const BEAN_CLASS_NAME: &'static str = concat!(module_path!(), "::ServletRegistrationBean");

    /// 以默认设置创建注册信息
    pub fn new(name: impl Into<String>, servlet: BeanDefinition) -> Self {
        Self {
            name: name.into(),
            servlet,
            url_mappings: Vec::new(),
            init_parameters: BTreeMap::new(),
            load_on_startup: -1,
            async_supported: false,
            multipart_config: None,
        }
    }

    /// Servlet 类型名称
    pub fn servlet_class_name(&self) -> &str {
        self.servlet.bean_class_name()
    }

    /// 转换为 Bean 定义
    pub fn into_bean_definition(self) -> BeanDefinition {
        BeanDefinitionBuilder::root_bean_definition(Self::BEAN_CLASS_NAME)
            .add_property_value(properties::ASYNC_SUPPORTED, self.async_supported)
            .add_property_value(properties::INIT_PARAMETERS, self.init_parameters)
            .add_property_value(properties::LOAD_ON_STARTUP, self.load_on_startup)
            .add_property_value(properties::NAME, self.name)
            .add_property_value(properties::SERVLET, self.servlet)
            .add_property_value(properties::URL_MAPPINGS, self.url_mappings)
            .add_property_value(
                properties::MULTIPART_CONFIG,
                self.multipart_config
                    .map(MultipartConfigElement::into_bean_definition),
            )
            .build()
    }
}

impl TryFrom<&BeanDefinition> for ServletRegistrationBean {
    type Error = BeanDefinitionError;

    fn try_from(definition: &BeanDefinition) -> Result<Self, Self::Error> {
        let reader = PropertyReader::expect(definition, Self::BEAN_CLASS_NAME)?;
        let multipart_config = reader
            .optional_bean(properties::MULTIPART_CONFIG)?
            .map(MultipartConfigElement::try_from)
            .transpose()?;

        Ok(Self {
            name: reader.string(properties::NAME)?,
            servlet: reader.bean(properties::SERVLET)?.clone(),
            url_mappings: reader.string_list(properties::URL_MAPPINGS)?,
            init_parameters: reader.string_map(properties::INIT_PARAMETERS)?,
            load_on_startup: reader.int(properties::LOAD_ON_STARTUP)?,
            async_supported: reader.bool(properties::ASYNC_SUPPORTED)?,
            multipart_config,
        })
    }
}

/// Filter 注册 Bean
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRegistrationBean {
    /// Filter 名称
    pub name: String,
    /// Filter 自身的 Bean 定义
    pub filter: BeanDefinition,
    /// URL 匹配模式
    pub url_patterns: Vec<String>,
    /// 作用的 Servlet 名称
    pub servlet_names: Vec<String>,
    /// 分发类型
    pub dispatcher_types: BTreeSet<DispatcherType>,
    /// 初始化参数
    pub init_parameters: BTreeMap<String, String>,
    /// 是否支持异步
    pub async_supported: bool,
}

impl FilterRegistrationBean {
    /// Bean 类型名称
    pub const BEAN_CLASS_NAME: &'static str = concat!(module_path!(), "::FilterRegistrationBean");

    /// 以默认设置创建注册信息，分发类型默认为 REQUEST
    pub fn new(name: impl Into<String>, filter: BeanDefinition) -> Self {
        Self {
            name: name.into(),
            filter,
            url_patterns: Vec::new(),
            servlet_names: Vec::new(),
            dispatcher_types: BTreeSet::from([DispatcherType::Request]),
            init_parameters: BTreeMap::new(),
            async_supported: false,
        }
    }

    /// Filter 类型名称
    pub fn filter_class_name(&self) -> &str {
        self.filter.bean_class_name()
    }

    /// 转换为 Bean 定义
    pub fn into_bean_definition(self) -> BeanDefinition {
        let dispatcher_types: Vec<String> = self
            .dispatcher_types
            .iter()
            .map(|dispatcher_type| dispatcher_type.as_str().to_string())
            .collect();

        BeanDefinitionBuilder::root_bean_definition(Self::BEAN_CLASS_NAME)
            .add_property_value(properties::ASYNC_SUPPORTED, self.async_supported)
            .add_property_value(properties::DISPATCHER_TYPES, dispatcher_types)
            .add_property_value(properties::FILTER, self.filter)
            .add_property_value(properties::INIT_PARAMETERS, self.init_parameters)
            .add_property_value(properties::NAME, self.name)
            .add_property_value(properties::SERVLET_NAMES, self.servlet_names)
            .add_property_value(properties::URL_PATTERNS, self.url_patterns)
            .build()
    }
}

impl TryFrom<&BeanDefinition> for FilterRegistrationBean {
    type Error = BeanDefinitionError;

    fn try_from(definition: &BeanDefinition) -> Result<Self, Self::Error> {
        let reader = PropertyReader::expect(definition, Self::BEAN_CLASS_NAME)?;
        let dispatcher_types = reader
            .string_list(properties::DISPATCHER_TYPES)?
            .iter()
            .map(|value| value.parse::<DispatcherType>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|err| reader.invalid(err.to_string()))?;

        Ok(Self {
            name: reader.string(properties::NAME)?,
            filter: reader.bean(properties::FILTER)?.clone(),
            url_patterns: reader.string_list(properties::URL_PATTERNS)?,
            servlet_names: reader.string_list(properties::SERVLET_NAMES)?,
            dispatcher_types,
            init_parameters: reader.string_map(properties::INIT_PARAMETERS)?,
            async_supported: reader.bool(properties::ASYNC_SUPPORTED)?,
        })
    }
}

/// Listener 注册 Bean
#[derive(Debug, Clone, PartialEq)]
pub struct ServletListenerRegistrationBean {
    /// Listener 自身的 Bean 定义
    pub listener: BeanDefinition,
}

impl ServletListenerRegistrationBean {
    /// Bean 类型名称
    pub const BEAN_CLASS_NAME: &'static str =
        concat!(module_path!(), "::ServletListenerRegistrationBean");

    /// 创建注册信息
    pub fn new(listener: BeanDefinition) -> Self {
        Self { listener }
    }

    /// Listener 类型名称
    pub fn listener_class_name(&self) -> &str {
        self.listener.bean_class_name()
    }

    /// 转换为 Bean 定义
    pub fn into_bean_definition(self) -> BeanDefinition {
        BeanDefinitionBuilder::root_bean_definition(Self::BEAN_CLASS_NAME)
            .add_property_value(properties::LISTENER, self.listener)
            .build()
    }
}

impl TryFrom<&BeanDefinition> for ServletListenerRegistrationBean {
    type Error = BeanDefinitionError;

    fn try_from(definition: &BeanDefinition) -> Result<Self, Self::Error> {
        let reader = PropertyReader::expect(definition, Self::BEAN_CLASS_NAME)?;
        Ok(Self {
            listener: reader.bean(properties::LISTENER)?.clone(),
        })
    }
}

/// 按名称读取并校验属性值
struct PropertyReader<'a> {
    definition: &'a BeanDefinition,
}

impl<'a> PropertyReader<'a> {
    fn expect(definition: &'a BeanDefinition, bean_class_name: &str) -> Result<Self, BeanDefinitionError> {
        let reader = Self { definition };
        if definition.bean_class_name() != bean_class_name {
            return Err(reader.invalid(format!("期望 {} 类型", bean_class_name)));
        }
        Ok(reader)
    }

    fn invalid(&self, message: impl Into<String>) -> BeanDefinitionError {
        BeanDefinitionError::invalid(self.definition.bean_class_name(), message)
    }

    fn value(&self, name: &str) -> Result<&'a BeanValue, BeanDefinitionError> {
        self.definition
            .property_values()
            .get(name)
            .ok_or_else(|| self.invalid(format!("缺少属性 '{}'", name)))
    }

    fn mismatch(&self, name: &str, expected: &str, actual: &BeanValue) -> BeanDefinitionError {
        self.invalid(format!(
            "属性 '{}' 期望 {} 类型，实际为 {}",
            name,
            expected,
            actual.kind()
        ))
    }

    fn string(&self, name: &str) -> Result<String, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::String(value) => Ok(value.clone()),
            other => Err(self.mismatch(name, "string", other)),
        }
    }

    fn int(&self, name: &str) -> Result<i64, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::Int(value) => Ok(*value),
            other => Err(self.mismatch(name, "int", other)),
        }
    }

    fn bool(&self, name: &str) -> Result<bool, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::Bool(value) => Ok(*value),
            other => Err(self.mismatch(name, "bool", other)),
        }
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::StringList(values) => Ok(values.clone()),
            other => Err(self.mismatch(name, "string-list", other)),
        }
    }

    fn string_map(&self, name: &str) -> Result<BTreeMap<String, String>, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::StringMap(values) => Ok(values.clone()),
            other => Err(self.mismatch(name, "string-map", other)),
        }
    }

    fn bean(&self, name: &str) -> Result<&'a BeanDefinition, BeanDefinitionError> {
        match self.value(name)? {
            BeanValue::Bean(definition) => Ok(&**definition),
            other => Err(self.mismatch(name, "bean", other)),
        }
    }

    fn optional_bean(&self, name: &str) -> Result<Option<&'a BeanDefinition>, BeanDefinitionError> {
        match self.definition.property_values().get(name) {
            None | Some(BeanValue::Null) => Ok(None),
            Some(BeanValue::Bean(definition)) => Ok(Some(&**definition)),
            Some(other) => Err(self.mismatch(name, "bean", other)),
        }
    }
}
