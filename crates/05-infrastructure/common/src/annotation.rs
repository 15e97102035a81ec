//! 注解元数据
//!
//! 编译期宏把属性参数转换为 [`AnnotationAttributes`]，处理器在启动期间按类型读取。

use crate::errors::ComponentError;
use crate::metadata::TypeInfo;
use std::collections::BTreeMap;

/// Servlet 注解类型
pub const WEB_SERVLET: &str = "WebServlet";
/// Filter 注解类型
pub const WEB_FILTER: &str = "WebFilter";
/// Listener 注解类型
pub const WEB_LISTENER: &str = "WebListener";
/// 文件上传配置注解类型
pub const MULTIPART_CONFIG: &str = "MultipartConfig";
/// Servlet 组件扫描注解类型
pub const SERVLET_COMPONENT_SCAN: &str = "ServletComponentScan";

/// 注解属性值
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    StringArray(Vec<String>),
    Int(i64),
    Bool(bool),
    Types(Vec<TypeInfo>),
    Annotation(AnnotationAttributes),
    AnnotationArray(Vec<AnnotationAttributes>),
}

impl AttributeValue {
    /// 属性值类型名称，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::StringArray(_) => "string[]",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Types(_) => "type[]",
            Self::Annotation(_) => "annotation",
            Self::AnnotationArray(_) => "annotation[]",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringArray(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// 注解属性集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationAttributes {
    values: BTreeMap<String, AttributeValue>,
}

/// 属性访问失败的原因，由调用方补充类型和注解信息后转换为 [`ComponentError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    pub attribute: String,
    pub message: String,
}

impl AttributeError {
    /// 转换为组件错误
    pub fn into_component_error(self, type_name: &str, annotation: &str) -> ComponentError {
        ComponentError::invalid_annotation(
            type_name,
            annotation,
            format!("属性 '{}': {}", self.attribute, self.message),
        )
    }
}

impl AnnotationAttributes {
    /// 创建空的属性集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加属性
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// 插入属性
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// 获取原始属性值
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// 是否包含属性
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&AttributeValue, AttributeError> {
        self.values.get(name).ok_or_else(|| AttributeError {
            attribute: name.to_string(),
            message: "缺少必需属性".to_string(),
        })
    }

    fn mismatch(name: &str, expected: &str, actual: &AttributeValue) -> AttributeError {
        AttributeError {
            attribute: name.to_string(),
            message: format!("期望 {} 类型，实际为 {}", expected, actual.kind()),
        }
    }

    /// 获取字符串属性
    pub fn get_string(&self, name: &str) -> Result<&str, AttributeError> {
        match self.require(name)? {
            AttributeValue::String(value) => Ok(value),
            other => Err(Self::mismatch(name, "string", other)),
        }
    }

    /// 获取字符串属性，空字符串视为未设置
    pub fn get_text(&self, name: &str) -> Result<Option<&str>, AttributeError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(AttributeValue::String(value)) if value.trim().is_empty() => Ok(None),
            Some(AttributeValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(Self::mismatch(name, "string", other)),
        }
    }

    /// 获取字符串数组属性
    pub fn get_string_array(&self, name: &str) -> Result<&[String], AttributeError> {
        match self.require(name)? {
            AttributeValue::StringArray(values) => Ok(values),
            other => Err(Self::mismatch(name, "string[]", other)),
        }
    }

    /// 获取字符串数组属性，缺失时返回空数组
    pub fn string_array_or_empty(&self, name: &str) -> Result<&[String], AttributeError> {
        if self.contains(name) {
            self.get_string_array(name)
        } else {
            Ok(&[])
        }
    }

    /// 获取整数属性
    pub fn get_int(&self, name: &str) -> Result<i64, AttributeError> {
        match self.require(name)? {
            AttributeValue::Int(value) => Ok(*value),
            other => Err(Self::mismatch(name, "int", other)),
        }
    }

    /// 获取整数属性，缺失时返回默认值
    pub fn int_or(&self, name: &str, default: i64) -> Result<i64, AttributeError> {
        if self.contains(name) {
            self.get_int(name)
        } else {
            Ok(default)
        }
    }

    /// 获取布尔属性
    pub fn get_bool(&self, name: &str) -> Result<bool, AttributeError> {
        match self.require(name)? {
            AttributeValue::Bool(value) => Ok(*value),
            other => Err(Self::mismatch(name, "bool", other)),
        }
    }

    /// 获取布尔属性，缺失时返回默认值
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, AttributeError> {
        if self.contains(name) {
            self.get_bool(name)
        } else {
            Ok(default)
        }
    }

    /// 获取类型数组属性，缺失时返回空数组
    pub fn types_or_empty(&self, name: &str) -> Result<&[TypeInfo], AttributeError> {
        match self.values.get(name) {
            None => Ok(&[]),
            Some(AttributeValue::Types(types)) => Ok(types),
            Some(other) => Err(Self::mismatch(name, "type[]", other)),
        }
    }

    /// 获取嵌套注解数组属性，缺失时返回空数组
    pub fn annotations_or_empty(&self, name: &str) -> Result<&[AnnotationAttributes], AttributeError> {
        match self.values.get(name) {
            None => Ok(&[]),
            Some(AttributeValue::AnnotationArray(values)) => Ok(values),
            Some(other) => Err(Self::mismatch(name, "annotation[]", other)),
        }
    }
}

/// 注解元数据
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMetadata {
    /// 注解类型
    pub annotation_type: String,
    /// 注解属性
    pub attributes: AnnotationAttributes,
}

impl AnnotationMetadata {
    /// 创建注解元数据
    pub fn new(annotation_type: impl Into<String>, attributes: AnnotationAttributes) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let attributes = AnnotationAttributes::new()
            .with("name", "hello")
            .with("url_patterns", vec!["/hello".to_string()])
            .with("load_on_startup", 1_i64)
            .with("async_supported", true);

        assert_eq!(attributes.get_string("name").unwrap(), "hello");
        assert_eq!(attributes.get_string_array("url_patterns").unwrap(), ["/hello"]);
        assert_eq!(attributes.get_int("load_on_startup").unwrap(), 1);
        assert!(attributes.get_bool("async_supported").unwrap());
    }

    #[test]
    fn test_missing_and_mismatched_attributes() {
        let attributes = AnnotationAttributes::new().with("name", 42_i64);

        let missing = attributes.get_string("other").unwrap_err();
        assert_eq!(missing.attribute, "other");

        let mismatch = attributes.get_string("name").unwrap_err();
        assert!(mismatch.message.contains("int"));
        assert!(attributes.get_text("name").is_err());
    }

    #[test]
    fn test_defaults_for_absent_attributes() {
        let attributes = AnnotationAttributes::new().with("name", "  ");

        assert!(attributes.string_array_or_empty("value").unwrap().is_empty());
        assert_eq!(attributes.int_or("load_on_startup", -1).unwrap(), -1);
        assert!(!attributes.bool_or("async_supported", false).unwrap());
        assert_eq!(attributes.get_text("name").unwrap(), None);
        assert!(attributes.types_or_empty("base_package_classes").unwrap().is_empty());
    }
}
