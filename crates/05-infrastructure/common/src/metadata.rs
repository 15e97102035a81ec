//! 元数据定义
//!
//! 提供类型、注解和类元数据信息，替代运行时反射

use crate::annotation::{AnnotationAttributes, AnnotationMetadata};
use std::any::TypeId;

/// 模块路径分隔符
pub const PATH_SEPARATOR: &str = "::";

/// 获取类型名称所在的包（模块路径）
///
/// 泛型参数不参与计算，`a::b::C<x::Y>` 的包为 `a::b`；没有模块路径时返回空字符串。
pub fn package_of(type_name: &str) -> &str {
    let base = strip_generics(type_name);
    base.rsplit_once(PATH_SEPARATOR)
        .map(|(package, _)| package)
        .unwrap_or("")
}

/// 获取不含模块路径和泛型参数的简短类型名称
pub fn short_name_of(type_name: &str) -> &str {
    let base = strip_generics(type_name);
    base.rsplit_once(PATH_SEPARATOR)
        .map(|(_, name)| name)
        .unwrap_or(base)
}

fn strip_generics(type_name: &str) -> &str {
    type_name
        .find('<')
        .map_or(type_name, |index| &type_name[..index])
}

/// 判断模块路径是否位于指定包内（包含子包）
pub fn is_in_package(module_path: &str, package: &str) -> bool {
    if package.is_empty() || module_path == package {
        return true;
    }
    module_path
        .strip_prefix(package)
        .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        let name = std::any::type_name::<T>();
        Self {
            name: name.to_string(),
            id: TypeId::of::<T>(),
            module_path: package_of(name).to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        short_name_of(&self.name)
    }

    /// 获取类型所在的包
    pub fn package_name(&self) -> &str {
        &self.module_path
    }
}

/// 类元数据
///
/// 由编译期宏生成，携带类型身份和类型上声明的全部注解。
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    /// 完整类型名称
    pub type_name: String,
    /// 模块路径
    pub module_path: String,
    /// 简短类型名称
    pub simple_name: String,
    /// 类型上的注解
    pub annotations: Vec<AnnotationMetadata>,
}

impl ClassMetadata {
    /// 根据完整类型名称创建类元数据
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            module_path: package_of(&type_name).to_string(),
            simple_name: short_name_of(&type_name).to_string(),
            type_name,
            annotations: Vec::new(),
        }
    }

    /// 从类型创建类元数据
    pub fn of<T: 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// 添加注解
    pub fn with_annotation(mut self, annotation: AnnotationMetadata) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 是否声明了指定注解
    pub fn has_annotation(&self, annotation_type: &str) -> bool {
        self.annotations
            .iter()
            .any(|annotation| annotation.annotation_type == annotation_type)
    }

    /// 获取指定注解的属性
    pub fn annotation_attributes(&self, annotation_type: &str) -> Option<&AnnotationAttributes> {
        self.annotations
            .iter()
            .find(|annotation| annotation.annotation_type == annotation_type)
            .map(|annotation| &annotation.attributes)
    }

    /// 获取类型所在的包
    pub fn package_name(&self) -> &str {
        &self.module_path
    }
}

/// 带注解的类型
///
/// 由 `component-macros` 中的属性宏实现。
pub trait AnnotatedType {
    /// 获取类型的类元数据
    fn class_metadata() -> ClassMetadata;
}
