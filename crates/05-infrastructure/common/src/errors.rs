//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("无法解析占位符 '{placeholder}'，值: \"{value}\"")]
    UnresolvablePlaceholder { placeholder: String, value: String },
}

/// Bean 定义注册表错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeanDefinitionError {
    #[error("Bean 定义不存在: {name}")]
    NoSuchBeanDefinition { name: String },

    #[error("Bean 定义 '{name}' 已存在 ({existing})，不允许被 {replacement} 覆盖")]
    BeanDefinitionOverride {
        name: String,
        existing: String,
        replacement: String,
    },

    #[error("Bean 定义无效: {name}, 原因: {message}")]
    InvalidBeanDefinition { name: String, message: String },

    #[error("注册表已冻结，无法注册 Bean 定义: {name}")]
    RegistryFrozen { name: String },
}

impl BeanDefinitionError {
    /// 创建无效定义错误
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBeanDefinition {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("注解属性无效: {type_name} 上的 @{annotation}, 原因: {message}")]
    InvalidAnnotation {
        type_name: String,
        annotation: String,
        message: String,
    },

    #[error("组件注册失败: {source}")]
    Registration {
        #[from]
        source: BeanDefinitionError,
    },

    #[error("组件配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }

    /// 创建注解属性错误
    pub fn invalid_annotation(
        type_name: impl Into<String>,
        annotation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAnnotation {
            type_name: type_name.into(),
            annotation: annotation.into(),
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("Bean 定义错误: {source}")]
    BeanDefinitionError {
        #[from]
        source: BeanDefinitionError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("应用上下文 {context_id} 不支持重复刷新")]
    AlreadyRefreshed { context_id: String },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}
