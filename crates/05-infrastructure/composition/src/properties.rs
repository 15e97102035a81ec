//! 应用配置
//!
//! 使用 `config` crate 从 TOML/JSON 文件和环境变量加载 [`ApplicationProperties`]。
//! 后添加的配置源覆盖先添加的配置源。

use di_abstractions::{Environment, WebApplicationType};
use infrastructure_common::{ComponentError, ConfigError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// 环境变量默认前缀
pub const DEFAULT_ENV_PREFIX: &str = "LORN";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 配置源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// TOML 文件
    Toml(PathBuf),
    /// JSON 文件
    Json(PathBuf),
    /// 带前缀的环境变量
    Environment { prefix: String },
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicationProperties {
    /// 启动相关配置
    pub main: MainProperties,
    /// Servlet 相关配置
    pub servlet: ServletProperties,
    /// 复制到运行环境中的属性，可用于占位符解析
    pub properties: BTreeMap<String, String>,
}

/// 启动相关配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MainProperties {
    /// `servlet` 或 `none`
    pub web_application_type: String,
    /// 是否允许同名 Bean 定义覆盖
    pub allow_bean_definition_overriding: bool,
}

impl Default for MainProperties {
    fn default() -> Self {
        Self {
            web_application_type: "servlet".to_string(),
            allow_bean_definition_overriding: false,
        }
    }
}

/// Servlet 相关配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServletProperties {
    /// 组件扫描配置
    pub component_scan: ComponentScanProperties,
}

/// 组件扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComponentScanProperties {
    /// 是否启用 Servlet 组件扫描
    pub enabled: bool,
    /// 配置类之外额外扫描的包
    pub base_packages: Vec<String>,
}

impl Default for ComponentScanProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            base_packages: Vec::new(),
        }
    }
}

impl ApplicationProperties {
    /// 按顺序合并配置源并绑定
    pub fn load(sources: &[ConfigSource]) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        for source in sources {
            builder = match source {
                ConfigSource::Toml(path) => {
                    ensure_exists(path)?;
                    debug!("加载 TOML 配置文件: {}", path.display());
                    builder.add_source(
                        config::File::from(path.as_path()).format(config::FileFormat::Toml),
                    )
                }
                ConfigSource::Json(path) => {
                    ensure_exists(path)?;
                    debug!("加载 JSON 配置文件: {}", path.display());
                    builder.add_source(
                        config::File::from(path.as_path()).format(config::FileFormat::Json),
                    )
                }
                ConfigSource::Environment { prefix } => {
                    debug!("加载环境变量配置，前缀: {}", prefix);
                    builder.add_source(
                        config::Environment::with_prefix(prefix)
                            .separator(ENV_SEPARATOR)
                            .try_parsing(true)
                            .list_separator(",")
                            .with_list_parse_key("servlet.component_scan.base_packages"),
                    )
                }
            };
        }

        let properties = builder
            .build()
            .and_then(|settings| settings.try_deserialize::<Self>())
            .map_err(|e| {
                error!("应用配置绑定失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        info!("应用配置加载完成，配置源数量: {}", sources.len());
        Ok(properties)
    }

    /// 解析 Web 应用类型
    pub fn web_application_type(&self) -> Result<WebApplicationType, ComponentError> {
        self.main.web_application_type.parse()
    }

    /// 创建包含全部自由属性的运行环境
    pub fn environment(&self) -> Environment {
        let mut environment = Environment::new();
        for (key, value) in &self.properties {
            environment.set_property(key.clone(), value.clone());
        }
        environment
    }
}

fn ensure_exists(path: &std::path::Path) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}
