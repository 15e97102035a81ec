//! Web 应用构建器

use crate::application::WebApplication;
use crate::properties::{ApplicationProperties, ConfigSource};
use di_abstractions::{BeanDefinition, BeanDefinitionRegistry, ServletContext};
use di_impl::{DefaultBeanDefinitionRegistry, GenericWebApplicationContext};
use infrastructure_common::{
    global_candidate_index, AnnotatedType, CandidateIndex, ClassMetadata, InfrastructureError,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use web_servlet::{enable_servlet_component_scan, ServletComponentScanBuilder};

/// Web 应用构建器
///
/// 使用建造者模式加载配置、导入配置类并刷新应用上下文
pub struct WebApplicationBuilder {
    /// 配置源列表
    config_sources: Vec<ConfigSource>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
    /// 待导入的配置类
    configurations: Vec<ClassMetadata>,
    /// 外部容器提供的 Servlet 上下文
    servlet_context: Option<ServletContext>,
    /// 候选组件索引，默认使用全局索引
    candidate_index: Option<Arc<CandidateIndex>>,
    /// 手工注册的 Bean 定义
    bean_definitions: Vec<(String, BeanDefinition)>,
}

impl WebApplicationBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
            configurations: Vec::new(),
            servlet_context: None,
            candidate_index: None,
            bean_definitions: Vec::new(),
        }
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 TOML 配置文件: {}", path.display());
        self.config_sources.push(ConfigSource::Toml(path.to_path_buf()));
        Ok(self)
    }

    /// 添加 JSON 配置文件
    pub fn add_config_json<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 JSON 配置文件: {}", path.display());
        self.config_sources.push(ConfigSource::Json(path.to_path_buf()));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_sources.push(ConfigSource::Environment { prefix });
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 添加配置类
    pub fn with_configuration<T: AnnotatedType>(self) -> Self {
        self.with_configuration_metadata(T::class_metadata())
    }

    /// 添加配置类元数据
    pub fn with_configuration_metadata(mut self, configuration: ClassMetadata) -> Self {
        debug!("添加配置类: {}", configuration.type_name);
        self.configurations.push(configuration);
        self
    }

    /// 绑定外部容器的 Servlet 上下文
    pub fn with_servlet_context(mut self, servlet_context: ServletContext) -> Self {
        self.servlet_context = Some(servlet_context);
        self
    }

    /// 使用指定的候选组件索引
    pub fn with_candidate_index(mut self, candidate_index: Arc<CandidateIndex>) -> Self {
        self.candidate_index = Some(candidate_index);
        self
    }

    /// 手工注册 Bean 定义
    pub fn with_bean_definition(mut self, name: impl Into<String>, definition: BeanDefinition) -> Self {
        self.bean_definitions.push((name.into(), definition));
        self
    }

    /// 构建并刷新 Web 应用
    pub fn build(self) -> Result<WebApplication, InfrastructureError> {
        info!("开始构建 Web 应用");

        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging();
        }

        let properties = ApplicationProperties::load(&self.config_sources)?;
        let registry = DefaultBeanDefinitionRegistry::new()
            .with_bean_definition_overriding(properties.main.allow_bean_definition_overriding);
        let mut context = GenericWebApplicationContext::new()
            .with_environment(properties.environment())
            .with_web_application_type(properties.web_application_type()?)
            .with_registry(registry);
        if let Some(servlet_context) = self.servlet_context {
            context = context.with_servlet_context(servlet_context);
        }

        for (name, definition) in self.bean_definitions {
            context
                .bean_definition_registry_mut()
                .register_bean_definition(&name, definition)?;
        }

        let scan = &properties.servlet.component_scan;
        if scan.enabled {
            let candidate_index = self.candidate_index.unwrap_or_else(global_candidate_index);
            debug!("候选组件索引大小: {}", candidate_index.len());
            enable_servlet_component_scan(&mut context, candidate_index);
        } else {
            info!("Servlet 组件扫描已禁用");
        }

        for configuration in &self.configurations {
            context.import_configuration(configuration)?;
        }

        if !scan.base_packages.is_empty() {
            if scan.enabled {
                let mut scan_builder = ServletComponentScanBuilder::new();
                scan_builder.add_base_packages(scan.base_packages.iter().cloned());
                scan_builder.finalize(context.bean_definition_registry_mut())?;
            } else {
                warn!("Servlet 组件扫描已禁用，忽略配置的扫描包: {:?}", scan.base_packages);
            }
        }

        context.refresh()?;

        info!("Web 应用构建完成");
        Ok(WebApplication::new(context))
    }

    /// 初始化日志系统
    ///
    /// 全局订阅者已存在时保留现有订阅者。
    fn initialize_logging(&self) {
        // RUST_LOG 优先于配置中的过滤指令
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.logging_config.filter))
            .unwrap_or_else(|e| {
                warn!("日志过滤指令无效 '{}': {}", self.logging_config.filter, e);
                EnvFilter::new("info")
            });
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        let result = if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };

        match result {
            Ok(()) => info!("日志系统初始化完成"),
            Err(e) => warn!("日志系统已初始化，跳过: {}", e),
        }
    }
}

impl Default for WebApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 过滤指令，例如 `info,web_servlet=debug`
    pub filter: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            filter: "info,di_impl=warn".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
