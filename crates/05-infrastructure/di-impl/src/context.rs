//! Web 应用上下文实现
//!
//! 负责导入配置类、在刷新时执行 Bean 工厂后置处理器，并在完成后冻结注册表。

use crate::registry::DefaultBeanDefinitionRegistry;
use chrono::{DateTime, Utc};
use di_abstractions::{
    ApplicationContext, BeanDefinition, BeanDefinitionRegistry, BeanFactoryPostProcessor,
    Environment, ImportBeanDefinitionRegistrar, ServletContext, WebApplicationType,
};
use infrastructure_common::{ClassMetadata, ComponentError, InfrastructureError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// 后置处理器工厂
///
/// 根据注册表中的基础设施 Bean 定义创建对应的后置处理器实例。
pub type PostProcessorFactory = Arc<
    dyn Fn(&BeanDefinition) -> Result<Box<dyn BeanFactoryPostProcessor>, ComponentError>
        + Send
        + Sync,
>;

/// 通用 Web 应用上下文
pub struct GenericWebApplicationContext {
    id: String,
    environment: Environment,
    web_application_type: WebApplicationType,
    servlet_context: Option<ServletContext>,
    registry: DefaultBeanDefinitionRegistry,
    post_processors: Vec<Arc<dyn BeanFactoryPostProcessor>>,
    post_processor_factories: HashMap<String, PostProcessorFactory>,
    import_registrars: Vec<Arc<dyn ImportBeanDefinitionRegistrar>>,
    startup_date: Option<DateTime<Utc>>,
    refreshed: bool,
}

impl GenericWebApplicationContext {
    /// 创建新的上下文，ID 为随机 UUID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            environment: Environment::default(),
            web_application_type: WebApplicationType::default(),
            servlet_context: None,
            registry: DefaultBeanDefinitionRegistry::new(),
            post_processors: Vec::new(),
            post_processor_factories: HashMap::new(),
            import_registrars: Vec::new(),
            startup_date: None,
            refreshed: false,
        }
    }

    /// 设置上下文ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// 设置运行环境
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// 设置 Web 应用类型
    pub fn with_web_application_type(mut self, web_application_type: WebApplicationType) -> Self {
        self.web_application_type = web_application_type;
        self
    }

    /// 绑定 Servlet 上下文
    pub fn with_servlet_context(mut self, servlet_context: ServletContext) -> Self {
        self.servlet_context = Some(servlet_context);
        self
    }

    /// 使用指定的注册表
    pub fn with_registry(mut self, registry: DefaultBeanDefinitionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 添加后置处理器实例
    pub fn add_post_processor(&mut self, post_processor: Arc<dyn BeanFactoryPostProcessor>) {
        debug!("添加 Bean 工厂后置处理器: {}", post_processor.name());
        self.post_processors.push(post_processor);
    }

    /// 为指定 Bean 类型注册后置处理器工厂
    pub fn register_post_processor_factory(
        &mut self,
        bean_class_name: impl Into<String>,
        factory: PostProcessorFactory,
    ) {
        let bean_class_name = bean_class_name.into();
        debug!("注册后置处理器工厂: {}", bean_class_name);
        self.post_processor_factories.insert(bean_class_name, factory);
    }

    /// 注册配置导入注册器
    pub fn register_import_registrar(&mut self, registrar: Arc<dyn ImportBeanDefinitionRegistrar>) {
        debug!("注册配置导入注册器: @{}", registrar.annotation_type());
        self.import_registrars.push(registrar);
    }

    /// 导入配置类
    ///
    /// 调用所有注解出现在配置类上的导入注册器，返回被调用的注册器数量。
    pub fn import_configuration(
        &mut self,
        configuration: &ClassMetadata,
    ) -> Result<usize, InfrastructureError> {
        self.ensure_not_refreshed()?;

        let mut imported = 0;
        for registrar in &self.import_registrars {
            if configuration.has_annotation(registrar.annotation_type()) {
                debug!(
                    "处理配置类 {} 上的 @{}",
                    configuration.type_name,
                    registrar.annotation_type()
                );
                registrar.register_bean_definitions(configuration, &mut self.registry)?;
                imported += 1;
            }
        }
        Ok(imported)
    }

    /// 刷新上下文
    ///
    /// 只能执行一次：创建并按顺序执行全部后置处理器，然后冻结注册表。
    pub fn refresh(&mut self) -> Result<(), InfrastructureError> {
        self.ensure_not_refreshed()?;
        info!("刷新应用上下文: {}", self.id);

        let post_processors = self.collect_post_processors()?;
        for post_processor in &post_processors {
            debug!(
                "执行 Bean 工厂后置处理器: {} (order={})",
                post_processor.name(),
                post_processor.order()
            );
            post_processor.post_process_bean_factory(&mut *self)?;
        }

        self.registry.freeze_configuration();
        self.startup_date = Some(Utc::now());
        self.refreshed = true;

        info!(
            "应用上下文 {} 刷新完成: {} 个后置处理器, {} 个 Bean 定义",
            self.id,
            post_processors.len(),
            self.registry.bean_definition_count()
        );
        Ok(())
    }

    fn ensure_not_refreshed(&self) -> Result<(), InfrastructureError> {
        if self.refreshed {
            return Err(InfrastructureError::AlreadyRefreshed {
                context_id: self.id.clone(),
            });
        }
        Ok(())
    }

    fn collect_post_processors(
        &self,
    ) -> Result<Vec<Arc<dyn BeanFactoryPostProcessor>>, ComponentError> {
        let mut post_processors = self.post_processors.clone();

        for (name, definition) in self.registry.iter() {
            if let Some(factory) = self.post_processor_factories.get(definition.bean_class_name()) {
                debug!("由 Bean 定义 {} 创建后置处理器", name);
                post_processors.push(Arc::from(factory(definition)?));
            }
        }

        post_processors.sort_by_key(|post_processor| post_processor.order());
        Ok(post_processors)
    }

    /// 是否已刷新
    pub fn is_active(&self) -> bool {
        self.refreshed
    }

    /// 启动完成时间
    pub fn startup_date(&self) -> Option<DateTime<Utc>> {
        self.startup_date
    }

    /// 具体的注册表
    pub fn bean_definition_registry(&self) -> &DefaultBeanDefinitionRegistry {
        &self.registry
    }

    /// 可修改的具体注册表
    pub fn bean_definition_registry_mut(&mut self) -> &mut DefaultBeanDefinitionRegistry {
        &mut self.registry
    }
}

impl Default for GenericWebApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GenericWebApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericWebApplicationContext")
            .field("id", &self.id)
            .field("web_application_type", &self.web_application_type)
            .field("servlet_context", &self.servlet_context)
            .field("bean_definitions", &self.registry.bean_definition_count())
            .field("post_processors", &self.post_processors.len())
            .field("refreshed", &self.refreshed)
            .finish()
    }
}

impl ApplicationContext for GenericWebApplicationContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn web_application_type(&self) -> WebApplicationType {
        self.web_application_type
    }

    fn servlet_context(&self) -> Option<&ServletContext> {
        self.servlet_context.as_ref()
    }

    fn registry(&self) -> &dyn BeanDefinitionRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut dyn BeanDefinitionRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{BeanDefinitionBuilder, BeanRole};
    use infrastructure_common::{AnnotationAttributes, AnnotationMetadata};
    use parking_lot::Mutex;

    #[derive(Debug)]
    struct RecordingPostProcessor {
        name: String,
        order: i32,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl BeanFactoryPostProcessor for RecordingPostProcessor {
        fn name(&self) -> &str {
            &self.name
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn post_process_bean_factory(
            &self,
            context: &mut dyn ApplicationContext,
        ) -> Result<(), ComponentError> {
            self.calls.lock().push(self.name.clone());
            context.registry_mut().register_bean_definition(
                &format!("{}Bean", self.name),
                BeanDefinition::new("test::Registered"),
            )?;
            Ok(())
        }
    }

    struct MarkerRegistrar;

    impl ImportBeanDefinitionRegistrar for MarkerRegistrar {
        fn annotation_type(&self) -> &str {
            "EnableMarker"
        }

        fn register_bean_definitions(
            &self,
            importing_class: &ClassMetadata,
            registry: &mut dyn BeanDefinitionRegistry,
        ) -> Result<(), ComponentError> {
            registry.register_bean_definition(
                "marker",
                BeanDefinitionBuilder::root_bean_definition("test::Marker")
                    .description(importing_class.type_name.clone())
                    .role(BeanRole::Infrastructure)
                    .build(),
            )?;
            Ok(())
        }
    }

    fn recording(name: &str, order: i32, calls: &Arc<Mutex<Vec<String>>>) -> RecordingPostProcessor {
        RecordingPostProcessor {
            name: name.to_string(),
            order,
            calls: Arc::clone(calls),
        }
    }

    #[test]
    fn test_refresh_runs_post_processors_in_order_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut context = GenericWebApplicationContext::new().with_id("test");
        context.add_post_processor(Arc::new(recording("late", 10, &calls)));
        context.add_post_processor(Arc::new(recording("early", -5, &calls)));

        context.refresh().unwrap();

        assert_eq!(*calls.lock(), ["early", "late"]);
        assert!(context.is_active());
        assert!(context.startup_date().is_some());
        assert!(context.bean_definition_registry().is_configuration_frozen());
        assert!(context.registry().contains_bean_definition("earlyBean"));

        let err = context.refresh().unwrap_err();
        assert!(matches!(err, InfrastructureError::AlreadyRefreshed { ref context_id } if context_id == "test"));
        assert_eq!(calls.lock().len(), 2);
    }

    #[test]
    fn test_post_processors_are_created_from_bean_definitions() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let factory_calls = Arc::clone(&calls);
        let mut context = GenericWebApplicationContext::new();
        context.register_post_processor_factory(
            "test::FactoryBacked",
            Arc::new(
                move |definition: &BeanDefinition| -> Result<Box<dyn BeanFactoryPostProcessor>, ComponentError> {
                    let name = definition.description().unwrap_or("unnamed").to_string();
                    Ok(Box::new(RecordingPostProcessor {
                        name,
                        order: 0,
                        calls: Arc::clone(&factory_calls),
                    }))
                },
            ),
        );
        context
            .registry_mut()
            .register_bean_definition(
                "factoryBacked",
                BeanDefinitionBuilder::root_bean_definition("test::FactoryBacked")
                    .description("fromDefinition")
                    .build(),
            )
            .unwrap();

        context.refresh().unwrap();

        assert_eq!(*calls.lock(), ["fromDefinition"]);
    }

    #[test]
    fn test_import_configuration_invokes_matching_registrars() {
        let mut context = GenericWebApplicationContext::new();
        context.register_import_registrar(Arc::new(MarkerRegistrar));

        let plain = ClassMetadata::new("app::PlainConfig");
        assert_eq!(context.import_configuration(&plain).unwrap(), 0);

        let marked = ClassMetadata::new("app::MarkedConfig")
            .with_annotation(AnnotationMetadata::new("EnableMarker", AnnotationAttributes::new()));
        assert_eq!(context.import_configuration(&marked).unwrap(), 1);

        let definition = context.registry().get_bean_definition("marker").unwrap();
        assert_eq!(definition.description(), Some("app::MarkedConfig"));
        assert!(context.bean_definition_registry().application_bean_names().is_empty());
    }

    #[test]
    fn test_embedded_web_server_detection() {
        let embedded = GenericWebApplicationContext::new();
        assert!(embedded.is_running_in_embedded_web_server());

        let deployed = GenericWebApplicationContext::new()
            .with_servlet_context(ServletContext::new("Apache Tomcat/10.1", "/app"));
        assert!(!deployed.is_running_in_embedded_web_server());

        let non_web = GenericWebApplicationContext::new()
            .with_web_application_type(WebApplicationType::None);
        assert!(!non_web.is_running_in_embedded_web_server());
    }
}
