//! Centralized integration tests for di-impl crate
use di_abstractions::{
    ApplicationContext, BeanDefinition, BeanDefinitionBuilder, BeanDefinitionRegistry,
    BeanFactoryPostProcessor, BeanRole, ImportBeanDefinitionRegistrar,
};
use di_impl::{DefaultBeanDefinitionRegistry, GenericWebApplicationContext, PostProcessorFactory};
use infrastructure_common::{
    AnnotationAttributes, AnnotationMetadata, BeanDefinitionError, ClassMetadata, ComponentError,
    InfrastructureError,
};
use std::sync::{Arc, Mutex};

const ENABLE_AUDIT: &str = "EnableAudit";
const AUDIT_PROCESSOR_CLASS: &str = "app::audit::AuditPostProcessor";

/// 把配置类名称记录为构造参数的注册器
struct AuditRegistrar;

impl ImportBeanDefinitionRegistrar for AuditRegistrar {
    fn annotation_type(&self) -> &str {
        ENABLE_AUDIT
    }

    fn register_bean_definitions(
        &self,
        importing_class: &ClassMetadata,
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> Result<(), ComponentError> {
        let definition = BeanDefinitionBuilder::root_bean_definition(AUDIT_PROCESSOR_CLASS)
            .add_constructor_arg_value(importing_class.type_name.clone())
            .role(BeanRole::Infrastructure)
            .build();
        registry.register_bean_definition("auditPostProcessor", definition)?;
        Ok(())
    }
}

/// 按执行顺序记录名称的后置处理器
struct AuditPostProcessor {
    name: String,
    order: i32,
    log: Arc<Mutex<Vec<String>>>,
}

impl BeanFactoryPostProcessor for AuditPostProcessor {
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
        self.log.lock().unwrap().push(self.name.clone());
        context.registry_mut().register_bean_definition(
            &format!("{}Report", self.name),
            BeanDefinition::new("app::audit::Report"),
        )?;
        Ok(())
    }
}

fn audit_factory(log: Arc<Mutex<Vec<String>>>) -> PostProcessorFactory {
    Arc::new(
        move |definition: &BeanDefinition| -> Result<Box<dyn BeanFactoryPostProcessor>, ComponentError> {
            assert_eq!(definition.constructor_argument_values().len(), 1);
            Ok(Box::new(AuditPostProcessor {
                name: "imported".to_string(),
                order: 10,
                log: Arc::clone(&log),
            }))
        },
    )
}

fn audited_configuration() -> ClassMetadata {
    ClassMetadata::new("app::AuditConfig")
        .with_annotation(AnnotationMetadata::new(ENABLE_AUDIT, AnnotationAttributes::new()))
}

#[test]
fn test_imported_definitions_drive_post_processors_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut context = GenericWebApplicationContext::new().with_id("audit-context");
    context.register_import_registrar(Arc::new(AuditRegistrar));
    context.register_post_processor_factory(AUDIT_PROCESSOR_CLASS, audit_factory(Arc::clone(&log)));
    context.add_post_processor(Arc::new(AuditPostProcessor {
        name: "explicit".to_string(),
        order: -10,
        log: Arc::clone(&log),
    }));

    assert_eq!(context.import_configuration(&audited_configuration()).unwrap(), 1);
    context.refresh().unwrap();

    assert_eq!(*log.lock().unwrap(), ["explicit", "imported"]);
    assert_eq!(
        context.bean_definition_registry().application_bean_names(),
        ["explicitReport", "importedReport"]
    );
    assert!(context.startup_date().is_some());
    assert_eq!(context.id(), "audit-context");
}

#[test]
fn test_configuration_without_marker_imports_nothing() {
    let mut context = GenericWebApplicationContext::new();
    context.register_import_registrar(Arc::new(AuditRegistrar));

    let imported = context
        .import_configuration(&ClassMetadata::new("app::PlainConfig"))
        .unwrap();

    assert_eq!(imported, 0);
    assert_eq!(context.registry().bean_definition_count(), 0);
}

#[test]
fn test_refreshed_context_rejects_changes() {
    let mut context = GenericWebApplicationContext::new();
    context.register_import_registrar(Arc::new(AuditRegistrar));
    context.refresh().unwrap();

    assert!(matches!(
        context.refresh(),
        Err(InfrastructureError::AlreadyRefreshed { .. })
    ));
    assert!(matches!(
        context.import_configuration(&audited_configuration()),
        Err(InfrastructureError::AlreadyRefreshed { .. })
    ));
    assert!(matches!(
        context
            .registry_mut()
            .register_bean_definition("late", BeanDefinition::new("app::Late")),
        Err(BeanDefinitionError::RegistryFrozen { .. })
    ));
}

#[test]
fn test_registry_overriding_policy() {
    let mut strict = DefaultBeanDefinitionRegistry::new();
    strict
        .register_bean_definition("clock", BeanDefinition::new("app::SystemClock"))
        .unwrap();
    assert!(matches!(
        strict.register_bean_definition("clock", BeanDefinition::new("app::FixedClock")),
        Err(BeanDefinitionError::BeanDefinitionOverride { .. })
    ));

    let mut lenient = DefaultBeanDefinitionRegistry::new().with_bean_definition_overriding(true);
    lenient
        .register_bean_definition("clock", BeanDefinition::new("app::SystemClock"))
        .unwrap();
    lenient
        .register_bean_definition("clock", BeanDefinition::new("app::FixedClock"))
        .unwrap();

    assert_eq!(
        lenient.get_bean_definition("clock").unwrap().bean_class_name(),
        "app::FixedClock"
    );
    assert_eq!(lenient.bean_definition_names(), ["clock"]);
}
