//! 依赖注入实现的集成测试

use di_abstractions::{
    AnnotationTypeFilter, ApplicationContext, BeanDefinitionOrigin, BeanDefinitionRegistry,
    BeanFactoryPostProcessor, BeanRole, CandidateComponentProvider, Environment,
};
use di_impl::{ClassPathCandidateComponentProvider, GenericWebApplicationContext};
use infrastructure_common::{
    AnnotationAttributes, AnnotationMetadata, CandidateIndex, ClassMetadata, ComponentError,
};
use std::sync::Arc;

/// 把扫描到的组件注册为 Bean 的后置处理器
#[derive(Debug)]
struct ScanningPostProcessor {
    index: Arc<CandidateIndex>,
    base_package: String,
}

impl BeanFactoryPostProcessor for ScanningPostProcessor {
    fn name(&self) -> &str {
        "scanningPostProcessor"
    }

    fn post_process_bean_factory(
        &self,
        context: &mut dyn ApplicationContext,
    ) -> Result<(), ComponentError> {
        let mut provider = ClassPathCandidateComponentProvider::new(Arc::clone(&self.index))
            .with_environment(context.environment().clone());
        provider.add_include_filter(Box::new(AnnotationTypeFilter::new("Component")));

        for candidate in provider.find_candidate_components(&self.base_package)? {
            let name = candidate
                .scanned_metadata()
                .map(|metadata| metadata.simple_name.clone())
                .unwrap_or_default();
            context.registry_mut().register_bean_definition(&name, candidate)?;
        }
        Ok(())
    }
}

fn component(type_name: &str) -> ClassMetadata {
    ClassMetadata::new(type_name)
        .with_annotation(AnnotationMetadata::new("Component", AnnotationAttributes::new()))
}

#[test]
fn test_scanning_post_processor_registers_components_on_refresh() {
    let index = Arc::new(CandidateIndex::new());
    index.register(component("shop::orders::OrderService"));
    index.register(component("shop::billing::InvoiceService"));
    index.register(ClassMetadata::new("shop::orders::Plain"));

    let mut context = GenericWebApplicationContext::new()
        .with_environment(Environment::new().with_property("scan.root", "shop::orders"));
    context.add_post_processor(Arc::new(ScanningPostProcessor {
        index,
        base_package: "${scan.root}".to_string(),
    }));

    context.refresh().unwrap();

    let registry = context.bean_definition_registry();
    assert_eq!(registry.bean_definition_names(), ["OrderService"]);
    let definition = registry.get_bean_definition("OrderService").unwrap();
    assert_eq!(definition.role(), BeanRole::Application);
    assert!(matches!(definition.origin(), BeanDefinitionOrigin::Scanned(_)));
}

#[test]
fn test_duplicate_component_names_abort_refresh() {
    let index = Arc::new(CandidateIndex::new());
    index.register(component("shop::a::Service"));
    index.register(component("shop::b::Service"));

    let mut context = GenericWebApplicationContext::new();
    context.add_post_processor(Arc::new(ScanningPostProcessor {
        index,
        base_package: "shop".to_string(),
    }));

    let err = context.refresh().unwrap_err();

    assert!(err.to_string().contains("Service"));
    assert!(!context.is_active());
}
