//! 已刷新的 Web 应用

use di_abstractions::{BeanDefinition, BeanDefinitionRegistry};
use di_impl::GenericWebApplicationContext;
use infrastructure_common::BeanDefinitionError;
use std::collections::BTreeSet;
use web_servlet::{
    FilterRegistrationBean, ServletListenerRegistrationBean, ServletRegistrationBean, BEAN_NAME,
};

/// Web 应用
///
/// 持有已刷新的应用上下文，提供已注册 Servlet 组件的类型化视图。
#[derive(Debug)]
pub struct WebApplication {
    context: GenericWebApplicationContext,
}

impl WebApplication {
    pub(crate) fn new(context: GenericWebApplicationContext) -> Self {
        Self { context }
    }

    /// 应用上下文
    pub fn context(&self) -> &GenericWebApplicationContext {
        &self.context
    }

    /// 已注册的 Servlet，按注册顺序返回 `(Bean 名称, 注册信息)`
    pub fn servlet_registrations(
        &self,
    ) -> Result<Vec<(String, ServletRegistrationBean)>, BeanDefinitionError> {
        self.registrations(ServletRegistrationBean::BEAN_CLASS_NAME)
    }

    /// 已注册的过滤器
    pub fn filter_registrations(
        &self,
    ) -> Result<Vec<(String, FilterRegistrationBean)>, BeanDefinitionError> {
        self.registrations(FilterRegistrationBean::BEAN_CLASS_NAME)
    }

    /// 已注册的监听器
    pub fn listener_registrations(
        &self,
    ) -> Result<Vec<(String, ServletListenerRegistrationBean)>, BeanDefinitionError> {
        self.registrations(ServletListenerRegistrationBean::BEAN_CLASS_NAME)
    }

    /// 共享后置处理器最终扫描的包，未启用扫描时为空
    pub fn packages_to_scan(&self) -> BTreeSet<String> {
        self.context
            .bean_definition_registry()
            .get_bean_definition(BEAN_NAME)
            .ok()
            .and_then(|definition| definition.constructor_argument_values().generic_string_set())
            .cloned()
            .unwrap_or_default()
    }

    fn registrations<'a, T>(&'a self, bean_class_name: &str) -> Result<Vec<(String, T)>, BeanDefinitionError>
    where
        T: TryFrom<&'a BeanDefinition, Error = BeanDefinitionError>,
    {
        self.context
            .bean_definition_registry()
            .iter()
            .filter(|(_, definition)| definition.bean_class_name() == bean_class_name)
            .map(|(name, definition)| Ok((name.to_string(), T::try_from(definition)?)))
            .collect()
    }
}
