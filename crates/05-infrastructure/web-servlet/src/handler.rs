//! Servlet 组件处理器
//!
//! 每种组件注解对应一个处理器：提供扫描用的类型过滤器，并把匹配的候选组件转换为注册 Bean 定义。

use crate::registration::{
    DispatcherType, FilterRegistrationBean, MultipartConfigElement, ServletListenerRegistrationBean,
    ServletRegistrationBean,
};
use di_abstractions::{AnnotationTypeFilter, BeanDefinition, BeanDefinitionRegistry, TypeFilter};
use infrastructure_common::{
    AnnotationAttributes, AttributeError, ClassMetadata, ComponentError, MULTIPART_CONFIG,
    WEB_FILTER, WEB_LISTENER, WEB_SERVLET,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// 注解属性名称
pub mod attribute_names {
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
    pub const URL_PATTERNS: &str = "url_patterns";
    pub const INIT_PARAMS: &str = "init_params";
    pub const LOAD_ON_STARTUP: &str = "load_on_startup";
    pub const ASYNC_SUPPORTED: &str = "async_supported";
    pub const FILTER_NAME: &str = "filter_name";
    pub const SERVLET_NAMES: &str = "servlet_names";
    pub const DISPATCHER_TYPES: &str = "dispatcher_types";
    pub const LOCATION: &str = "location";
    pub const MAX_FILE_SIZE: &str = "max_file_size";
    pub const MAX_REQUEST_SIZE: &str = "max_request_size";
    pub const FILE_SIZE_THRESHOLD: &str = "file_size_threshold";
}

/// Servlet 组件处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServletComponentHandler {
    /// 处理 `WebServlet` 注解
    WebServlet,
    /// 处理 `WebFilter` 注解
    WebFilter,
    /// 处理 `WebListener` 注解
    WebListener,
}

/// 固定的处理器列表
pub const HANDLERS: [ServletComponentHandler; 3] = [
    ServletComponentHandler::WebServlet,
    ServletComponentHandler::WebFilter,
    ServletComponentHandler::WebListener,
];

impl ServletComponentHandler {
    /// 处理的注解类型
    pub fn annotation_type(&self) -> &'static str {
        match self {
            Self::WebServlet => WEB_SERVLET,
            Self::WebFilter => WEB_FILTER,
            Self::WebListener => WEB_LISTENER,
        }
    }

    /// 扫描时使用的类型过滤器
    pub fn type_filter(&self) -> AnnotationTypeFilter {
        AnnotationTypeFilter::new(self.annotation_type())
    }

    /// 处理候选组件
    ///
    /// 候选组件不带本处理器的注解时不做任何事并返回 `None`，否则注册对应的注册 Bean 定义并返回其名称。
    pub fn handle(
        &self,
        candidate: &BeanDefinition,
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> Result<Option<String>, ComponentError> {
        let Some(metadata) = candidate.scanned_metadata() else {
            return Ok(None);
        };
        if !self.type_filter().matches(metadata) {
            return Ok(None);
        }

        let context = HandlerContext {
            metadata,
            annotation: self.annotation_type(),
        };
        let attributes = metadata
            .annotation_attributes(self.annotation_type())
            .cloned()
            .unwrap_or_default();

        let (name, definition) = match self {
            Self::WebServlet => {
                let bean = context.servlet_registration(&attributes, candidate)?;
                (bean.name.clone(), bean.into_bean_definition())
            }
            Self::WebFilter => {
                let bean = context.filter_registration(&attributes, candidate)?;
                (bean.name.clone(), bean.into_bean_definition())
            }
            Self::WebListener => (
                metadata.type_name.clone(),
                ServletListenerRegistrationBean::new(candidate.clone()).into_bean_definition(),
            ),
        };

        registry.register_bean_definition(&name, definition)?;
        info!("注册 @{} 组件 {} 为 '{}'", self.annotation_type(), metadata.type_name, name);
        Ok(Some(name))
    }
}

/// 单次处理时的注解上下文，用于生成带类型信息的错误
struct HandlerContext<'a> {
    metadata: &'a ClassMetadata,
    annotation: &'static str,
}

impl HandlerContext<'_> {
    fn invalid(&self, message: impl Into<String>) -> ComponentError {
        ComponentError::invalid_annotation(&self.metadata.type_name, self.annotation, message)
    }

    fn attribute(&self, err: AttributeError) -> ComponentError {
        err.into_component_error(&self.metadata.type_name, self.annotation)
    }

    fn name_or_simple_name(
        &self,
        attributes: &AnnotationAttributes,
        attribute: &str,
    ) -> Result<String, ComponentError> {
        let name = attributes
            .get_text(attribute)
            .map_err(|err| self.attribute(err))?;
        Ok(name.map_or_else(|| self.metadata.simple_name.clone(), str::to_string))
    }

    /// `value` 与 `url_patterns` 只能设置其中之一
    fn url_patterns(&self, attributes: &AnnotationAttributes) -> Result<Vec<String>, ComponentError> {
        let value = attributes
            .string_array_or_empty(attribute_names::VALUE)
            .map_err(|err| self.attribute(err))?;
        let url_patterns = attributes
            .string_array_or_empty(attribute_names::URL_PATTERNS)
            .map_err(|err| self.attribute(err))?;

        if !value.is_empty() && !url_patterns.is_empty() {
            return Err(self.invalid("url_patterns 与 value 属性互斥"));
        }
        let patterns = if value.is_empty() { url_patterns } else { value };
        Ok(patterns.to_vec())
    }

    fn init_parameters(
        &self,
        attributes: &AnnotationAttributes,
    ) -> Result<BTreeMap<String, String>, ComponentError> {
        let mut init_parameters = BTreeMap::new();
        for init_param in attributes
            .annotations_or_empty(attribute_names::INIT_PARAMS)
            .map_err(|err| self.attribute(err))?
        {
            let name = init_param
                .get_string(attribute_names::NAME)
                .map_err(|err| self.attribute(err))?;
            let value = init_param
                .get_string(attribute_names::VALUE)
                .map_err(|err| self.attribute(err))?;
            init_parameters.insert(name.to_string(), value.to_string());
        }
        Ok(init_parameters)
    }

    fn multipart_config(&self) -> Result<Option<MultipartConfigElement>, ComponentError> {
        let Some(attributes) = self.metadata.annotation_attributes(MULTIPART_CONFIG) else {
            return Ok(None);
        };
        let context = HandlerContext {
            metadata: self.metadata,
            annotation: MULTIPART_CONFIG,
        };
        let defaults = MultipartConfigElement::default();

        let read = || -> Result<MultipartConfigElement, AttributeError> {
            Ok(MultipartConfigElement {
                location: attributes
                    .get_text(attribute_names::LOCATION)?
                    .unwrap_or_default()
                    .to_string(),
                max_file_size: attributes.int_or(attribute_names::MAX_FILE_SIZE, defaults.max_file_size)?,
                max_request_size: attributes
                    .int_or(attribute_names::MAX_REQUEST_SIZE, defaults.max_request_size)?,
                file_size_threshold: attributes
                    .int_or(attribute_names::FILE_SIZE_THRESHOLD, defaults.file_size_threshold)?,
            })
        };
        read().map(Some).map_err(|err| context.attribute(err))
    }

    fn servlet_registration(
        &self,
        attributes: &AnnotationAttributes,
        candidate: &BeanDefinition,
    ) -> Result<ServletRegistrationBean, ComponentError> {
        let mut bean = ServletRegistrationBean::new(
            self.name_or_simple_name(attributes, attribute_names::NAME)?,
            candidate.clone(),
        );
        bean.url_mappings = self.url_patterns(attributes)?;
        bean.init_parameters = self.init_parameters(attributes)?;
        bean.load_on_startup = attributes
            .int_or(attribute_names::LOAD_ON_STARTUP, bean.load_on_startup)
            .map_err(|err| self.attribute(err))?;
        bean.async_supported = attributes
            .bool_or(attribute_names::ASYNC_SUPPORTED, bean.async_supported)
            .map_err(|err| self.attribute(err))?;
        bean.multipart_config = self.multipart_config()?;

        debug!("Servlet {} 映射到 {:?}", bean.name, bean.url_mappings);
        Ok(bean)
    }

    fn filter_registration(
        &self,
        attributes: &AnnotationAttributes,
        candidate: &BeanDefinition,
    ) -> Result<FilterRegistrationBean, ComponentError> {
        let mut bean = FilterRegistrationBean::new(
            self.name_or_simple_name(attributes, attribute_names::FILTER_NAME)?,
            candidate.clone(),
        );
        bean.url_patterns = self.url_patterns(attributes)?;
        bean.servlet_names = attributes
            .string_array_or_empty(attribute_names::SERVLET_NAMES)
            .map_err(|err| self.attribute(err))?
            .to_vec();
        bean.init_parameters = self.init_parameters(attributes)?;
        bean.async_supported = attributes
            .bool_or(attribute_names::ASYNC_SUPPORTED, bean.async_supported)
            .map_err(|err| self.attribute(err))?;

        let dispatcher_types = attributes
            .string_array_or_empty(attribute_names::DISPATCHER_TYPES)
            .map_err(|err| self.attribute(err))?
            .iter()
            .map(|value| value.parse::<DispatcherType>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|err| self.invalid(err.to_string()))?;
        if !dispatcher_types.is_empty() {
            bean.dispatcher_types = dispatcher_types;
        }

        debug!(
            "Filter {} 映射到 {:?}，Servlet {:?}",
            bean.name, bean.url_patterns, bean.servlet_names
        );
        Ok(bean)
    }
}
