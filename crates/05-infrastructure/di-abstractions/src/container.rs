//! 应用上下文抽象接口
//!
//! 提供启动期间可被后置处理器和导入注册器访问的容器视图

use crate::environment::Environment;
use crate::registry::BeanDefinitionRegistry;
use infrastructure_common::{ClassMetadata, ComponentError};

/// Web 应用类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WebApplicationType {
    /// 非 Web 应用
    None,
    /// 基于 Servlet 的 Web 应用
    #[default]
    Servlet,
}

impl std::str::FromStr for WebApplicationType {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "servlet" => Ok(Self::Servlet),
            _ => Err(ComponentError::scan_error(format!(
                "未知的 Web 应用类型: {}",
                s
            ))),
        }
    }
}

/// 已绑定的 Servlet 上下文
///
/// 存在时表示应用部署在外部 Servlet 容器中，组件注册由容器负责。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServletContext {
    /// 容器信息
    pub server_info: String,
    /// 上下文路径
    pub context_path: String,
}

impl ServletContext {
    /// 创建 Servlet 上下文
    pub fn new(server_info: impl Into<String>, context_path: impl Into<String>) -> Self {
        Self {
            server_info: server_info.into(),
            context_path: context_path.into(),
        }
    }
}

/// 应用上下文 trait
pub trait ApplicationContext: Send + Sync {
    /// 上下文ID
    fn id(&self) -> &str;

    /// 运行环境
    fn environment(&self) -> &Environment;

    /// Web 应用类型
    fn web_application_type(&self) -> WebApplicationType;

    /// 已绑定的 Servlet 上下文
    fn servlet_context(&self) -> Option<&ServletContext>;

    /// Bean 定义注册表
    fn registry(&self) -> &dyn BeanDefinitionRegistry;

    /// 可修改的 Bean 定义注册表
    fn registry_mut(&mut self) -> &mut dyn BeanDefinitionRegistry;

    /// 是否运行在内嵌 Web 服务器中
    ///
    /// 仅当应用为 Servlet 类型且尚未绑定 Servlet 上下文时成立。
    fn is_running_in_embedded_web_server(&self) -> bool {
        self.web_application_type() == WebApplicationType::Servlet
            && self.servlet_context().is_none()
    }
}

/// Bean 工厂后置处理器 trait
///
/// 在 Bean 定义确定之后、实例化之前执行一次
pub trait BeanFactoryPostProcessor: Send + Sync {
    /// 处理器名称
    fn name(&self) -> &str;

    /// 执行顺序，数值越小越先执行
    fn order(&self) -> i32 {
        0
    }

    /// 处理 Bean 工厂
    fn post_process_bean_factory(
        &self,
        context: &mut dyn ApplicationContext,
    ) -> Result<(), ComponentError>;
}

/// 导入 Bean 定义注册器 trait
///
/// 处理配置类上的标记注解时调用
pub trait ImportBeanDefinitionRegistrar: Send + Sync {
    /// 触发该注册器的注解类型
    fn annotation_type(&self) -> &str;

    /// 根据导入配置类的元数据注册 Bean 定义
    fn register_bean_definitions(
        &self,
        importing_class: &ClassMetadata,
        registry: &mut dyn BeanDefinitionRegistry,
    ) -> Result<(), ComponentError>;
}
