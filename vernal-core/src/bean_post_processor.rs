//! BeanPostProcessor - Bean 工厂扩展机制
//!
//! 提供在 Bean 初始化前后进行自定义处理的钩子。
//! 每个钩子接收当前实例并返回一个实例：可以原样返回，
//! 也可以返回一个替换实例（例如包装器），替换结果会传递给
//! 链上的下一个钩子以及后续的创建步骤。

use std::any::Any;
use std::sync::Arc;

use crate::error::ContainerResult;

/// 后置处理器的无参构造函数类型
///
/// 后置处理器在扫描阶段立即实例化（先于任何普通 Bean 的创建），
/// 不走常规的 Bean 创建流程，因此只支持无参构造。
pub type BeanPostProcessorConstructor = fn() -> ContainerResult<Arc<dyn BeanPostProcessor>>;

/// BeanPostProcessor 注册项 - 用于 inventory 收集
///
/// 由 `#[derive(BeanPostProcessor)]` 宏在定义处提交，
/// 携带定义所在的模块路径供扫描器做范围过滤。
pub struct BeanPostProcessorRegistration {
    pub bean_name: &'static str,
    pub type_name: &'static str,
    pub module_path: &'static str,
    pub constructor: BeanPostProcessorConstructor,
}

inventory::collect!(BeanPostProcessorRegistration);

/// BeanPostProcessor trait
///
/// 在 Bean 初始化的不同阶段提供钩子，允许观察或替换 Bean 实例。
///
/// 使用场景：
/// - 代理 / 包装 Bean（在 after 钩子中返回包装实例）
/// - 记录、审计每个 Bean 的创建
///
/// # 示例
///
/// ```ignore
/// use vernal_core::prelude::*;
/// use vernal_core_macros::{BeanPostProcessor, Component};
///
/// #[derive(BeanPostProcessor, Component, Default)]
/// pub struct AuditBeanPostProcessor;
///
/// impl BeanPostProcessor for AuditBeanPostProcessor {
///     fn post_process_after_initialization(
///         &self,
///         bean: Arc<dyn Any + Send + Sync>,
///         bean_name: &str,
///     ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
///         tracing::info!("Bean initialized: {}", bean_name);
///         Ok(bean)
///     }
/// }
/// ```
pub trait BeanPostProcessor: Send + Sync {
    /// 在 Bean 初始化回调之前调用
    ///
    /// 返回处理后的 Bean 实例（可以是原始 Bean，也可以是替换后的 Bean）
    fn post_process_before_initialization(
        &self,
        bean: Arc<dyn Any + Send + Sync>,
        _bean_name: &str,
    ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        Ok(bean)
    }

    /// 在 Bean 初始化回调之后调用
    ///
    /// 这是容器唯一的代理扩展点：返回一个不同的实例即可
    /// 让 `get_bean` 的调用方拿到包装器而不是原始 Bean。
    fn post_process_after_initialization(
        &self,
        bean: Arc<dyn Any + Send + Sync>,
        _bean_name: &str,
    ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        Ok(bean)
    }

    /// 获取处理器的名称（用于日志和调试）
    fn name(&self) -> &str {
        "BeanPostProcessor"
    }

    /// 获取处理器的优先级（数字越小优先级越高）
    ///
    /// 默认为 1000。优先级相同的处理器保持扫描时的发现顺序。
    fn order(&self) -> i32 {
        1000
    }
}
