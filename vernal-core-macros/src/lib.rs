mod attribute_helpers;
mod bean_post_processor_impl;
mod component_impl;
mod value_injection;

use proc_macro::TokenStream;

/// Component 派生宏
///
/// 为结构体实现 `Component` trait 并向 inventory 提交注册项，
/// 使该类型可以被 `scan_components` 按模块路径发现。
///
/// 用法：
/// ```ignore
/// #[derive(Component)]
/// #[bean("userService")]     // 可选：指定 bean 名称，默认为类型名的 camelCase
/// #[scope("prototype")]      // 可选：指定作用域 (singleton/prototype)
/// #[lazy]                    // 可选：延迟初始化（仅对单例有效）
/// #[init]                    // 可选：初始化回调（默认调用 init 方法）
/// #[init("custom_init")]     // 可选：自定义初始化方法名
/// #[destroy]                 // 可选：销毁回调（默认调用 destroy 方法）
/// #[name_aware]              // 可选：创建时通告注册名称（默认调用 set_bean_name 方法）
/// struct UserService {
///     // 按字段名匹配 bean 名称：order_service -> orderService
///     #[autowired]
///     order_service: Arc<OrderService>,
///
///     // 或显式指定 bean 名称
///     #[autowired("paymentGateway")]
///     gateway: Arc<PaymentService>,
///
///     // 从 Environment 注入配置
///     #[value("app.name", default = "demo")]
///     app_name: String,
///
///     // 其余字段通过 Default::default() 填充
///     counter: u64,
/// }
/// ```
#[proc_macro_derive(
    Component,
    attributes(bean, scope, lazy, autowired, value, init, destroy, name_aware)
)]
pub fn derive_component(input: TokenStream) -> TokenStream {
    component_impl::derive_component_impl(input)
}

/// BeanPostProcessor 派生宏
///
/// 向 inventory 提交后置处理器注册项。扫描时处理器会先于任何
/// 普通 Bean 通过无参构造（`Default::default`）立即实例化，
/// 因此要求类型实现 `Default` 和 `BeanPostProcessor` trait。
///
/// 注意：必须同时使用 `#[derive(Component)]`，后置处理器本身
/// 也会注册为一个普通 Bean。
///
/// 用法：
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
///
///     fn order(&self) -> i32 {
///         100  // 可选：数字越小优先级越高
///     }
/// }
/// ```
#[proc_macro_derive(BeanPostProcessor)]
pub fn derive_bean_post_processor(input: TokenStream) -> TokenStream {
    bean_post_processor_impl::derive_bean_post_processor_impl(input)
}
