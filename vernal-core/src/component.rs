use std::sync::Arc;

use crate::bean_post_processor::BeanPostProcessorRegistration;
use crate::utils::paths;
use crate::{ApplicationContext, Container, ContainerError, ContainerResult, Scope};

/// Component 注册函数类型
pub type ComponentRegistrar = fn(&Arc<ApplicationContext>) -> ContainerResult<()>;

/// Component 注册项 - 用于 inventory 收集
///
/// 由 `#[derive(Component)]` 宏在定义处提交，携带定义所在的
/// 模块路径，扫描器按模块路径前缀筛选出某个"包"下的组件。
pub struct ComponentRegistration {
    pub name: &'static str,
    pub type_name: &'static str,
    pub module_path: &'static str,
    pub registrar: ComponentRegistrar,
}

inventory::collect!(ComponentRegistration);

/// Component trait - 用于标记可以注册到容器的组件
///
/// 通过 `#[derive(Component)]` 宏自动实现
///
/// # 示例
///
/// ```ignore
/// use vernal_core::prelude::*;
/// use vernal_core_macros::Component;
/// use std::sync::Arc;
///
/// #[derive(Component)]
/// #[bean("userService")]
/// #[scope("singleton")]
/// struct UserService {
///     // 按字段名 orderService 解析依赖
///     #[autowired]
///     order_service: Arc<OrderService>,
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// 获取 Bean 名称
    fn bean_name() -> &'static str;

    /// 获取作用域
    fn scope() -> Scope {
        Scope::Singleton
    }

    /// 是否延迟初始化
    fn lazy() -> bool {
        false
    }

    /// 获取依赖的 bean 名称列表
    fn dependencies() -> Vec<String> {
        Vec::new()
    }

    /// 初始化回调
    ///
    /// 返回 None 表示没有初始化逻辑
    fn init_callback() -> Option<fn(&mut Self) -> ContainerResult<()>> {
        None
    }

    /// 销毁回调
    ///
    /// 返回 None 表示没有清理逻辑
    fn destroy_callback() -> Option<fn(&mut Self) -> ContainerResult<()>> {
        None
    }

    /// BeanNameAware 回调
    ///
    /// 返回 Some 表示该组件希望在创建时得知自己的注册名称
    fn name_callback() -> Option<fn(&mut Self, &str)> {
        None
    }

    /// 从容器创建实例，自动注入依赖
    fn create_from_context(context: &Arc<ApplicationContext>) -> ContainerResult<Self>;

    /// 注册到容器
    fn register(context: &Arc<ApplicationContext>) -> ContainerResult<()> {
        let ctx = Arc::clone(context);
        let mut definition = crate::BeanDefinition::new(
            Self::bean_name(),
            crate::bean::FunctionFactory::new(move || Self::create_from_context(&ctx)),
        )
        .with_scope(Self::scope())
        .with_lazy(Self::lazy())
        .with_dependencies(Self::dependencies());

        if let Some(init_fn) = Self::init_callback() {
            definition = definition.with_init(move |bean: &mut dyn std::any::Any| {
                match bean.downcast_mut::<Self>() {
                    Some(typed_bean) => init_fn(typed_bean),
                    // 前置后置处理器可能已经替换了实例类型，
                    // 替换实例不再声明原类型的初始化回调，直接跳过
                    None => {
                        tracing::debug!(
                            "Skipping init callback: instance is no longer of type {}",
                            std::any::type_name::<Self>()
                        );
                        Ok(())
                    }
                }
            });
        }

        if let Some(destroy_fn) = Self::destroy_callback() {
            definition = definition.with_destroy(move |bean: &mut dyn std::any::Any| {
                match bean.downcast_mut::<Self>() {
                    Some(typed_bean) => destroy_fn(typed_bean),
                    None => {
                        tracing::debug!(
                            "Skipping destroy callback: instance is no longer of type {}",
                            std::any::type_name::<Self>()
                        );
                        Ok(())
                    }
                }
            });
        }

        if let Some(name_fn) = Self::name_callback() {
            definition = definition.with_name_aware(move |bean: &mut dyn std::any::Any, name: &str| {
                if let Some(typed_bean) = bean.downcast_mut::<Self>() {
                    name_fn(typed_bean, name);
                }
            });
        }

        context.as_ref().register(definition);
        Ok(())
    }
}

impl ApplicationContext {
    /// 扫描指定模块路径下的所有组件并注册
    ///
    /// 这是容器的"包扫描"：所有通过 `#[derive(Component)]` 标记的类型
    /// 都会在编译期向 inventory 提交注册项，这里按模块路径前缀筛选。
    ///
    /// 扫描分两个阶段：
    /// 1. 先实例化路径下的所有后置处理器并加入处理器链 ——
    ///    它们必须先于任何普通 Bean 存在；
    /// 2. 再注册所有组件定义（后置处理器组件同时也会注册为普通 Bean）。
    ///
    /// 实例化后置处理器失败、或路径下没有任何组件时，
    /// 扫描以 [`ContainerError::ScanFailed`] 终止。
    pub fn scan_components(self: &Arc<Self>, base_path: &str) -> ContainerResult<usize> {
        tracing::info!("Starting component scan under '{}'", base_path);

        // 阶段 1：后置处理器
        let processors: Vec<_> = inventory::iter::<BeanPostProcessorRegistration>()
            .into_iter()
            .filter(|r| paths::is_within(r.module_path, base_path))
            .collect();

        for registration in &processors {
            tracing::debug!(
                "Instantiating BeanPostProcessor '{}' ({})",
                registration.bean_name,
                registration.type_name
            );

            let processor = (registration.constructor)().map_err(|e| {
                ContainerError::ScanFailed(format!(
                    "failed to instantiate BeanPostProcessor '{}': {}",
                    registration.bean_name, e
                ))
            })?;

            self.add_bean_post_processor(processor);
        }

        if !processors.is_empty() {
            tracing::info!("Registered {} BeanPostProcessor(s)", processors.len());
        }

        // 阶段 2：组件定义
        let components: Vec<_> = inventory::iter::<ComponentRegistration>()
            .into_iter()
            .filter(|r| paths::is_within(r.module_path, base_path))
            .collect();

        if components.is_empty() {
            tracing::error!("No components found under '{}'", base_path);
            return Err(ContainerError::ScanFailed(format!(
                "no components found under '{}'",
                base_path
            )));
        }

        let total = components.len();
        for (idx, component) in components.iter().enumerate() {
            tracing::debug!(
                "Registering component [{}/{}]: '{}' ({})",
                idx + 1,
                total,
                component.name,
                component.type_name
            );

            (component.registrar)(self).map_err(|e| {
                tracing::error!("Failed to register component '{}': {}", component.name, e);
                e
            })?;
        }

        tracing::info!(
            "Component scan completed, registered {} bean definition(s)",
            total
        );
        Ok(total)
    }
}
