use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bean_factory::{
    BeanFactory, BeanFactoryExt, ConfigurableBeanFactory, ConfigurableListableBeanFactory,
    DefaultListableBeanFactory, ListableBeanFactory,
};
use crate::bean_post_processor::BeanPostProcessor;
use crate::{
    bean::{BeanDefinition, FunctionFactory},
    config::Environment,
    error::{ContainerError, ContainerResult},
    Scope,
};

/// Shutdown hook 类型
pub type ShutdownHook = Box<dyn Fn() -> ContainerResult<()> + Send + Sync>;

/// 容器 trait - 定义依赖注入容器的核心接口
pub trait Container: Send + Sync {
    /// 注册 Bean 定义
    fn register(&self, definition: BeanDefinition);

    /// 通过名称获取 Bean
    fn get_bean(&self, name: &str) -> ContainerResult<Arc<dyn Any + Send + Sync>>;

    /// 通过类型获取 Bean
    fn get_bean_by_type<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>>;

    /// 检查是否包含指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;

    /// 检查是否包含指定类型的 Bean
    fn contains_bean_by_type<T: Any + Send + Sync>(&self) -> bool;

    /// 获取所有 Bean 的名称
    fn get_bean_names(&self) -> Vec<String>;
}

/// 应用上下文 - Container 的默认实现
///
/// ApplicationContext 持有 BeanFactory 和 Environment，
/// 由构建器创建：构建时完成组件扫描和单例的预实例化。
pub struct ApplicationContext {
    /// Bean 工厂 - 负责 Bean 的创建和管理
    bean_factory: Arc<DefaultListableBeanFactory>,

    /// 配置环境
    environment: Arc<Environment>,

    /// Shutdown hooks
    shutdown_hooks: RwLock<Vec<ShutdownHook>>,
}

impl ApplicationContext {
    /// 创建新的应用上下文
    pub fn new() -> Self {
        Self::new_with_environment(None)
    }

    pub(crate) fn new_with_environment(environment: Option<Arc<Environment>>) -> Self {
        Self {
            bean_factory: Arc::new(DefaultListableBeanFactory::new()),
            environment: environment.unwrap_or_else(|| Arc::new(Environment::new())),
            shutdown_hooks: RwLock::new(Vec::new()),
        }
    }

    /// 获取内部的 BeanFactory
    pub fn get_bean_factory(&self) -> &Arc<DefaultListableBeanFactory> {
        &self.bean_factory
    }

    /// 获取 Environment
    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// 获取 Environment（别名，供宏生成代码使用）
    pub fn get_environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// 注册 shutdown hook
    ///
    /// Shutdown hook 会在 `shutdown` 时按注册顺序执行
    pub fn register_shutdown_hook<F>(&self, hook: F)
    where
        F: Fn() -> ContainerResult<()> + Send + Sync + 'static,
    {
        let mut hooks = self.shutdown_hooks.write();
        hooks.push(Box::new(hook));
        tracing::debug!("Registered shutdown hook, total: {}", hooks.len());
    }

    /// 注册 BeanPostProcessor
    ///
    /// 后置处理器会在每个 Bean 初始化前后被调用，按优先级顺序执行
    pub fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        self.bean_factory.add_bean_post_processor(processor);
    }

    /// 构建器模式创建上下文
    pub fn builder() -> ApplicationContextBuilder {
        ApplicationContextBuilder::new()
    }

    /// 注册单例 Bean
    pub fn register_singleton<T, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> ContainerResult<T> + Send + Sync + 'static,
    {
        let definition = BeanDefinition::new(name.into(), FunctionFactory::new(factory))
            .with_scope(Scope::Singleton);
        self.register(definition);
    }

    /// 注册原型 Bean
    pub fn register_prototype<T, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> ContainerResult<T> + Send + Sync + 'static,
    {
        let definition = BeanDefinition::new(name.into(), FunctionFactory::new(factory))
            .with_scope(Scope::Prototype);
        self.register(definition);
    }

    /// 初始化所有非延迟加载的单例 Bean
    pub fn initialize(&self) -> ContainerResult<()> {
        self.bean_factory.preinstantiate_singletons()
    }

    /// 校验所有 Bean 的静态依赖关系
    ///
    /// 检查：
    /// - 缺失的依赖（声明的依赖没有注册）
    /// - 循环依赖（A -> B -> C -> A）
    ///
    /// 在组件扫描之后、单例实例化之前调用
    pub fn validate_dependencies(&self) -> ContainerResult<()> {
        use crate::utils::dependency::validate_dependency_graph;

        let dependency_map = self.bean_factory.get_bean_definitions();

        validate_dependency_graph(&dependency_map)
            .map_err(|e| ContainerError::DependencyValidationFailed(e.to_string()))?;

        tracing::debug!(
            "Dependency validation passed for {} bean(s)",
            dependency_map.len()
        );

        Ok(())
    }

    /// 关闭容器：执行所有 shutdown hooks 并销毁单例 Bean
    ///
    /// 注意：只有单例池持有最后一个引用时才能调用 destroy 回调
    pub fn shutdown(&self) {
        tracing::info!("Starting container shutdown");

        let hooks = self.shutdown_hooks.read();
        if !hooks.is_empty() {
            tracing::info!("Executing {} shutdown hook(s)", hooks.len());
        }
        for (idx, hook) in hooks.iter().enumerate() {
            match hook() {
                Ok(_) => tracing::debug!("Shutdown hook {} executed", idx + 1),
                Err(e) => tracing::warn!("Shutdown hook {} failed: {}", idx + 1, e),
            }
        }
        drop(hooks);

        self.bean_factory.destroy_singletons();

        tracing::info!("Container shutdown complete");
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for ApplicationContext {
    fn register(&self, definition: BeanDefinition) {
        self.bean_factory
            .register_bean_definition(definition.name.clone(), definition)
    }

    fn get_bean(&self, name: &str) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        self.bean_factory.get_bean(name)
    }

    fn get_bean_by_type<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        self.bean_factory.get_bean_by_type::<T>()
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.bean_factory.contains_bean(name)
    }

    fn contains_bean_by_type<T: Any + Send + Sync>(&self) -> bool {
        self.bean_factory.contains_bean_by_type::<T>()
    }

    fn get_bean_names(&self) -> Vec<String> {
        self.bean_factory.get_bean_names()
    }
}

/// 应用上下文构建器
///
/// 构建流程对应容器的启动协议：
/// 扫描（填充注册表和后置处理器链）-> 依赖校验 -> 单例预实例化
pub struct ApplicationContextBuilder {
    context: ApplicationContext,
    scan_paths: Vec<String>,
}

impl ApplicationContextBuilder {
    pub fn new() -> Self {
        Self {
            context: ApplicationContext::new(),
            scan_paths: Vec::new(),
        }
    }

    /// 添加要扫描的模块路径
    ///
    /// 例如 `"app_demo::service"` 会注册该模块（含子模块）下
    /// 所有 `#[derive(Component)]` 标记的类型
    pub fn scan(mut self, base_path: impl Into<String>) -> Self {
        self.scan_paths.push(base_path.into());
        self
    }

    /// 注册 Bean 定义
    pub fn register(self, definition: BeanDefinition) -> Self {
        self.context.register(definition);
        self
    }

    /// 注册单例 Bean
    pub fn register_singleton<T, F>(self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> ContainerResult<T> + Send + Sync + 'static,
    {
        self.context.register_singleton(name, factory);
        self
    }

    /// 注册原型 Bean
    pub fn register_prototype<T, F>(self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> ContainerResult<T> + Send + Sync + 'static,
    {
        self.context.register_prototype(name, factory);
        self
    }

    /// 添加配置源到 Environment
    pub fn add_property_source(self, source: Box<dyn crate::PropertySource>) -> Self {
        self.context.environment.add_property_source(source);
        self
    }

    /// 添加配置源（可变引用版本，不消费 self）
    pub(crate) fn add_property_source_mut(&mut self, source: Box<dyn crate::PropertySource>) {
        self.context.environment.add_property_source(source);
    }

    /// 构建上下文
    ///
    /// 依次执行组件扫描、依赖校验和单例预实例化；
    /// 任何一步失败都会使构建失败
    pub fn build(self) -> ContainerResult<Arc<ApplicationContext>> {
        let context = Arc::new(self.context);

        for base_path in &self.scan_paths {
            context.scan_components(base_path)?;
        }

        context.validate_dependencies()?;
        context.initialize()?;

        Ok(context)
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
