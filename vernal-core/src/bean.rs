use std::any::{Any, TypeId};
use std::fmt;

use crate::{ContainerResult, Scope};

/// Bean 实例工厂 trait - 负责创建某个具体类型的实例
///
/// 组件宏会为每个组件生成一个闭包工厂（[`FunctionFactory`]），
/// 闭包内部完成实例化和依赖注入两个步骤。
pub trait FactoryBean: Send + Sync {
    /// 创建一个新的 Bean 实例
    fn create(&self) -> ContainerResult<Box<dyn Any + Send + Sync>>;

    /// 获取 Bean 的类型 ID
    fn type_id(&self) -> TypeId;

    /// 获取 Bean 的类型名称
    fn type_name(&self) -> &'static str;
}

/// 生命周期回调类型
pub type InitCallback = Box<dyn Fn(&mut dyn Any) -> ContainerResult<()> + Send + Sync>;
pub type DestroyCallback = Box<dyn Fn(&mut dyn Any) -> ContainerResult<()> + Send + Sync>;

/// BeanNameAware 回调类型 - 向实例通告它注册时使用的名称
pub type NameCallback = Box<dyn Fn(&mut dyn Any, &str) + Send + Sync>;

/// Bean 定义 - 描述如何创建和管理 Bean
///
/// 每个被发现的组件在扫描阶段生成一个定义，之后定义本身不再修改；
/// 同名的后注册定义会整体覆盖先注册的定义。
pub struct BeanDefinition {
    /// Bean 的名称
    pub name: String,

    /// Bean 的作用域
    pub scope: Scope,

    /// Bean 实例工厂
    pub factory: Box<dyn FactoryBean>,

    /// 是否延迟初始化（仅对单例有效）
    pub lazy: bool,

    /// Bean 的依赖列表（用于静态依赖分析）
    pub dependencies: Vec<String>,

    /// 初始化回调
    pub init_callback: Option<InitCallback>,

    /// 销毁回调
    pub destroy_callback: Option<DestroyCallback>,

    /// BeanNameAware 回调，在依赖注入完成后、初始化之前执行
    pub name_callback: Option<NameCallback>,
}

impl BeanDefinition {
    /// 创建新的 Bean 定义
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: FactoryBean + 'static,
    {
        Self {
            name: name.into(),
            scope: Scope::default(),
            factory: Box::new(factory),
            lazy: false,
            dependencies: Vec::new(),
            init_callback: None,
            destroy_callback: None,
            name_callback: None,
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 设置依赖列表
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// 设置初始化回调
    pub fn with_init<F>(mut self, init_fn: F) -> Self
    where
        F: Fn(&mut dyn Any) -> ContainerResult<()> + Send + Sync + 'static,
    {
        self.init_callback = Some(Box::new(init_fn));
        self
    }

    /// 设置销毁回调
    pub fn with_destroy<F>(mut self, destroy_fn: F) -> Self
    where
        F: Fn(&mut dyn Any) -> ContainerResult<()> + Send + Sync + 'static,
    {
        self.destroy_callback = Some(Box::new(destroy_fn));
        self
    }

    /// 设置 BeanNameAware 回调
    pub fn with_name_aware<F>(mut self, name_fn: F) -> Self
    where
        F: Fn(&mut dyn Any, &str) + Send + Sync + 'static,
    {
        self.name_callback = Some(Box::new(name_fn));
        self
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("lazy", &self.lazy)
            .field("dependencies", &self.dependencies)
            .field("type_name", &self.factory.type_name())
            .finish()
    }
}

/// 简单的函数工厂实现
pub struct FunctionFactory<T, F>
where
    T: Any + Send + Sync,
    F: Fn() -> ContainerResult<T> + Send + Sync,
{
    factory_fn: F,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T, F> FunctionFactory<T, F>
where
    T: Any + Send + Sync,
    F: Fn() -> ContainerResult<T> + Send + Sync,
{
    pub fn new(factory_fn: F) -> Self {
        Self {
            factory_fn,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T, F> FactoryBean for FunctionFactory<T, F>
where
    T: Any + Send + Sync,
    F: Fn() -> ContainerResult<T> + Send + Sync,
{
    fn create(&self) -> ContainerResult<Box<dyn Any + Send + Sync>> {
        let instance = (self.factory_fn)()?;
        Ok(Box::new(instance))
    }

    fn type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
