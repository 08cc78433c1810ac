//! Bean Factory - 核心容器接口
//!
//! Bean 的创建流程（固定顺序）：
//! 1. 实例化（构造函数 + 依赖注入，由组件工厂闭包完成）
//! 2. BeanNameAware 回调
//! 3. BeanPostProcessor.post_process_before_initialization
//! 4. 初始化回调（失败只记录日志，不中断创建）
//! 5. BeanPostProcessor.post_process_after_initialization
//!
//! 单例 Bean 的完整流程只执行一次，结果进入单例池；
//! 原型 Bean 每次 `get_bean` 都执行一次完整流程。

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    bean::BeanDefinition,
    bean_post_processor::BeanPostProcessor,
    error::{ContainerError, ContainerResult},
    utils::dependency::CreationTracker,
    Scope,
};

/// BeanFactory - 最基础的容器接口
///
/// 提供基本的 Bean 访问功能
///
/// 注意：此 trait 不包含泛型方法，因此可以作为 trait object 使用
pub trait BeanFactory: Send + Sync {
    /// 通过名称获取 Bean
    fn get_bean(&self, name: &str) -> ContainerResult<Arc<dyn Any + Send + Sync>>;

    /// 检查是否包含指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;
}

/// BeanFactoryExt - BeanFactory 的扩展 trait
///
/// 提供泛型方法，不能作为 trait object 使用
pub trait BeanFactoryExt: BeanFactory {
    /// 通过类型获取 Bean
    fn get_bean_by_type<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>>;

    /// 检查是否包含指定类型的 Bean
    fn contains_bean_by_type<T: Any + Send + Sync>(&self) -> bool;
}

/// ListableBeanFactory - 可列举的 Bean 工厂
pub trait ListableBeanFactory: BeanFactory {
    /// 获取所有 Bean 的名称
    fn get_bean_names(&self) -> Vec<String>;

    /// 获取 Bean 定义的数量
    fn get_bean_definition_count(&self) -> usize;
}

/// ConfigurableBeanFactory - 可配置的 Bean 工厂
pub trait ConfigurableBeanFactory: BeanFactory {
    /// 注册 Bean 定义，同名定义会被覆盖
    fn register_bean_definition(&self, name: String, definition: BeanDefinition);

    /// 检查是否包含指定的 Bean 定义
    fn contains_bean_definition(&self, name: &str) -> bool;

    /// 添加 BeanPostProcessor
    fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>);

    /// 获取所有 BeanPostProcessor
    fn get_bean_post_processors(&self) -> Vec<Arc<dyn BeanPostProcessor>>;
}

/// ConfigurableListableBeanFactory - 可配置且可列举的 Bean 工厂
pub trait ConfigurableListableBeanFactory: ListableBeanFactory + ConfigurableBeanFactory {
    /// 预实例化所有非延迟加载的单例 Bean
    fn preinstantiate_singletons(&self) -> ContainerResult<()>;

    /// 销毁所有单例 Bean（调用 destroy 回调）
    fn destroy_singletons(&self);

    /// 获取所有 Bean 定义的静态依赖图（用于依赖校验）
    fn get_bean_definitions(&self) -> HashMap<String, Vec<String>>;
}

/// DefaultListableBeanFactory - ConfigurableListableBeanFactory 的默认实现
///
/// 这是实际的 Bean 容器实现，持有：
/// - Bean 定义表（组件注册表）
/// - 单例池
/// - 后置处理器链
pub struct DefaultListableBeanFactory {
    /// Bean 定义存储
    definitions: RwLock<HashMap<String, BeanDefinition>>,

    /// 单例池
    singletons: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,

    /// 类型到名称的映射
    type_to_name: RwLock<HashMap<TypeId, String>>,

    /// 循环依赖检测
    creation_tracker: CreationTracker,

    /// Bean 后置处理器列表（按优先级稳定排序，同优先级保持发现顺序）
    bean_post_processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
}

impl DefaultListableBeanFactory {
    /// 创建新的 Bean 工厂
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
            type_to_name: RwLock::new(HashMap::new()),
            creation_tracker: CreationTracker::new(),
            bean_post_processors: RwLock::new(Vec::new()),
        }
    }

    /// 执行完整的 Bean 创建流程
    fn create_bean_internal(&self, name: &str) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        let definitions = self.definitions.read();

        let definition = definitions
            .get(name)
            .ok_or_else(|| ContainerError::BeanNotFound(name.to_string()))?;

        // 循环依赖检测：该名称已经在创建中，说明依赖链绕回了自己
        if self.creation_tracker.is_creating(name) {
            let creating_chain = self.creation_tracker.current_creating();
            return Err(ContainerError::CircularDependency(format!(
                "{} -> {}",
                creating_chain.join(" -> "),
                name
            )));
        }

        self.creation_tracker.start_creating(name);

        // RAII 清理创建标记
        struct CreationGuard<'a> {
            tracker: &'a CreationTracker,
            name: String,
        }

        impl Drop for CreationGuard<'_> {
            fn drop(&mut self) {
                self.tracker.finish_creating(&self.name);
            }
        }

        let _guard = CreationGuard {
            tracker: &self.creation_tracker,
            name: name.to_string(),
        };

        // 1. 实例化 Bean（构造函数 + 依赖注入）
        let instance = definition.factory.create().map_err(|e| match e {
            // 依赖解析和循环依赖错误原样上抛，不要包装
            ContainerError::CircularDependency(_) | ContainerError::MissingDependency { .. } => e,
            other => ContainerError::BeanCreationFailed(format!("{}: {}", name, other)),
        })?;

        let mut bean: Arc<dyn Any + Send + Sync> = Arc::from(instance);

        // 2. BeanNameAware 回调
        if let Some(ref name_fn) = definition.name_callback {
            if let Some(bean_mut) = Arc::get_mut(&mut bean) {
                name_fn(bean_mut, name);
            }
        }

        // 3. BeanPostProcessor.post_process_before_initialization
        bean = self.apply_post_processors_before_initialization(bean, name)?;

        // 4. 初始化回调：失败只记录，实例按当前状态继续返回
        if let Some(ref init_fn) = definition.init_callback {
            if let Some(bean_mut) = Arc::get_mut(&mut bean) {
                if let Err(e) = init_fn(bean_mut) {
                    tracing::error!(
                        "Init callback of bean '{}' failed, keeping instance: {}",
                        name,
                        e
                    );
                }
            } else {
                tracing::warn!(
                    "Cannot run init callback on bean '{}': multiple references exist",
                    name
                );
            }
        }

        // 5. BeanPostProcessor.post_process_after_initialization
        // 代理 / 包装的唯一扩展点：钩子返回的实例就是 get_bean 的结果
        bean = self.apply_post_processors_after_initialization(bean, name)?;

        Ok(bean)
    }

    /// 应用所有 before 钩子，每个钩子的返回值传给下一个钩子
    fn apply_post_processors_before_initialization(
        &self,
        bean: Arc<dyn Any + Send + Sync>,
        bean_name: &str,
    ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        let processors = self.bean_post_processors.read();
        let mut current_bean = bean;

        for processor in processors.iter() {
            current_bean = processor.post_process_before_initialization(current_bean, bean_name)?;
        }

        Ok(current_bean)
    }

    /// 应用所有 after 钩子，链式语义与 before 钩子相同
    fn apply_post_processors_after_initialization(
        &self,
        bean: Arc<dyn Any + Send + Sync>,
        bean_name: &str,
    ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        let processors = self.bean_post_processors.read();
        let mut current_bean = bean;

        for processor in processors.iter() {
            current_bean = processor.post_process_after_initialization(current_bean, bean_name)?;
        }

        Ok(current_bean)
    }
}

impl Default for DefaultListableBeanFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanFactory for DefaultListableBeanFactory {
    fn get_bean(&self, name: &str) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
        tracing::trace!("Requesting bean: '{}'", name);

        let scope = {
            let definitions = self.definitions.read();

            let definition = definitions.get(name).ok_or_else(|| {
                tracing::debug!("Bean '{}' not found in container", name);
                ContainerError::BeanNotFound(name.to_string())
            })?;

            definition.scope
        };

        match scope {
            Scope::Singleton => {
                {
                    let singletons = self.singletons.read();

                    if let Some(bean) = singletons.get(name) {
                        tracing::debug!("Returning cached instance of singleton bean '{}'", name);
                        return Ok(Arc::clone(bean));
                    }
                }

                tracing::info!("Creating shared instance of singleton bean '{}'", name);

                let bean = self.create_bean_internal(name)?;

                // 单例池按先写胜出填充：并发启动时第一个写入者获胜，
                // 后续读取总是返回池中的那一个实例
                let mut singletons = self.singletons.write();
                let pooled = singletons
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::clone(&bean));

                Ok(Arc::clone(pooled))
            }
            Scope::Prototype => {
                tracing::debug!("Creating new instance of prototype bean '{}'", name);
                self.create_bean_internal(name)
            }
        }
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }
}

impl BeanFactoryExt for DefaultListableBeanFactory {
    fn get_bean_by_type<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        // 首先尝试通过 TypeId 查找
        let name_opt = {
            let type_to_name = self.type_to_name.read();
            type_to_name.get(&type_id).cloned()
        };

        // TypeId 查找失败，回退到类型名称匹配
        let name_opt = name_opt.or_else(|| {
            let definitions = self.definitions.read();
            definitions
                .iter()
                .find(|(_, definition)| definition.factory.type_name() == type_name)
                .map(|(name, _)| name.clone())
        });

        match name_opt {
            Some(name) => {
                let bean = self.get_bean(&name)?;
                bean.downcast::<T>()
                    .map_err(|_| ContainerError::TypeMismatch {
                        expected: type_name.to_string(),
                        found: "unknown".to_string(),
                    })
            }
            None => Err(ContainerError::BeanNotFound(format!(
                "no bean found for type '{}'",
                type_name
            ))),
        }
    }

    fn contains_bean_by_type<T: Any + Send + Sync>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if self.type_to_name.read().contains_key(&type_id) {
            return true;
        }

        let definitions = self.definitions.read();
        definitions
            .values()
            .any(|definition| definition.factory.type_name() == type_name)
    }
}

impl ListableBeanFactory for DefaultListableBeanFactory {
    fn get_bean_names(&self) -> Vec<String> {
        self.definitions.read().keys().cloned().collect()
    }

    fn get_bean_definition_count(&self) -> usize {
        self.definitions.read().len()
    }
}

impl ConfigurableBeanFactory for DefaultListableBeanFactory {
    fn register_bean_definition(&self, name: String, definition: BeanDefinition) {
        let type_id = definition.factory.type_id();
        let type_name = definition.factory.type_name();

        tracing::trace!(
            "Registering bean: name='{}', type='{}', scope={:?}",
            name,
            type_name,
            definition.scope
        );

        {
            let mut definitions = self.definitions.write();
            if definitions.insert(name.clone(), definition).is_some() {
                // 同名注册静默覆盖，只留一条告警
                tracing::warn!("Bean definition '{}' overwritten by a later registration", name);
            }
        }

        {
            let mut type_to_name = self.type_to_name.write();
            type_to_name.insert(type_id, name.clone());
        }

        tracing::debug!("Bean definition registered: '{}'", name);
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        let mut processors = self.bean_post_processors.write();
        tracing::debug!("Adding BeanPostProcessor '{}'", processor.name());
        processors.push(processor);

        // 稳定排序：order 值小的在前，同 order 保持加入顺序
        processors.sort_by_key(|p| p.order());
    }

    fn get_bean_post_processors(&self) -> Vec<Arc<dyn BeanPostProcessor>> {
        self.bean_post_processors.read().clone()
    }
}

impl ConfigurableListableBeanFactory for DefaultListableBeanFactory {
    fn preinstantiate_singletons(&self) -> ContainerResult<()> {
        let bean_names: Vec<String> = {
            let definitions = self.definitions.read();
            definitions
                .iter()
                .filter(|(_, def)| def.scope == Scope::Singleton && !def.lazy)
                .map(|(name, _)| name.clone())
                .collect()
        };

        tracing::debug!("Pre-instantiating {} singleton bean(s)", bean_names.len());

        for name in bean_names {
            self.get_bean(&name)?;
        }

        Ok(())
    }

    fn destroy_singletons(&self) {
        tracing::info!("Destroying singleton beans");

        let beans_to_destroy: Vec<(String, Arc<dyn Any + Send + Sync>)> = {
            let mut singletons = self.singletons.write();
            singletons.drain().collect()
        };

        let definitions = self.definitions.read();

        for (name, mut bean) in beans_to_destroy {
            let Some(definition) = definitions.get(&name) else {
                continue;
            };

            if let Some(ref destroy_fn) = definition.destroy_callback {
                // 只有单例池持有最后一个引用时才能执行销毁回调
                match Arc::get_mut(&mut bean) {
                    Some(bean_mut) => {
                        if let Err(e) = destroy_fn(bean_mut) {
                            tracing::warn!("Failed to destroy bean '{}': {}", name, e);
                        } else {
                            tracing::debug!("Bean '{}' destroyed", name);
                        }
                    }
                    None => {
                        tracing::warn!(
                            "Cannot destroy bean '{}': still has active references",
                            name
                        );
                    }
                }
            }
        }

        tracing::info!("Singleton beans destruction completed");
    }

    fn get_bean_definitions(&self) -> HashMap<String, Vec<String>> {
        let definitions = self.definitions.read();
        definitions
            .iter()
            .map(|(name, definition)| (name.clone(), definition.dependencies.clone()))
            .collect()
    }
}
