// vernal-core: 轻量级的依赖注入容器
//
// 提供类型安全的依赖注入功能，支持：
// - 单例和原型作用域
// - 按模块路径的组件扫描（编译期注册，运行期筛选）
// - 按字段名匹配的依赖注入
// - 生命周期回调（name-aware / init / destroy）
// - Bean 初始化前后的后置处理器链（可替换实例）

pub mod app;
pub mod bean;
pub mod bean_factory;
pub mod bean_post_processor;
pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod scope;
pub mod utils;

// 重新导出常用类型
pub use app::VernalApplication;
pub use bean::{BeanDefinition, FactoryBean, FunctionFactory};
pub use bean_factory::{
    BeanFactory, BeanFactoryExt, ConfigurableBeanFactory, ConfigurableListableBeanFactory,
    DefaultListableBeanFactory, ListableBeanFactory,
};
pub use bean_post_processor::{BeanPostProcessor, BeanPostProcessorRegistration};
pub use component::{Component, ComponentRegistration};
pub use config::{
    ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource, PropertySource,
    TomlPropertySource,
};
pub use context::{ApplicationContext, ApplicationContextBuilder, Container, ShutdownHook};
pub use error::{ContainerError, ContainerResult};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use scope::Scope;

// 导出 inventory，供宏生成的注册代码使用
pub use inventory;

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::app::VernalApplication;
    pub use crate::bean::{BeanDefinition, FactoryBean, FunctionFactory};
    pub use crate::bean_factory::{
        BeanFactory, BeanFactoryExt, ConfigurableBeanFactory, ConfigurableListableBeanFactory,
        DefaultListableBeanFactory, ListableBeanFactory,
    };
    pub use crate::bean_post_processor::BeanPostProcessor;
    pub use crate::component::Component;
    pub use crate::config::{
        ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource, PropertySource,
        TomlPropertySource,
    };
    pub use crate::context::{ApplicationContext, Container};
    pub use crate::error::{ContainerError, ContainerResult};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::scope::Scope;
    pub use crate::utils;
    // Re-export anyhow for convenience
    pub use anyhow::{anyhow, Context};
}
