//! 统一的错误处理类型
//!
//! 容器的所有可恢复失败都通过 `ContainerError` 暴露给调用方。
//! 唯一的例外是 Bean 初始化回调：初始化失败只记录日志，
//! 创建流程继续返回已经构造好的实例（参见 `bean_factory`）。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    /// 组件扫描失败：扫描路径下没有可发现的组件，
    /// 或者某个后置处理器无法在扫描期间实例化
    #[error("component scan failed: {0}")]
    ScanFailed(String),

    /// 通过名称查找 Bean 失败：该名称没有注册过任何定义
    #[error("no bean named '{0}' is registered")]
    BeanNotFound(String),

    /// Bean 实例化失败（构造函数执行出错）
    #[error("bean creation failed: {0}")]
    BeanCreationFailed(String),

    /// 依赖注入失败：注入字段引用的 Bean 没有注册
    #[error("bean '{bean}' depends on '{dependency}' which is not registered")]
    MissingDependency { bean: String, dependency: String },

    /// 单例依赖链中检测到循环依赖
    #[error("circular dependency detected: {0}")]
    CircularDependency(String),

    /// 按类型查找 Bean 时实际类型与期望类型不一致
    #[error("bean type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// 静态依赖图校验失败（缺失依赖或循环依赖）
    #[error("dependency validation failed: {0}")]
    DependencyValidationFailed(String),

    /// 日志系统初始化失败
    #[error("failed to initialize logging: {0}")]
    LoggingInitFailed(String),

    /// 配置注入等场景的自定义错误
    #[error("{0}")]
    Custom(String),

    /// 其他错误的统一出口
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ContainerResult<T> = std::result::Result<T, ContainerError>;
