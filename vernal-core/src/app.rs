use std::path::Path;
use std::sync::Arc;

use crate::config::{EnvironmentPropertySource, TomlPropertySource};
use crate::context::ApplicationContext;
use crate::logging::LoggingConfig;
use crate::ContainerResult;

/// Vernal 应用程序
///
/// 提供便捷的应用启动方式：初始化日志、装配配置源、
/// 扫描组件并完成单例预实例化。
pub struct VernalApplication {
    /// 应用名称
    name: String,

    /// 要扫描的模块路径
    scan_paths: Vec<String>,

    /// 配置文件路径
    config_files: Vec<String>,

    /// 环境变量前缀
    env_prefix: String,

    /// 是否显示 banner
    show_banner: bool,

    /// 日志配置
    logging_config: Option<LoggingConfig>,
}

impl VernalApplication {
    /// 创建新的应用
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scan_paths: Vec::new(),
            config_files: vec!["application.toml".to_string()],
            env_prefix: "APP_".to_string(),
            show_banner: true,
            logging_config: None,
        }
    }

    /// 添加要扫描的模块路径
    pub fn scan(mut self, base_path: impl Into<String>) -> Self {
        self.scan_paths.push(base_path.into());
        self
    }

    /// 设置配置文件路径
    pub fn config_file(mut self, path: impl Into<String>) -> Self {
        self.config_files = vec![path.into()];
        self
    }

    /// 设置环境变量前缀
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 设置是否显示 banner
    pub fn banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// 设置日志配置
    ///
    /// 如果不设置，将使用默认配置（从环境变量读取）
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 运行应用
    ///
    /// 返回完成启动协议的应用上下文：
    /// 组件已扫描注册、依赖已校验、单例已全部实例化。
    pub fn run(self) -> ContainerResult<Arc<ApplicationContext>> {
        let logging_config = self
            .logging_config
            .clone()
            .unwrap_or_else(LoggingConfig::from_env);
        logging_config.init()?;

        let start_time = std::time::Instant::now();

        if self.show_banner {
            self.print_banner();
        }

        tracing::info!("Starting {} application", self.name);

        let mut builder = ApplicationContext::builder();

        for config_file in &self.config_files {
            self.try_load_config_file(&mut builder, config_file);
        }

        // 环境变量配置源优先级最高
        builder = builder.add_property_source(Box::new(EnvironmentPropertySource::new(
            &self.env_prefix,
        )));
        tracing::debug!("Environment variable prefix: {}", self.env_prefix);

        for base_path in &self.scan_paths {
            builder = builder.scan(base_path.clone());
        }

        let context = builder.build()?;

        tracing::info!(
            "Started {} in {}ms",
            self.name,
            start_time.elapsed().as_millis()
        );

        Ok(context)
    }

    /// 尝试加载配置文件，文件缺失或解析失败不阻断启动
    fn try_load_config_file(
        &self,
        builder: &mut crate::context::ApplicationContextBuilder,
        config_file: &str,
    ) {
        if Path::new(config_file).exists() {
            match TomlPropertySource::from_file(config_file) {
                Ok(source) => {
                    tracing::info!("Loaded configuration from: {}", config_file);
                    builder.add_property_source_mut(Box::new(source));
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", config_file, e);
                }
            }
        } else {
            tracing::debug!("Configuration file not found: {}", config_file);
        }
    }

    /// 打印 banner
    fn print_banner(&self) {
        println!();
        println!(r" __   __                    _ ");
        println!(r" \ \ / /__ _ __ _ __   __ _| |");
        println!(r"  \ V / _ \ '__| '_ \ / _` | |");
        println!(r"   | |  __/ |  | | | | (_| | |");
        println!(r"   |_|\___|_|  |_| |_|\__,_|_|");
        println!();
        println!("  :: Vernal Framework ::        (v{})", env!("CARGO_PKG_VERSION"));
        println!();
    }
}

impl Default for VernalApplication {
    fn default() -> Self {
        Self::new("VernalApplication")
    }
}
