use vernal_core::prelude::*;

mod service {
    use std::any::Any;
    use std::sync::Arc;

    use vernal_core::prelude::*;
    use vernal_core_macros::{BeanPostProcessor, Component};

    /// 订单服务 - 配置注入
    #[derive(Component, Debug)]
    #[bean("orderService")]
    pub struct OrderService {
        #[value("order.prefix", default = "ORD")]
        prefix: String,
    }

    impl OrderService {
        pub fn place_order(&self, item: &str) -> String {
            format!("{}-{}", self.prefix, item)
        }
    }

    /// 用户服务 - 自动注入依赖和配置
    ///
    /// 依赖按字段名匹配：order_service 解析名为 orderService 的 bean
    #[derive(Component)]
    #[bean("userService")]
    #[init]
    #[name_aware]
    pub struct UserService {
        #[autowired]
        order_service: Arc<OrderService>,

        #[value("app.greeting", default = "Hello")]
        greeting: String,

        bean_name: String,
    }

    impl UserService {
        // BeanNameAware 回调
        fn set_bean_name(&mut self, name: &str) {
            self.bean_name = name.to_string();
        }

        // 初始化回调，在依赖注入和 before 钩子之后执行
        fn init(&mut self) -> ContainerResult<()> {
            tracing::info!("UserService '{}' initialized", self.bean_name);
            Ok(())
        }

        pub fn greet(&self, user: &str) -> String {
            format!(
                "{} {}! Your order: {}",
                self.greeting,
                user,
                self.order_service.place_order("book")
            )
        }
    }

    /// 审计记录 - 原型作用域，每次获取都是新实例
    #[derive(Component)]
    #[bean("auditTrail")]
    #[scope("prototype")]
    pub struct AuditTrail {
        #[autowired]
        order_service: Arc<OrderService>,

        entries: Vec<String>,
    }

    impl AuditTrail {
        pub fn record(&mut self, action: &str) {
            self.entries
                .push(format!("{}: {}", self.order_service.place_order("audit"), action));
        }

        pub fn entries(&self) -> &[String] {
            &self.entries
        }
    }

    /// 审计包装器 - 由后置处理器替换 userService 时返回
    pub struct AuditedUserService {
        inner: Arc<UserService>,
    }

    impl AuditedUserService {
        pub fn greet(&self, user: &str) -> String {
            tracing::info!("audit: greet({})", user);
            self.inner.greet(user)
        }
    }

    /// 审计后置处理器
    ///
    /// after 钩子把 userService 替换成 AuditedUserService 包装器，
    /// 之后 get_bean("userService") 返回的就是包装器
    #[derive(BeanPostProcessor, Component, Default)]
    pub struct AuditBeanPostProcessor;

    impl BeanPostProcessor for AuditBeanPostProcessor {
        fn post_process_after_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            if bean_name == "userService" {
                let inner = bean.downcast::<UserService>().map_err(|_| {
                    ContainerError::TypeMismatch {
                        expected: std::any::type_name::<UserService>().to_string(),
                        found: "unknown".to_string(),
                    }
                })?;

                tracing::info!("Wrapping '{}' with audit proxy", bean_name);
                return Ok(Arc::new(AuditedUserService { inner }));
            }

            Ok(bean)
        }

        fn name(&self) -> &str {
            "AuditBeanPostProcessor"
        }
    }
}

fn main() -> ContainerResult<()> {
    // 查找配置文件，支持从工作区根目录或 demo 目录运行
    let config_paths = ["demos/app-demo/application.toml", "application.toml"];
    let config_file = config_paths
        .iter()
        .find(|path| std::path::Path::new(path).exists())
        .unwrap_or(&"application.toml");

    let context = VernalApplication::new("VernalDemo")
        .config_file(*config_file)
        .env_prefix("APP_")
        .scan("app_demo::service")
        .run()?;

    // userService 已经被后置处理器替换为审计包装器
    let user_service = context
        .get_bean("userService")?
        .downcast::<service::AuditedUserService>()
        .map_err(|_| ContainerError::Custom("userService is not wrapped".to_string()))?;

    println!("{}", user_service.greet("Alice"));

    // 原型 bean：两次获取得到两个独立实例
    let trail_a = context.get_bean("auditTrail")?;
    let trail_b = context.get_bean("auditTrail")?;
    println!(
        "auditTrail instances are distinct: {}",
        !std::sync::Arc::ptr_eq(&trail_a, &trail_b)
    );

    // 原型实例归调用方所有，容器不再跟踪
    let mut trail = trail_a
        .downcast::<service::AuditTrail>()
        .map_err(|_| ContainerError::Custom("auditTrail has unexpected type".to_string()))?;
    if let Some(trail) = std::sync::Arc::get_mut(&mut trail) {
        trail.record("greeted Alice");
        println!("audit entries: {:?}", trail.entries());
    }

    context.shutdown();
    Ok(())
}
