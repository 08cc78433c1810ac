//! 容器集成测试
//!
//! 每个场景使用独立的 fixture 模块，按模块路径扫描注册，
//! 测试之间互不干扰。

use std::sync::Arc;

use vernal_core::prelude::*;

// ==================== 基础装配 ====================

mod wiring {
    use std::sync::Arc;

    use vernal_core_macros::Component;

    #[derive(Component)]
    #[bean("serviceB")]
    pub struct ServiceB;

    #[derive(Component)]
    #[bean("serviceA")]
    pub struct ServiceA {
        #[autowired]
        pub service_b: Arc<ServiceB>,
    }
}

fn build_wiring_context() -> Arc<ApplicationContext> {
    ApplicationContext::builder()
        .scan("container_tests::wiring")
        .build()
        .expect("wiring context should build")
}

#[test]
fn test_singleton_get_bean_is_identity_stable() {
    let context = build_wiring_context();

    let first = context.get_bean("serviceA").unwrap();
    let second = context.get_bean("serviceA").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singletons_are_pooled_at_construction() {
    let context = build_wiring_context();

    assert!(context.contains_bean("serviceA"));
    assert!(context.contains_bean("serviceB"));
    assert_eq!(context.get_bean_names().len(), 2);
}

#[test]
fn test_injected_field_is_the_pooled_dependency() {
    let context = build_wiring_context();

    let service_a = context
        .get_bean("serviceA")
        .unwrap()
        .downcast::<wiring::ServiceA>()
        .unwrap();
    let service_b = context
        .get_bean("serviceB")
        .unwrap()
        .downcast::<wiring::ServiceB>()
        .unwrap();

    assert!(Arc::ptr_eq(&service_a.service_b, &service_b));
}

#[test]
fn test_get_bean_by_type() {
    let context = build_wiring_context();

    let by_type = context.get_bean_by_type::<wiring::ServiceA>().unwrap();
    let by_name = context
        .get_bean("serviceA")
        .unwrap()
        .downcast::<wiring::ServiceA>()
        .unwrap();

    assert!(Arc::ptr_eq(&by_type, &by_name));
}

#[test]
fn test_unregistered_name_fails_with_bean_not_found() {
    let context = build_wiring_context();

    let err = context.get_bean("noSuchService").unwrap_err();
    assert!(matches!(err, ContainerError::BeanNotFound(name) if name == "noSuchService"));
}

// ==================== 原型作用域 ====================

mod prototypes {
    use std::sync::Arc;

    use vernal_core_macros::Component;

    #[derive(Component)]
    #[bean("shared")]
    pub struct Shared;

    #[derive(Component)]
    #[bean("counter")]
    #[scope("prototype")]
    pub struct Counter {
        #[autowired]
        pub shared: Arc<Shared>,
    }
}

#[test]
fn test_prototype_yields_distinct_instances_with_same_shape() {
    let context = ApplicationContext::builder()
        .scan("container_tests::prototypes")
        .build()
        .unwrap();

    let shared = context
        .get_bean("shared")
        .unwrap()
        .downcast::<prototypes::Shared>()
        .unwrap();

    let instances: Vec<Arc<prototypes::Counter>> = (0..5)
        .map(|_| {
            context
                .get_bean("counter")
                .unwrap()
                .downcast::<prototypes::Counter>()
                .unwrap()
        })
        .collect();

    // 五个实例两两不同
    for (i, a) in instances.iter().enumerate() {
        for b in instances.iter().skip(i + 1) {
            assert!(!Arc::ptr_eq(a, b));
        }
    }

    // 每个实例都注入了同一个单例依赖
    for instance in &instances {
        assert!(Arc::ptr_eq(&instance.shared, &shared));
    }
}

// ==================== 后置处理器链 ====================

mod processors {
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    use vernal_core::prelude::*;
    use vernal_core_macros::{BeanPostProcessor, Component};

    pub static EVENTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    #[derive(Component)]
    #[bean("widget")]
    pub struct Widget;

    #[derive(BeanPostProcessor, Component, Default)]
    pub struct FirstProcessor;

    impl BeanPostProcessor for FirstProcessor {
        fn post_process_before_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            EVENTS.lock().unwrap().push(format!("first:before:{}", bean_name));
            Ok(bean)
        }

        fn post_process_after_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            EVENTS.lock().unwrap().push(format!("first:after:{}", bean_name));
            Ok(bean)
        }

        fn order(&self) -> i32 {
            1
        }
    }

    #[derive(BeanPostProcessor, Component, Default)]
    pub struct SecondProcessor;

    impl BeanPostProcessor for SecondProcessor {
        fn post_process_before_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            EVENTS.lock().unwrap().push(format!("second:before:{}", bean_name));
            Ok(bean)
        }

        fn post_process_after_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            EVENTS.lock().unwrap().push(format!("second:after:{}", bean_name));
            Ok(bean)
        }

        fn order(&self) -> i32 {
            2
        }
    }
}

#[test]
fn test_post_processors_run_once_per_phase_in_order() {
    let context = ApplicationContext::builder()
        .scan("container_tests::processors")
        .build()
        .unwrap();

    // 单例在构建阶段就已经完整走过两个钩子
    let widget_events: Vec<String> = processors::EVENTS
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.ends_with(":widget"))
        .cloned()
        .collect();

    assert_eq!(
        widget_events,
        vec![
            "first:before:widget",
            "second:before:widget",
            "first:after:widget",
            "second:after:widget",
        ]
    );

    // 再次获取走单例池，钩子不会重复执行
    context.get_bean("widget").unwrap();

    let count = processors::EVENTS
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.ends_with(":widget"))
        .count();
    assert_eq!(count, 4);
}

// ==================== before 钩子替换实例 ====================

mod substitution {
    use std::any::Any;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use vernal_core::prelude::*;
    use vernal_core_macros::{BeanPostProcessor, Component};

    pub static ORIGINAL_INIT_RAN: AtomicBool = AtomicBool::new(false);
    pub static WITNESS_SAW_WRAPPED: AtomicBool = AtomicBool::new(false);

    #[derive(Component)]
    #[bean("greeter")]
    #[init]
    pub struct Greeter;

    impl Greeter {
        fn init(&mut self) -> ContainerResult<()> {
            ORIGINAL_INIT_RAN.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    pub struct WrappedGreeter;

    /// before 钩子替换 greeter 实例
    #[derive(BeanPostProcessor, Component, Default)]
    pub struct SwapProcessor;

    impl BeanPostProcessor for SwapProcessor {
        fn post_process_before_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            if bean_name == "greeter" {
                return Ok(Arc::new(WrappedGreeter));
            }
            Ok(bean)
        }

        fn order(&self) -> i32 {
            10
        }
    }

    /// 链上更靠后的钩子必须看到替换后的实例
    #[derive(BeanPostProcessor, Component, Default)]
    pub struct WitnessProcessor;

    impl BeanPostProcessor for WitnessProcessor {
        fn post_process_before_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            if bean_name == "greeter" && bean.downcast_ref::<WrappedGreeter>().is_some() {
                WITNESS_SAW_WRAPPED.store(true, Ordering::SeqCst);
            }
            Ok(bean)
        }

        fn order(&self) -> i32 {
            20
        }
    }
}

#[test]
fn test_before_hook_substitution_is_visible_downstream() {
    use std::sync::atomic::Ordering;

    let context = ApplicationContext::builder()
        .scan("container_tests::substitution")
        .build()
        .unwrap();

    // get_bean 返回替换后的实例
    let bean = context.get_bean("greeter").unwrap();
    assert!(bean.downcast_ref::<substitution::WrappedGreeter>().is_some());

    // 后续 before 钩子看到的已经是替换实例
    assert!(substitution::WITNESS_SAW_WRAPPED.load(Ordering::SeqCst));

    // 替换实例不声明原类型的初始化回调，原回调被跳过
    assert!(!substitution::ORIGINAL_INIT_RAN.load(Ordering::SeqCst));
}

// ==================== after 钩子包装（单例与原型） ====================

mod after_wrap {
    use std::any::Any;
    use std::sync::Arc;

    use vernal_core::prelude::*;
    use vernal_core_macros::{BeanPostProcessor, Component};

    #[derive(Component)]
    #[bean("cache")]
    pub struct Cache;

    #[derive(Component)]
    #[bean("session")]
    #[scope("prototype")]
    pub struct Session;

    pub struct Wrapper;

    #[derive(BeanPostProcessor, Component, Default)]
    pub struct WrapProcessor;

    impl BeanPostProcessor for WrapProcessor {
        fn post_process_after_initialization(
            &self,
            bean: Arc<dyn Any + Send + Sync>,
            bean_name: &str,
        ) -> ContainerResult<Arc<dyn Any + Send + Sync>> {
            if bean_name == "cache" || bean_name == "session" {
                return Ok(Arc::new(Wrapper));
            }
            Ok(bean)
        }
    }
}

#[test]
fn test_after_hook_wraps_singleton_and_prototype() {
    let context = ApplicationContext::builder()
        .scan("container_tests::after_wrap")
        .build()
        .unwrap();

    // 单例：返回包装器且身份稳定
    let first = context.get_bean("cache").unwrap();
    let second = context.get_bean("cache").unwrap();
    assert!(first.downcast_ref::<after_wrap::Wrapper>().is_some());
    assert!(Arc::ptr_eq(&first, &second));

    // 原型：每次都是新的包装器
    let one = context.get_bean("session").unwrap();
    let two = context.get_bean("session").unwrap();
    assert!(one.downcast_ref::<after_wrap::Wrapper>().is_some());
    assert!(two.downcast_ref::<after_wrap::Wrapper>().is_some());
    assert!(!Arc::ptr_eq(&one, &two));
}

// ==================== 生命周期回调 ====================

mod lifecycle {
    use std::sync::atomic::{AtomicBool, Ordering};

    use vernal_core::prelude::*;
    use vernal_core_macros::Component;

    pub static DESTROYED: AtomicBool = AtomicBool::new(false);

    #[derive(Component)]
    #[bean("namedBean")]
    #[name_aware]
    #[destroy]
    pub struct NamedBean {
        pub observed_name: String,
    }

    impl NamedBean {
        fn set_bean_name(&mut self, name: &str) {
            self.observed_name = name.to_string();
        }

        fn destroy(&mut self) -> ContainerResult<()> {
            DESTROYED.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Component)]
    #[bean("faultyBean")]
    #[init]
    pub struct FaultyBean;

    impl FaultyBean {
        fn init(&mut self) -> ContainerResult<()> {
            Err(ContainerError::Custom("init exploded".to_string()))
        }
    }
}

#[test]
fn test_name_aware_callback_delivers_registered_name() {
    let context = ApplicationContext::builder()
        .scan("container_tests::lifecycle")
        .build()
        .unwrap();

    let bean = context
        .get_bean("namedBean")
        .unwrap()
        .downcast::<lifecycle::NamedBean>()
        .unwrap();

    assert_eq!(bean.observed_name, "namedBean");
}

#[test]
fn test_init_failure_is_recovered_and_instance_returned() {
    // 初始化回调失败只记录日志，容器构建和查找都不受影响
    let context = ApplicationContext::builder()
        .scan("container_tests::lifecycle")
        .build()
        .unwrap();

    let bean = context.get_bean("faultyBean").unwrap();
    assert!(bean.downcast_ref::<lifecycle::FaultyBean>().is_some());
}

#[test]
fn test_shutdown_runs_destroy_callbacks() {
    use std::sync::atomic::Ordering;

    let context = ApplicationContext::builder()
        .scan("container_tests::lifecycle")
        .build()
        .unwrap();

    context.shutdown();
    assert!(lifecycle::DESTROYED.load(Ordering::SeqCst));
}

// ==================== 延迟初始化 ====================

mod lazy_beans {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vernal_core::prelude::*;
    use vernal_core_macros::Component;

    pub static CREATED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Component)]
    #[bean("lazyService")]
    #[lazy]
    #[init]
    pub struct LazyService;

    impl LazyService {
        fn init(&mut self) -> ContainerResult<()> {
            CREATED.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[test]
fn test_lazy_singleton_is_created_on_first_lookup() {
    use std::sync::atomic::Ordering;

    let context = ApplicationContext::builder()
        .scan("container_tests::lazy_beans")
        .build()
        .unwrap();

    // 构建完成后延迟单例尚未创建
    assert_eq!(lazy_beans::CREATED.load(Ordering::SeqCst), 0);

    // 首次查找触发创建，之后复用池中的实例
    let first = context.get_bean("lazyService").unwrap();
    let second = context.get_bean("lazyService").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(lazy_beans::CREATED.load(Ordering::SeqCst), 1);
}

// ==================== 配置注入 ====================

mod configured {
    use vernal_core_macros::Component;

    #[derive(Component)]
    #[bean("configuredService")]
    pub struct ConfiguredService {
        #[value("svc.label")]
        pub label: String,

        #[value("svc.retries", default = 3)]
        pub retries: i32,
    }
}

#[test]
fn test_value_fields_resolve_from_environment() {
    let context = ApplicationContext::builder()
        .add_property_source(Box::new(
            MapPropertySource::new("test")
                .with_property("svc.label", ConfigValue::String("alpha".into())),
        ))
        .scan("container_tests::configured")
        .build()
        .unwrap();

    let service = context
        .get_bean("configuredService")
        .unwrap()
        .downcast::<configured::ConfiguredService>()
        .unwrap();

    assert_eq!(service.label, "alpha");
    assert_eq!(service.retries, 3);
}

// ==================== 错误路径 ====================

mod dangling {
    use std::sync::Arc;

    use vernal_core_macros::Component;

    #[derive(Component)]
    #[bean("orphan")]
    #[scope("prototype")]
    pub struct Orphan {
        // ghostService 在任何扫描路径下都不存在
        #[autowired("ghostService")]
        pub ghost: Arc<super::wiring::ServiceB>,
    }
}

#[test]
fn test_scan_of_empty_namespace_fails() {
    let result = ApplicationContext::builder()
        .scan("container_tests::no_such_module")
        .build();

    assert!(matches!(result, Err(ContainerError::ScanFailed(_))));
}

#[test]
fn test_missing_dependency_is_reported_at_validation() {
    // 静态依赖校验在实例化之前发现缺失的依赖
    let result = ApplicationContext::builder()
        .scan("container_tests::dangling")
        .build();

    assert!(matches!(
        result,
        Err(ContainerError::DependencyValidationFailed(_))
    ));
}

#[test]
fn test_missing_dependency_is_reported_at_injection() {
    // 绕过构建器的静态校验，直接注册后查找，
    // 注入阶段的查找失败以 MissingDependency 上报
    let context = Arc::new(ApplicationContext::new());
    <dangling::Orphan as Component>::register(&context).unwrap();

    let err = context.get_bean("orphan").unwrap_err();
    assert!(matches!(
        err,
        ContainerError::MissingDependency { bean, dependency }
            if bean == "orphan" && dependency == "ghostService"
    ));
}

#[test]
fn test_shutdown_hooks_run_in_registration_order() {
    use std::sync::Mutex;

    static ORDER: Mutex<Vec<u8>> = Mutex::new(Vec::new());

    let context = ApplicationContext::builder()
        .register_singleton("placeholder", || Ok(()))
        .build()
        .unwrap();

    context.register_shutdown_hook(|| {
        ORDER.lock().unwrap().push(1);
        Ok(())
    });
    context.register_shutdown_hook(|| {
        ORDER.lock().unwrap().push(2);
        Ok(())
    });

    context.shutdown();
    assert_eq!(*ORDER.lock().unwrap(), vec![1, 2]);
}

#[test]
fn test_runtime_circular_dependency_fails_fast() {
    struct Ping;
    struct Pong;

    let context = Arc::new(ApplicationContext::new());

    let lookup = Arc::clone(&context);
    context.register_singleton("ping", move || {
        lookup.get_bean("pong")?;
        Ok(Ping)
    });

    let lookup = Arc::clone(&context);
    context.register_singleton("pong", move || {
        lookup.get_bean("ping")?;
        Ok(Pong)
    });

    let err = context.get_bean("ping").unwrap_err();
    assert!(matches!(err, ContainerError::CircularDependency(_)));
}

#[test]
fn test_duplicate_registration_overwrites_silently() {
    struct First;
    struct Second;

    let context = ApplicationContext::builder()
        .register_singleton("dup", || Ok(First))
        .register_singleton("dup", || Ok(Second))
        .build()
        .unwrap();

    let bean = context.get_bean("dup").unwrap();
    assert!(bean.downcast_ref::<Second>().is_some());
    assert!(bean.downcast_ref::<First>().is_none());
}
