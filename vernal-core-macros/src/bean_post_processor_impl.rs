use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::attribute_helpers::{get_bean_name, to_camel_case};

pub(crate) fn derive_bean_post_processor_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let struct_name = &input.ident;

    // 与 Component 派生宏保持一致的 bean 命名规则
    let bean_name =
        get_bean_name(&input.attrs).unwrap_or_else(|| to_camel_case(&struct_name.to_string()));

    let expanded = quote! {
        // 提交 BeanPostProcessor 注册项到 inventory
        //
        // 扫描阶段通过无参构造立即实例化，先于任何普通 Bean 的创建
        vernal_core::inventory::submit! {
            vernal_core::BeanPostProcessorRegistration {
                bean_name: #bean_name,
                type_name: ::std::stringify!(#struct_name),
                module_path: ::std::module_path!(),
                constructor: || {
                    let processor = <#struct_name as ::std::default::Default>::default();
                    Ok(::std::sync::Arc::new(processor)
                        as ::std::sync::Arc<dyn vernal_core::BeanPostProcessor>)
                },
            }
        }
    };

    TokenStream::from(expanded)
}
