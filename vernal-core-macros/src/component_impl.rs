use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

use crate::attribute_helpers::{
    get_bean_name, get_callback_method, get_lazy, get_scope, snake_to_camel_case, to_camel_case,
};
use crate::value_injection::{generate_value_injection, get_value_info};

pub(crate) fn derive_component_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let bean_name = get_bean_name(&input.attrs).unwrap_or_else(|| {
        // 默认使用类型名的 camelCase 形式
        // 例如: UserService -> userService
        to_camel_case(&name.to_string())
    });

    let scope = get_scope(&input.attrs);
    let lazy = get_lazy(&input.attrs);
    let init_method = get_callback_method(&input.attrs, "init", "init");
    let destroy_method = get_callback_method(&input.attrs, "destroy", "destroy");
    let name_aware_method = get_callback_method(&input.attrs, "name_aware", "set_bean_name");

    // 获取所有命名字段
    let all_fields = if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            fields.named.iter().collect::<Vec<_>>()
        } else {
            vec![]
        }
    } else {
        vec![]
    };

    // 每个字段生成一条 let 绑定：
    // - #[autowired] 字段通过 get_bean 按名称解析
    // - #[value] 字段从 Environment 解析配置
    // - 其余字段通过 Default::default() 填充
    let field_bindings = all_fields.iter().map(|field| {
        let field_name = &field.ident;

        let is_autowired = field
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("autowired"));

        if is_autowired {
            let field_type = &field.ty;
            let inner_type = extract_arc_type(field_type);

            // 依赖的 bean 名称：显式指定优先，否则按字段名推导
            // 例如字段 order_service 解析名为 orderService 的 bean
            let dependency_name = get_autowired_bean_name(&field.attrs).unwrap_or_else(|| {
                snake_to_camel_case(
                    &field_name
                        .as_ref()
                        .map(|i| i.to_string())
                        .unwrap_or_default(),
                )
            });

            return quote! {
                let #field_name = {
                    let bean = vernal_core::Container::get_bean(context.as_ref(), #dependency_name)
                        .map_err(|e| match e {
                            vernal_core::ContainerError::BeanNotFound(dependency) => {
                                vernal_core::ContainerError::MissingDependency {
                                    bean: #bean_name.to_string(),
                                    dependency,
                                }
                            }
                            other => other,
                        })?;
                    bean.downcast::<#inner_type>()
                        .map_err(|_| vernal_core::ContainerError::TypeMismatch {
                            expected: ::std::any::type_name::<#inner_type>().to_string(),
                            found: "unknown".to_string(),
                        })?
                };
            };
        }

        if let Some(value_info) = get_value_info(&field.attrs) {
            return generate_value_injection(field_name, &field.ty, &value_info);
        }

        quote! {
            let #field_name = ::std::default::Default::default();
        }
    });

    // 收集所有字段名
    let field_names: Vec<_> = all_fields.iter().map(|f| &f.ident).collect();

    // 生成依赖列表（供静态依赖图校验使用），与注入时使用的名称一致
    let dependency_names: Vec<String> = all_fields
        .iter()
        .filter(|field| {
            field
                .attrs
                .iter()
                .any(|attr| attr.path().is_ident("autowired"))
        })
        .map(|field| {
            get_autowired_bean_name(&field.attrs).unwrap_or_else(|| {
                snake_to_camel_case(
                    &field
                        .ident
                        .as_ref()
                        .map(|i| i.to_string())
                        .unwrap_or_default(),
                )
            })
        })
        .collect();

    // 生成回调实现
    let init_callback_impl = callback_impl(&init_method, quote! { init_callback });
    let destroy_callback_impl = callback_impl(&destroy_method, quote! { destroy_callback });

    let name_callback_impl = if let Some(method_name) = &name_aware_method {
        let method_ident = syn::Ident::new(method_name, proc_macro2::Span::call_site());
        quote! {
            fn name_callback() -> Option<fn(&mut Self, &str)> {
                Some(Self::#method_ident)
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl vernal_core::Component for #name {
            fn bean_name() -> &'static str {
                #bean_name
            }

            fn scope() -> vernal_core::Scope {
                #scope
            }

            fn lazy() -> bool {
                #lazy
            }

            fn dependencies() -> Vec<String> {
                vec![#(#dependency_names.to_string()),*]
            }

            #init_callback_impl

            #destroy_callback_impl

            #name_callback_impl

            fn create_from_context(
                context: &::std::sync::Arc<vernal_core::ApplicationContext>,
            ) -> vernal_core::ContainerResult<Self> {
                #(#field_bindings)*

                Ok(Self {
                    #(#field_names),*
                })
            }
        }

        // 向 inventory 提交注册项，记录定义所在的模块路径
        vernal_core::inventory::submit! {
            vernal_core::ComponentRegistration {
                name: #bean_name,
                type_name: ::std::stringify!(#name),
                module_path: ::std::module_path!(),
                registrar: |ctx: &::std::sync::Arc<vernal_core::ApplicationContext>| {
                    <#name as vernal_core::Component>::register(ctx)
                },
            }
        }
    };

    TokenStream::from(expanded)
}

/// 生成 init/destroy 回调的 trait 方法实现
fn callback_impl(
    method: &Option<String>,
    callback_name: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    if let Some(method_name) = method {
        let method_ident = syn::Ident::new(method_name, proc_macro2::Span::call_site());
        quote! {
            fn #callback_name() -> Option<fn(&mut Self) -> vernal_core::ContainerResult<()>> {
                Some(Self::#method_ident)
            }
        }
    } else {
        quote! {}
    }
}

/// 辅助函数：从 Arc<T> 类型中提取 T
fn extract_arc_type(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_ty)) = args.args.first() {
                        return inner_ty;
                    }
                }
            }
        }
    }
    ty
}

/// 从 #[autowired] 或 #[autowired("beanName")] 中提取 bean 名称
fn get_autowired_bean_name(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("autowired") {
            if let syn::Meta::List(meta_list) = &attr.meta {
                let tokens_str = meta_list.tokens.to_string();
                if !tokens_str.is_empty() {
                    return Some(tokens_str.trim_matches('"').to_string());
                }
            }
        }
    }
    None
}
