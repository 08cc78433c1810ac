use quote::quote;
use syn::{Attribute, Expr, Meta};

/// Value 字段信息
pub(crate) struct ValueFieldInfo {
    pub key: String,
    pub default_value: Option<proc_macro2::TokenStream>,
}

/// 从属性中提取 value 配置
///
/// 支持格式：
/// - `#[value("config.key")]` - 必需配置
/// - `#[value("config.key", default = value)]` - 可选配置，带默认值
pub(crate) fn get_value_info(attrs: &[Attribute]) -> Option<ValueFieldInfo> {
    for attr in attrs {
        if attr.path().is_ident("value") {
            if let Meta::List(meta_list) = &attr.meta {
                let tokens_str = meta_list.tokens.to_string();

                let parts: Vec<&str> = tokens_str.split(',').map(|s| s.trim()).collect();

                if parts.is_empty() {
                    continue;
                }

                let key = parts[0].trim_matches('"').to_string();

                let mut default_value = None;
                for part in &parts[1..] {
                    if part.contains("default") {
                        if let Some(eq_pos) = part.find('=') {
                            let value_str = part[eq_pos + 1..].trim();
                            if let Ok(expr) = syn::parse_str::<Expr>(value_str) {
                                default_value = Some(quote! { #expr });
                            }
                        }
                    }
                }

                return Some(ValueFieldInfo { key, default_value });
            }
        }
    }
    None
}

/// 为单个 value 字段生成注入代码
///
/// 根据字段类型选择 Environment 的取值方法；
/// 类型不在内建列表中时退回到字符串解析。
pub(crate) fn generate_value_injection(
    field_name: &Option<syn::Ident>,
    field_type: &syn::Type,
    value_info: &ValueFieldInfo,
) -> proc_macro2::TokenStream {
    let config_key = &value_info.key;
    let type_str = quote! { #field_type }.to_string();

    if let Some(default) = &value_info.default_value {
        if type_str.contains("String") {
            quote! {
                let #field_name = context.get_environment()
                    .get_string(#config_key)
                    .unwrap_or_else(|| #default.to_string());
            }
        } else if type_str.contains("i64")
            || type_str.contains("i32")
            || type_str.contains("u64")
            || type_str.contains("u32")
            || type_str.contains("u16")
        {
            quote! {
                let #field_name = context.get_environment()
                    .get_i64(#config_key)
                    .unwrap_or(#default) as #field_type;
            }
        } else if type_str.contains("f64") || type_str.contains("f32") {
            quote! {
                let #field_name = context.get_environment()
                    .get_f64(#config_key)
                    .unwrap_or(#default) as #field_type;
            }
        } else if type_str.contains("bool") {
            quote! {
                let #field_name = context.get_environment()
                    .get_bool(#config_key)
                    .unwrap_or(#default);
            }
        } else {
            quote! {
                let #field_name = context.get_environment()
                    .get_string(#config_key)
                    .unwrap_or_else(|| #default.to_string())
                    .parse()
                    .map_err(|e| vernal_core::ContainerError::Custom(
                        format!("Failed to parse config '{}': {}", #config_key, e)
                    ))?;
            }
        }
    } else if type_str.contains("String") {
        quote! {
            let #field_name = context.get_environment()
                .get_string(#config_key)
                .ok_or_else(|| vernal_core::ContainerError::Custom(
                    format!("Required config '{}' not found", #config_key)
                ))?;
        }
    } else if type_str.contains("i64")
        || type_str.contains("i32")
        || type_str.contains("u64")
        || type_str.contains("u32")
        || type_str.contains("u16")
    {
        quote! {
            let #field_name = context.get_environment()
                .get_i64(#config_key)
                .ok_or_else(|| vernal_core::ContainerError::Custom(
                    format!("Required config '{}' not found", #config_key)
                ))? as #field_type;
        }
    } else if type_str.contains("f64") || type_str.contains("f32") {
        quote! {
            let #field_name = context.get_environment()
                .get_f64(#config_key)
                .ok_or_else(|| vernal_core::ContainerError::Custom(
                    format!("Required config '{}' not found", #config_key)
                ))? as #field_type;
        }
    } else if type_str.contains("bool") {
        quote! {
            let #field_name = context.get_environment()
                .get_bool(#config_key)
                .ok_or_else(|| vernal_core::ContainerError::Custom(
                    format!("Required config '{}' not found", #config_key)
                ))?;
        }
    } else {
        quote! {
            let #field_name = context.get_environment()
                .get_string(#config_key)
                .ok_or_else(|| vernal_core::ContainerError::Custom(
                    format!("Required config '{}' not found", #config_key)
                ))?
                .parse()
                .map_err(|e| vernal_core::ContainerError::Custom(
                    format!("Failed to parse config '{}': {}", #config_key, e)
                ))?;
        }
    }
}
