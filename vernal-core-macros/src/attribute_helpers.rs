use quote::quote;
use syn::Attribute;

/// 从 #[bean("name")] 属性中提取 bean 名称
pub(crate) fn get_bean_name(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("bean") {
            if let Ok(name_lit) = attr.parse_args::<syn::LitStr>() {
                return Some(name_lit.value());
            }
        }
    }
    None
}

/// 从 #[scope("...")] 属性中提取作用域
pub(crate) fn get_scope(attrs: &[Attribute]) -> proc_macro2::TokenStream {
    for attr in attrs {
        if attr.path().is_ident("scope") {
            if let Ok(scope_lit) = attr.parse_args::<syn::LitStr>() {
                return match scope_lit.value().as_str() {
                    "prototype" => quote! { vernal_core::Scope::Prototype },
                    _ => quote! { vernal_core::Scope::Singleton },
                };
            }
        }
    }
    quote! { vernal_core::Scope::Singleton }
}

/// 检查是否有 #[lazy] 属性
pub(crate) fn get_lazy(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("lazy"))
}

/// 将 PascalCase 转换为 camelCase
/// 例如: UserService -> userService
pub(crate) fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// 将 snake_case 字段名转换为 camelCase bean 名称
/// 例如: order_service -> orderService
pub(crate) fn snake_to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper_next = false;

    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

/// 从方法回调类属性中提取方法名
/// 支持格式: #[init("custom_method")] 或 #[init]（使用默认方法名）
pub(crate) fn get_callback_method(
    attrs: &[Attribute],
    attr_name: &str,
    default_method: &str,
) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident(attr_name) {
            if let Ok(method_lit) = attr.parse_args::<syn::LitStr>() {
                return Some(method_lit.value());
            }
            return Some(default_method.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("UserService"), "userService");
        assert_eq!(to_camel_case("A"), "a");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_snake_to_camel_case() {
        assert_eq!(snake_to_camel_case("order_service"), "orderService");
        assert_eq!(snake_to_camel_case("db"), "db");
        assert_eq!(snake_to_camel_case("max_retry_count"), "maxRetryCount");
    }
}
