//! 宏工具函数

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{DeriveInput, Error, Ident, Result};

/// 带注解的类型只能是非泛型的结构体或枚举
pub fn ensure_registrable(input: &DeriveInput, macro_name: &str) -> Result<()> {
    if let syn::Data::Union(_) = input.data {
        return Err(Error::new_spanned(
            &input.ident,
            format!("#[{}] 不能用于 union", macro_name),
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            format!("#[{}] 不支持泛型类型", macro_name),
        ));
    }
    Ok(())
}

/// 生成注册函数名称
pub fn registration_fn_ident(prefix: &str, type_name: &Ident) -> Ident {
    Ident::new(
        &format!("__register_{}_{}", prefix, to_snake_case(&type_name.to_string())),
        Span::call_site(),
    )
}

/// 生成 `AnnotatedType` 实现
pub fn annotated_type_impl(type_name: &Ident, annotations: &[TokenStream2]) -> TokenStream2 {
    quote! {
        impl ::infrastructure_common::AnnotatedType for #type_name {
            fn class_metadata() -> ::infrastructure_common::ClassMetadata {
                ::infrastructure_common::ClassMetadata::of::<Self>()
                    #(.with_annotation(#annotations))*
            }
        }
    }
}

/// 生成启动时把类元数据写入全局候选索引的代码
pub fn candidate_registration(prefix: &str, type_name: &Ident) -> TokenStream2 {
    let registration_fn_name = registration_fn_ident(prefix, type_name);
    quote! {
        #[ctor::ctor]
        fn #registration_fn_name() {
            ::infrastructure_common::register_candidate(
                <#type_name as ::infrastructure_common::AnnotatedType>::class_metadata(),
            );
        }
    }
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev_is_lower = chars.get(i - 1).is_some_and(|c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.extend(ch.to_lowercase());
    }

    result
}
