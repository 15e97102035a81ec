//! `#[servlet_component_scan]` 的展开
//!
//! 只为配置类生成类元数据，配置类本身不进入候选索引。

use crate::attributes::{parse_meta_list, AnnotationArgs, ValueKind};
use crate::utils::{annotated_type_impl, ensure_registrable};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Result};

const SCAN_KEYS: &[(&str, ValueKind)] = &[
    ("value", ValueKind::StrArray),
    ("base_packages", ValueKind::StrArray),
    ("base_package_classes", ValueKind::Types),
];

/// 展开扫描注解
pub fn expand(args: TokenStream2, input: TokenStream2) -> Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(input)?;
    ensure_registrable(&input, "servlet_component_scan")?;

    let args = AnnotationArgs::parse(parse_meta_list(args)?, SCAN_KEYS, &[])?;
    let attributes = args.to_attributes_tokens();
    let annotation = quote! {
        ::infrastructure_common::AnnotationMetadata::new(
            ::infrastructure_common::SERVLET_COMPONENT_SCAN,
            #attributes,
        )
    };
    let annotated_type = annotated_type_impl(&input.ident, &[annotation]);

    Ok(quote! {
        #input

        #annotated_type
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_configuration_is_not_registered_as_candidate() {
        let expanded = expand(
            quote! { base_packages = ["app::web"], base_package_classes = [crate::admin::Marker] },
            quote! { pub struct WebConfig; },
        )
        .unwrap()
        .to_string();

        assert!(expanded.contains("SERVLET_COMPONENT_SCAN"));
        assert!(expanded.contains("TypeInfo :: of :: < crate :: admin :: Marker >"));
        assert!(!expanded.contains("register_candidate"));
    }

    #[test]
    fn test_rejects_unknown_argument() {
        assert!(expand(quote! { packages = ["app"] }, quote! { pub struct WebConfig; }).is_err());
    }
}
