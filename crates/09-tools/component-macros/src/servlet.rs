//! `#[web_servlet]`、`#[web_filter]` 和 `#[web_listener]` 的展开

use crate::attributes::{AnnotationArgs, ValueKind};
use crate::utils::{annotated_type_impl, candidate_registration, ensure_registrable};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Result};

const SERVLET_KEYS: &[(&str, ValueKind)] = &[
    ("name", ValueKind::Str),
    ("value", ValueKind::StrArray),
    ("url_patterns", ValueKind::StrArray),
    ("load_on_startup", ValueKind::Int),
    ("async_supported", ValueKind::Bool),
    ("init_params", ValueKind::InitParams),
];

const MULTIPART_KEYS: &[(&str, ValueKind)] = &[
    ("location", ValueKind::Str),
    ("max_file_size", ValueKind::Int),
    ("max_request_size", ValueKind::Int),
    ("file_size_threshold", ValueKind::Int),
];

const FILTER_KEYS: &[(&str, ValueKind)] = &[
    ("filter_name", ValueKind::Str),
    ("value", ValueKind::StrArray),
    ("url_patterns", ValueKind::StrArray),
    ("servlet_names", ValueKind::StrArray),
    ("dispatcher_types", ValueKind::StrArray),
    ("async_supported", ValueKind::Bool),
    ("init_params", ValueKind::InitParams),
];

// 监听器注解不接受任何参数
const LISTENER_KEYS: &[(&str, ValueKind)] = &[];

/// Servlet 组件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Servlet,
    Filter,
    Listener,
}

impl ComponentKind {
    fn macro_name(self) -> &'static str {
        match self {
            Self::Servlet => "web_servlet",
            Self::Filter => "web_filter",
            Self::Listener => "web_listener",
        }
    }

    fn keys(self) -> &'static [(&'static str, ValueKind)] {
        match self {
            Self::Servlet => SERVLET_KEYS,
            Self::Filter => FILTER_KEYS,
            Self::Listener => LISTENER_KEYS,
        }
    }

    fn groups(self) -> &'static [&'static str] {
        match self {
            Self::Servlet => &["multipart"],
            Self::Filter | Self::Listener => &[],
        }
    }

    fn annotation_const(self) -> TokenStream2 {
        match self {
            Self::Servlet => quote! { ::infrastructure_common::WEB_SERVLET },
            Self::Filter => quote! { ::infrastructure_common::WEB_FILTER },
            Self::Listener => quote! { ::infrastructure_common::WEB_LISTENER },
        }
    }
}

/// 展开 Servlet 组件注解
pub fn expand(kind: ComponentKind, args: TokenStream2, input: TokenStream2) -> Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(input)?;
    ensure_registrable(&input, kind.macro_name())?;

    let metas = crate::attributes::parse_meta_list(args)?;
    let mut args = AnnotationArgs::parse(metas, kind.keys(), kind.groups())?;

    let annotation_type = kind.annotation_const();
    let attributes = args.to_attributes_tokens();
    let mut annotations = vec![quote! {
        ::infrastructure_common::AnnotationMetadata::new(#annotation_type, #attributes)
    }];

    if let Some(multipart) = args.take_group("multipart") {
        let multipart = AnnotationArgs::parse(multipart, MULTIPART_KEYS, &[])?;
        let attributes = multipart.to_attributes_tokens();
        annotations.push(quote! {
            ::infrastructure_common::AnnotationMetadata::new(
                ::infrastructure_common::MULTIPART_CONFIG,
                #attributes,
            )
        });
    }

    let type_name = &input.ident;
    let annotated_type = annotated_type_impl(type_name, &annotations);
    let registration = candidate_registration(kind.macro_name(), type_name);

    Ok(quote! {
        #input

        #annotated_type

        #registration
    })
}
