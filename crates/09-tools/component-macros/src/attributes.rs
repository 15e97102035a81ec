//! 注解参数解析
//!
//! 按注解声明的键表解析宏参数，并生成构造 `AnnotationAttributes` 的代码。

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Error, Expr, ExprLit, ExprUnary, Lit,
    LitStr, Meta, Path, Result, Token, UnOp,
};

/// 宏参数列表
pub type MetaList = Punctuated<Meta, Token![,]>;

/// 解析逗号分隔的宏参数
pub fn parse_meta_list(tokens: TokenStream2) -> Result<MetaList> {
    MetaList::parse_terminated.parse2(tokens)
}

/// 参数值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `key = "text"`
    Str,
    /// `key = ["a", "b"]` 或 `key = "a"`
    StrArray,
    /// `key = 1` 或 `key = -1`
    Int,
    /// `key` 或 `key = true`
    Bool,
    /// `key = [path::Type, Other]`
    Types,
    /// `key = [("name", "value"), ...]`
    InitParams,
}

/// 已解析的参数值
#[derive(Debug, Clone)]
pub enum ParsedValue {
    Str(LitStr),
    StrArray(Vec<LitStr>),
    Int(i64),
    Bool(bool),
    Types(Vec<Path>),
    InitParams(Vec<(LitStr, LitStr)>),
}

/// 注解参数
#[derive(Debug, Default)]
pub struct AnnotationArgs {
    /// 按声明顺序排列的键值
    pub values: Vec<(String, ParsedValue)>,
    /// 嵌套参数组，例如 `multipart(...)`
    pub groups: Vec<(String, MetaList)>,
}

impl AnnotationArgs {
    /// 解析参数
    ///
    /// 未知的键、重复的键和类型不符的值都会产生编译错误。
    pub fn parse(metas: MetaList, keys: &[(&str, ValueKind)], groups: &[&str]) -> Result<Self> {
        let mut args = Self::default();

        for meta in metas {
            let name = meta
                .path()
                .get_ident()
                .map(ToString::to_string)
                .ok_or_else(|| Error::new(meta.path().span(), "参数名必须是标识符"))?;

            if args.contains(&name) {
                return Err(Error::new(meta.span(), format!("重复的参数 `{}`", name)));
            }

            if groups.contains(&name.as_str()) {
                match meta {
                    Meta::List(list) => {
                        let nested = parse_meta_list(list.tokens)?;
                        args.groups.push((name, nested));
                    }
                    other => {
                        return Err(Error::new(
                            other.span(),
                            format!("`{}` 需要写成 `{}(...)`", name, name),
                        ))
                    }
                }
                continue;
            }

            let kind = keys
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, kind)| *kind)
                .ok_or_else(|| {
                    let expected: Vec<&str> = keys
                        .iter()
                        .map(|(key, _)| *key)
                        .chain(groups.iter().copied())
                        .collect();
                    let message = if expected.is_empty() {
                        format!("未知参数 `{}`，该注解不接受参数", name)
                    } else {
                        format!("未知参数 `{}`，可用参数: {}", name, expected.join(", "))
                    };
                    Error::new(meta.path().span(), message)
                })?;

            let value = parse_value(&meta, kind)?;
            args.values.push((name, value));
        }

        Ok(args)
    }

    fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(key, _)| key == name)
            || self.groups.iter().any(|(key, _)| key == name)
    }

    /// 取出嵌套参数组
    pub fn take_group(&mut self, name: &str) -> Option<MetaList> {
        let index = self.groups.iter().position(|(key, _)| key == name)?;
        Some(self.groups.remove(index).1)
    }

    /// 生成构造 `AnnotationAttributes` 的表达式
    pub fn to_attributes_tokens(&self) -> TokenStream2 {
        let inserts = self.values.iter().map(|(name, value)| {
            let value = value_tokens(value);
            quote! { attributes.insert(#name, #value); }
        });

        quote! {
            {
                let mut attributes = ::infrastructure_common::AnnotationAttributes::new();
                #(#inserts)*
                attributes
            }
        }
    }
}

fn parse_value(meta: &Meta, kind: ValueKind) -> Result<ParsedValue> {
    match (meta, kind) {
        (Meta::Path(_), ValueKind::Bool) => Ok(ParsedValue::Bool(true)),
        (Meta::NameValue(name_value), kind) => parse_expr(&name_value.value, kind),
        (other, _) => Err(Error::new(other.span(), "参数格式应为 `key = value`")),
    }
}

fn parse_expr(expr: &Expr, kind: ValueKind) -> Result<ParsedValue> {
    match kind {
        ValueKind::Str => lit_str(expr).map(ParsedValue::Str),
        ValueKind::StrArray => match expr {
            Expr::Array(array) => array
                .elems
                .iter()
                .map(lit_str)
                .collect::<Result<Vec<_>>>()
                .map(ParsedValue::StrArray),
            single => lit_str(single).map(|value| ParsedValue::StrArray(vec![value])),
        },
        ValueKind::Int => lit_int(expr).map(ParsedValue::Int),
        ValueKind::Bool => match expr {
            Expr::Lit(ExprLit {
                lit: Lit::Bool(value),
                ..
            }) => Ok(ParsedValue::Bool(value.value)),
            other => Err(Error::new(other.span(), "期望布尔字面量")),
        },
        ValueKind::Types => match expr {
            Expr::Array(array) => array
                .elems
                .iter()
                .map(type_path)
                .collect::<Result<Vec<_>>>()
                .map(ParsedValue::Types),
            single => type_path(single).map(|path| ParsedValue::Types(vec![path])),
        },
        ValueKind::InitParams => match expr {
            Expr::Array(array) => array
                .elems
                .iter()
                .map(init_param)
                .collect::<Result<Vec<_>>>()
                .map(ParsedValue::InitParams),
            other => Err(Error::new(
                other.span(),
                "期望 `[(\"name\", \"value\"), ...]` 形式的初始化参数",
            )),
        },
    }
}

fn lit_str(expr: &Expr) -> Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.clone()),
        other => Err(Error::new(other.span(), "期望字符串字面量")),
    }
}

fn lit_int(expr: &Expr) -> Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(value),
            ..
        }) => value.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => lit_int(expr).map(|value| -value),
        other => Err(Error::new(other.span(), "期望整数字面量")),
    }
}

fn type_path(expr: &Expr) -> Result<Path> {
    match expr {
        Expr::Path(path) if path.qself.is_none() => Ok(path.path.clone()),
        other => Err(Error::new(other.span(), "期望类型路径")),
    }
}

fn init_param(expr: &Expr) -> Result<(LitStr, LitStr)> {
    match expr {
        Expr::Tuple(tuple) if tuple.elems.len() == 2 => {
            Ok((lit_str(&tuple.elems[0])?, lit_str(&tuple.elems[1])?))
        }
        other => Err(Error::new(other.span(), "初始化参数应为 `(\"name\", \"value\")`")),
    }
}

fn value_tokens(value: &ParsedValue) -> TokenStream2 {
    match value {
        ParsedValue::Str(value) => quote! {
            ::infrastructure_common::AttributeValue::String(::std::string::String::from(#value))
        },
        ParsedValue::StrArray(values) => quote! {
            ::infrastructure_common::AttributeValue::StringArray(::std::vec![
                #(::std::string::String::from(#values)),*
            ])
        },
        ParsedValue::Int(value) => quote! {
            ::infrastructure_common::AttributeValue::Int(#value)
        },
        ParsedValue::Bool(value) => quote! {
            ::infrastructure_common::AttributeValue::Bool(#value)
        },
        ParsedValue::Types(paths) => quote! {
            ::infrastructure_common::AttributeValue::Types(::std::vec![
                #(::infrastructure_common::TypeInfo::of::<#paths>()),*
            ])
        },
        ParsedValue::InitParams(params) => {
            let params = params.iter().map(|(name, value)| {
                quote! {
                    ::infrastructure_common::AnnotationAttributes::new()
                        .with("name", #name)
                        .with("value", #value)
                }
            });
            quote! {
                ::infrastructure_common::AttributeValue::AnnotationArray(::std::vec![#(#params),*])
            }
        }
    }
}
