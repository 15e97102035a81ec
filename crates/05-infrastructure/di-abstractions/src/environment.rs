//! 运行环境
//!
//! 提供激活的 profile 和扁平的属性表，并负责解析 `${key}` / `${key:default}` 占位符。

use infrastructure_common::ConfigError;
use std::collections::BTreeMap;

const PLACEHOLDER_PREFIX: &str = "${";
const PLACEHOLDER_SUFFIX: char = '}';
const VALUE_SEPARATOR: char = ':';

/// 运行环境
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    active_profiles: Vec<String>,
    properties: BTreeMap<String, String>,
}

impl Environment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加属性
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 激活 profile
    pub fn with_active_profile(mut self, profile: impl Into<String>) -> Self {
        self.active_profiles.push(profile.into());
        self
    }

    /// 设置属性
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// 获取属性
    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// 激活的 profile
    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    /// 解析文本中的全部占位符，无法解析时返回错误
    pub fn resolve_required_placeholders(&self, text: &str) -> Result<String, ConfigError> {
        let mut resolved = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
            resolved.push_str(&rest[..start]);
            let after_prefix = &rest[start + PLACEHOLDER_PREFIX.len()..];
            let end = after_prefix.find(PLACEHOLDER_SUFFIX).ok_or_else(|| {
                ConfigError::UnresolvablePlaceholder {
                    placeholder: rest[start..].to_string(),
                    value: text.to_string(),
                }
            })?;

            let placeholder = &after_prefix[..end];
            let value = match placeholder.split_once(VALUE_SEPARATOR) {
                Some((key, default)) => self.get_property(key).unwrap_or(default),
                None => self.get_property(placeholder).ok_or_else(|| {
                    ConfigError::UnresolvablePlaceholder {
                        placeholder: placeholder.to_string(),
                        value: text.to_string(),
                    }
                })?,
            };
            resolved.push_str(value);
            rest = &after_prefix[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}
