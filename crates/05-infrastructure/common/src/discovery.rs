//! 组件候选索引
//!
//! 属性宏在程序启动时（`ctor`）把带注解类型的 [`ClassMetadata`] 写入全局索引，
//! 扫描器按包路径从索引中查找候选组件，不依赖运行时反射。

use crate::metadata::{is_in_package, ClassMetadata};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// 候选组件索引
#[derive(Debug, Default)]
pub struct CandidateIndex {
    entries: RwLock<Vec<Arc<ClassMetadata>>>,
}

impl CandidateIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类元数据
    ///
    /// 同一类型重复注册时保留最先注册的元数据，返回是否新增。
    pub fn register(&self, metadata: ClassMetadata) -> bool {
        let mut entries = self.entries.write();
        if entries
            .iter()
            .any(|entry| entry.type_name == metadata.type_name)
        {
            trace!("候选组件已存在，忽略重复注册: {}", metadata.type_name);
            return false;
        }

        debug!("索引候选组件: {}", metadata.type_name);
        entries.push(Arc::new(metadata));
        true
    }

    /// 获取指定包（含子包）中的全部候选组件，按注册顺序返回
    pub fn candidates_in(&self, package: &str) -> Vec<Arc<ClassMetadata>> {
        self.entries
            .read()
            .iter()
            .filter(|entry| is_in_package(&entry.module_path, package))
            .cloned()
            .collect()
    }

    /// 候选组件数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// 全局候选索引
static GLOBAL_CANDIDATE_INDEX: once_cell::sync::Lazy<Arc<CandidateIndex>> =
    once_cell::sync::Lazy::new(|| Arc::new(CandidateIndex::new()));

/// 获取全局候选索引
pub fn global_candidate_index() -> Arc<CandidateIndex> {
    Arc::clone(&GLOBAL_CANDIDATE_INDEX)
}

/// 向全局索引注册类元数据，供宏生成的代码调用
pub fn register_candidate(metadata: ClassMetadata) {
    GLOBAL_CANDIDATE_INDEX.register(metadata);
}
