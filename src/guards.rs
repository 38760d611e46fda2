// src/guards.rs

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::error::{CompileError, Result};
use crate::model::{GuardCapability, GuardDescriptor};
use crate::parser::exported_classes;
use crate::resolver::{normalize_separators, parent_directory};

/// 探索されたガードファイル (パスと中身)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSource {
    /// ページルートからの相対パス (例: "users/index.guard.ts")
    pub path: String,
    pub contents: String,
}

impl GuardSource {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// ディレクトリ → ガードの読み取り専用の対応表
///
/// ファイルの探索順を保持する。ツリーの構築はしない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardRegistry {
    by_directory: IndexMap<String, GuardDescriptor>,
}

impl GuardRegistry {
    /// すべてのガードファイルを解析する。最初に見つかったエラーで中断する
    pub fn load(sources: &[GuardSource]) -> Result<Self> {
        let mut by_directory: IndexMap<String, GuardDescriptor> = IndexMap::new();

        for (index, source) in sources.iter().enumerate() {
            let guard = describe(source, index)?;

            if let Some(existing) = by_directory.get(&guard.directory) {
                return Err(CompileError::DuplicateGuardDirectory {
                    directory: guard.directory.clone(),
                    first: existing.source_path.clone(),
                    second: guard.source_path.clone(),
                });
            }

            if let Some(existing) = by_directory
                .values()
                .find(|g| g.class_name == guard.class_name)
            {
                return Err(CompileError::DuplicateGuardClass {
                    class_name: guard.class_name.clone(),
                    first: existing.source_path.clone(),
                    second: guard.source_path.clone(),
                });
            }

            tracing::debug!(
                file = %guard.source_path,
                class = %guard.class_name,
                "ガードを登録しました"
            );
            by_directory.insert(guard.directory.clone(), guard);
        }

        Ok(GuardRegistry { by_directory })
    }

    pub fn get(&self, directory: &str) -> Option<&GuardDescriptor> {
        self.by_directory.get(directory)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuardDescriptor> {
        self.by_directory.values()
    }

    pub fn len(&self) -> usize {
        self.by_directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_directory.is_empty()
    }
}

/// ガードファイル 1 つから `GuardDescriptor` を作る
pub fn describe(source: &GuardSource, discovery_index: usize) -> Result<GuardDescriptor> {
    let path = normalize_separators(&source.path);
    let mut classes = exported_classes(&path, &source.contents)?;

    let class = match classes.len() {
        0 => return Err(CompileError::MissingGuardExport { path }),
        1 => classes.remove(0),
        _ => return Err(CompileError::AmbiguousGuardExport { path }),
    };

    let capabilities: BTreeSet<GuardCapability> = class
        .members
        .iter()
        .filter_map(|member| GuardCapability::from_method_name(member))
        .collect();

    // 名前の無いクラスは import できないので不正な形式として扱う
    let class_name = match class.name {
        Some(name) if !capabilities.is_empty() => name,
        _ => return Err(CompileError::MalformedGuard { path }),
    };

    Ok(GuardDescriptor {
        directory: parent_directory(&path),
        source_path: path,
        class_name,
        capabilities,
        discovery_index,
    })
}
