// src/discovery.rs

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::compiler::CompileInput;
use crate::guards::GuardSource;
use crate::model::RedirectRule;
use crate::resolver::relative_to;

/// ルートとして扱うページファイル
pub const PAGE_FILE_NAME: &str = "index.html";
/// ディレクトリごとのルートガード
pub const GUARD_FILE_NAME: &str = "index.guard.ts";

const IGNORED_DIRECTORY: &str = "node_modules";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("The pages directory \"{}\" does not exist.", .0.display())]
    MissingPagesDir(PathBuf),

    #[error("Could not walk the pages directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Could not read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// ページルート以下で見つかったページとガード
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// ページルートからの相対パス (探索順)
    pub page_paths: Vec<String>,
    pub guard_sources: Vec<GuardSource>,
}

impl Discovered {
    pub fn into_input(self, redirects: Vec<RedirectRule>) -> CompileInput {
        CompileInput {
            page_paths: self.page_paths,
            guard_sources: self.guard_sources,
            redirects,
        }
    }
}

/// WalkDir でページルートを再帰的に探索する
///
/// 同じ入力からは常に同じ順序になるよう、各階層をファイル名順にたどる。
pub fn discover(pages_dir: &Path) -> Result<Discovered, DiscoveryError> {
    if !pages_dir.is_dir() {
        return Err(DiscoveryError::MissingPagesDir(pages_dir.to_path_buf()));
    }

    let mut discovered = Discovered::default();

    let walker = WalkDir::new(pages_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != IGNORED_DIRECTORY);

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(relative) = relative_to(path, pages_dir) else {
            continue;
        };

        match path.file_name().and_then(|n| n.to_str()) {
            Some(PAGE_FILE_NAME) => {
                tracing::debug!(page = %relative, "ページを発見しました");
                discovered.page_paths.push(relative);
            }
            Some(GUARD_FILE_NAME) => {
                let contents = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::debug!(guard = %relative, "ガードファイルを発見しました");
                discovered.guard_sources.push(GuardSource::new(relative, contents));
            }
            _ => {}
        }
    }

    tracing::info!(
        pages = discovered.page_paths.len(),
        guards = discovered.guard_sources.len(),
        "ページの探索が完了しました"
    );

    Ok(discovered)
}
