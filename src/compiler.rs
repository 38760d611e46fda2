// src/compiler.rs

use serde::Serialize;

use crate::builder::build;
use crate::emitter::{EmittedRoutes, emit, render_routing_module};
use crate::error::Result;
use crate::guards::{GuardRegistry, GuardSource};
use crate::model::{GuardDescriptor, PageDescriptor, RedirectRule, RouteNode};
use crate::ordering::order;
use crate::segment::{check_unique_identifiers, parse};

/// 1 回のコンパイルに必要な入力。探索と設定の読み込みは呼び出し側の責務
#[derive(Debug, Clone, Default)]
pub struct CompileInput {
    /// ページルートからの相対パス (探索順)
    pub page_paths: Vec<String>,
    pub guard_sources: Vec<GuardSource>,
    /// 宣言順のリダイレクト
    pub redirects: Vec<RedirectRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRoutes {
    pub pages: Vec<PageDescriptor>,
    pub guards: Vec<GuardDescriptor>,
    pub tree: RouteNode,
    pub emitted: EmittedRoutes,
}

impl CompiledRoutes {
    /// `app-routing.module.ts` の全文
    pub fn routing_module(&self) -> String {
        render_routing_module(&self.emitted)
    }
}

/// ページ解析 → 一意性チェック → ガード読み込み → 構築 → 並べ替え → 出力
///
/// 最初に見つかったエラーで中断し、途中までの結果は返さない。
pub fn compile(input: &CompileInput) -> Result<CompiledRoutes> {
    let pages = input
        .page_paths
        .iter()
        .enumerate()
        .map(|(i, path)| parse(path, i))
        .collect::<Result<Vec<_>>>()?;
    check_unique_identifiers(&pages)?;

    let registry = GuardRegistry::load(&input.guard_sources)?;

    let tree = order(build(&pages, &registry, &input.redirects)?);
    let emitted = emit(&tree);

    tracing::info!(
        pages = pages.len(),
        guards = registry.len(),
        imports = emitted.imports.len(),
        "ルート設定をコンパイルしました"
    );

    Ok(CompiledRoutes {
        pages,
        guards: registry.iter().cloned().collect(),
        tree,
        emitted,
    })
}
