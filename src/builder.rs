// src/builder.rs
//
// ページ・ガード・リダイレクトから 1 本のルートツリーを組み立てる。
//
// ネストマーカー (`#`) の付いたディレクトリだけが本物の親子ルートになり、
// それ以外のディレクトリは 1 つの複数階層パス ("users/:userId") に平坦化される。

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::{CompileError, Result};
use crate::guards::GuardRegistry;
use crate::model::{
    AttachedGuard, ComponentRef, NodeKind, PageDescriptor, PageRole, ROOT_INDEX_IDENTIFIER,
    RedirectRule, RouteNode, Segment,
};
use crate::resolver::import_specifier;

/// ルートノードを生むディレクトリ 1 つ分の中間情報
#[derive(Debug)]
struct DirectoryNode<'a> {
    page: Option<&'a PageDescriptor>,
    /// None ならルートグループの直下
    parent: Option<String>,
    path: String,
    order_key: usize,
}

/// ディレクトリの親ノードと、親から見た相対パスを決める
///
/// - 最後のセグメントがネストスコープなら、その手前のディレクトリが親
/// - そうでなければ、最も内側のネストスコープ (無ければルートグループ) が親で、
///   それ以降のセグメントを平坦に連結したものがパスになる
///
/// 返り値の `usize` は親ディレクトリのセグメント数 (0 はルートグループ)。
fn placement(segments: &[Segment]) -> (usize, String) {
    let join = |tail: &[Segment]| {
        tail.iter()
            .map(Segment::path_fragment)
            .collect::<Vec<_>>()
            .join("/")
    };

    match segments.split_last() {
        Some((last, init)) if last.is_nested_scope() => (init.len(), last.name().to_string()),
        _ => match segments.iter().rposition(Segment::is_nested_scope) {
            Some(k) => (k + 1, join(&segments[k + 1..])),
            None => (0, join(segments)),
        },
    }
}

fn raw_directory(segments: &[Segment]) -> String {
    segments.iter().map(Segment::raw).collect::<Vec<_>>().join("/")
}

/// ネストマーカーだけを外したディレクトリ。`_id` は `:id` のまま残るので `id` とは別物
fn stripped_directory(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::path_fragment)
        .collect::<Vec<_>>()
        .join("/")
}

/// ルートツリーを構築する
///
/// 返すのは `Routes` 配列を表す `NodeKind::Config` ノードで、その子は
/// リダイレクト、ルートグループ、フォールバックの順になる。
/// 兄弟の並び順の確定は `ordering::order` が行う。
pub fn build(
    pages: &[PageDescriptor],
    guards: &GuardRegistry,
    redirects: &[RedirectRule],
) -> Result<RouteNode> {
    let mut directories: IndexMap<String, DirectoryNode<'_>> = IndexMap::new();
    let mut stripped: HashMap<String, String> = HashMap::new();
    let mut root_page: Option<&PageDescriptor> = None;

    for page in pages {
        match page.role {
            PageRole::RootIndex => {
                root_page = Some(page);
                continue;
            }
            // フォールバックは常に合成されるので、ここでは何もしない
            PageRole::NotFound => continue,
            PageRole::Route => {}
        }

        let page_key = page.discovery_index + 1;
        let mut current: &[Segment] = &page.segments;
        let mut owner = Some(page);

        // ページ自身のディレクトリから親をたどり、足りないノードを作る
        loop {
            let directory = raw_directory(current);
            let (parent_len, path) = placement(current);
            let parent = (parent_len > 0).then(|| raw_directory(&current[..parent_len]));

            let route = stripped_directory(current);
            if let Some(first) = stripped.get(&route) {
                if *first != directory {
                    return Err(CompileError::ConflictingScope {
                        route,
                        first: first.clone(),
                        second: directory,
                    });
                }
            } else {
                stripped.insert(route, directory.clone());
            }

            let entry = directories
                .entry(directory.clone())
                .or_insert_with(|| DirectoryNode {
                    page: None,
                    parent,
                    path,
                    order_key: page_key,
                });

            match owner.take() {
                Some(page) => {
                    entry.page = Some(page);
                    entry.order_key = page_key;
                }
                None if entry.page.is_none() => {
                    entry.order_key = entry.order_key.min(page_key);
                }
                None => {}
            }

            if parent_len == 0 {
                break;
            }
            current = &current[..parent_len];
        }
    }

    let mut children_of: HashMap<Option<String>, Vec<String>> = HashMap::new();
    for (directory, node) in &directories {
        children_of
            .entry(node.parent.clone())
            .or_default()
            .push(directory.clone());
    }
    for children in children_of.values_mut() {
        children.sort_by_key(|d| directories[d.as_str()].order_key);
    }

    let assembler = Assembler {
        directories: &directories,
        children_of: &children_of,
        guards,
    };

    let root_index = RouteNode::new(NodeKind::RootIndex, "")
        .with_component(match root_page {
            Some(page) => page.component_ref(),
            None => ComponentRef {
                identifier: ROOT_INDEX_IDENTIFIER.to_string(),
                import_path: import_specifier("index.component.ts"),
            },
        })
        .with_order_key(0);

    let mut root_group = RouteNode::new(NodeKind::Group, "").with_origin("");
    root_group.children.push(root_index);
    root_group.children.extend(assembler.children(None));
    root_group.guard = guards.get("").map(AttachedGuard::from);

    for guard in guards.iter() {
        if !guard.directory.is_empty() && !directories.contains_key(&guard.directory) {
            tracing::warn!(
                file = %guard.source_path,
                directory = %guard.directory,
                "ガードのディレクトリに対応するルートがないため、ガードを無視します"
            );
        }
    }

    let mut config = RouteNode::new(NodeKind::Config, "");
    config.children.extend(
        redirects
            .iter()
            .enumerate()
            .map(|(i, rule)| RouteNode::redirect(rule, i)),
    );
    config.children.push(root_group);
    config.children.push(RouteNode::fallback());

    tracing::info!(
        pages = pages.len(),
        nodes = directories.len(),
        redirects = redirects.len(),
        "ルートツリーを構築しました"
    );

    Ok(config)
}

struct Assembler<'a, 'p> {
    directories: &'a IndexMap<String, DirectoryNode<'p>>,
    children_of: &'a HashMap<Option<String>, Vec<String>>,
    guards: &'a GuardRegistry,
}

impl Assembler<'_, '_> {
    fn children(&self, parent: Option<&str>) -> Vec<RouteNode> {
        self.children_of
            .get(&parent.map(str::to_string))
            .map(|dirs| dirs.iter().map(|d| self.node(d)).collect())
            .unwrap_or_default()
    }

    fn node(&self, directory: &str) -> RouteNode {
        let info = &self.directories[directory];
        let kind = if info.page.is_some() {
            NodeKind::Page
        } else {
            NodeKind::Group
        };

        let mut node = RouteNode::new(kind, info.path.clone())
            .with_origin(directory)
            .with_order_key(info.order_key);
        node.component = info.page.map(PageDescriptor::component_ref);
        // ガードはディレクトリが完全に一致するノードにだけ付ける
        node.guard = self.guards.get(directory).map(AttachedGuard::from);
        node.children = self.children(Some(directory));

        tracing::debug!(
            directory,
            path = %node.path_segment,
            children = node.children.len(),
            "ルートノードを作成しました"
        );
        node
    }
}
