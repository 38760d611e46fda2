// src/emitter.rs
//
// 並び順の確定したツリーを Angular の `Routes` 定義に書き出す。
// 出力はツリーだけから決まるので、同じツリーからは常に同じ文字列になる。

use serde::Serialize;
use std::collections::HashSet;

use crate::model::{AttachedGuard, ComponentRef, GuardCapability, NodeKind, PageDescriptor, RouteNode};

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    Component,
    Guard,
}

/// ルーティングモジュールが import しなければならない識別子
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub identifier: String,
    pub path: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedRoutes {
    /// `Routes` 配列の中身 (各行にインデント込み)
    pub configuration_text: String,
    /// コンポーネント → ガードの順に並んだ import 一覧
    pub imports: Vec<ImportEntry>,
    /// `@NgModule` の providers に並べるガードのクラス名
    pub providers: Vec<String>,
}

/// `NodeKind::Config` ノードを受け取り、設定テキストと import 一覧を作る
pub fn emit(config: &RouteNode) -> EmittedRoutes {
    let configuration_text = config
        .children
        .iter()
        .map(|node| render_node(node, 0))
        .collect::<Vec<_>>()
        .join(",\n");

    let guards = attached_guards(config);
    let providers = guards.iter().map(|g| g.class_name.clone()).collect();

    let imports = component_imports(config)
        .into_iter()
        .map(|c| ImportEntry {
            identifier: c.identifier.clone(),
            path: c.import_path.clone(),
            kind: ImportKind::Component,
        })
        .chain(guards.into_iter().map(|g| ImportEntry {
            identifier: g.class_name.clone(),
            path: g.import_path.clone(),
            kind: ImportKind::Guard,
        }))
        .collect();

    EmittedRoutes {
        configuration_text,
        imports,
        providers,
    }
}

/// 1 ノードを (子も含めて) 描画する。`depth` はトップレベルを 0 とする深さ
fn render_node(node: &RouteNode, depth: usize) -> String {
    let indent = INDENT.repeat(depth + 1);

    let mut fields = vec![format!("path: {}", quote(&node.path_segment))];
    if let Some(redirect) = &node.redirect {
        fields.push(format!("redirectTo: {}", quote(&redirect.target)));
        fields.push(format!("pathMatch: {}", quote(redirect.path_match.as_str())));
    }
    if let Some(component) = &node.component {
        fields.push(format!("component: {}", component.identifier));
    }

    let guards = node.guard.as_ref().map(guard_fields).unwrap_or_default();

    if node.children.is_empty() {
        fields.extend(guards);
        return format!("{}{{ {} }}", indent, fields.join(", "));
    }

    let children = node
        .children
        .iter()
        .map(|child| render_node(child, depth + 1))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut closing = format!("{}]", indent);
    for field in guards {
        closing.push_str(", ");
        closing.push_str(&field);
    }

    format!(
        "{}{{ {}, children: [\n{}\n{} }}",
        indent,
        fields.join(", "),
        children,
        closing
    )
}

/// 実際に付与されているガードのメソッドだけを出力する
fn guard_fields(guard: &AttachedGuard) -> Vec<String> {
    GuardCapability::ALL
        .into_iter()
        .filter(|c| guard.capabilities.contains(c))
        .map(|c| format!("{}: [{}]", c.method_name(), guard.class_name))
        .collect()
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// ページのコンポーネント (探索順)、ルートのインデックス、フォールバックの順
fn component_imports(config: &RouteNode) -> Vec<&ComponentRef> {
    let mut found: Vec<(u8, usize, &ComponentRef)> = Vec::new();
    config.walk(&mut |node| {
        if let Some(component) = &node.component {
            let rank = match node.kind {
                NodeKind::RootIndex => 1,
                NodeKind::Fallback => 2,
                _ => 0,
            };
            found.push((rank, node.order_key, component));
        }
    });
    found.sort_by_key(|(rank, order_key, _)| (*rank, *order_key));

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, _, component)| component)
        .filter(|c| seen.insert(c.identifier.as_str()))
        .collect()
}

/// ツリーに付与されたガード (ガードファイルの探索順、重複なし)
///
/// クラス名は `GuardRegistry::load` で一意になっているので、クラス名だけで重複を判定できる。
fn attached_guards(config: &RouteNode) -> Vec<&AttachedGuard> {
    let mut found: Vec<&AttachedGuard> = Vec::new();
    config.walk(&mut |node| {
        if let Some(guard) = &node.guard {
            found.push(guard);
        }
    });
    found.sort_by_key(|g| g.discovery_index);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|g| seen.insert(g.class_name.as_str()))
        .collect()
}

fn render_import(entry: &ImportEntry) -> String {
    format!("import {{\n  {}\n}} from '{}';", entry.identifier, entry.path)
}

/// `src/app/app-routing.module.ts` の全文
pub fn render_routing_module(emitted: &EmittedRoutes) -> String {
    let imports = emitted
        .imports
        .iter()
        .map(render_import)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "import {{
  NgModule
}} from '@angular/core';

import {{
  RouterModule,
  Routes
}} from '@angular/router';

{imports}

const routes: Routes = [
{config}
];

@NgModule({{
  imports: [RouterModule.forRoot(routes)],
  exports: [RouterModule],
  providers: [{providers}]
}})
export class AppRoutingModule {{ }}
",
        imports = imports,
        config = emitted.configuration_text,
        providers = emitted.providers.join(", "),
    )
}

/// ページごとの `index.component.ts`。テンプレートは元の index.html をコピーしたもの
pub fn render_index_component(page: &PageDescriptor) -> String {
    format!(
        "import {{
  Component
}} from '@angular/core';

@Component({{
  selector: '{selector}',
  templateUrl: './index.component.html'
}})
export class {identifier} {{ }}
",
        selector = page.selector,
        identifier = page.identifier,
    )
}
