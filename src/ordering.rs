// src/ordering.rs
//
// Angular のルーターは兄弟ルートを上から順に試すので、並び順がそのまま正しさになる。

use std::cmp::Reverse;

use crate::model::{NodeKind, RouteNode};

/// 兄弟間の大分類。リダイレクトが先頭、フォールバックが末尾
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SiblingClass {
    Redirect,
    Route,
    Fallback,
}

/// 静的なパスはパラメータを含むパスより先に試す。
/// パラメータを含むパス同士では、先頭の静的な部分が長い方を先にする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    Static,
    Dynamic { static_prefix: Reverse<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub class: SiblingClass,
    pub specificity: Specificity,
    pub order_key: usize,
}

pub fn sort_key(node: &RouteNode) -> SortKey {
    let class = match node.kind {
        NodeKind::Redirect => SiblingClass::Redirect,
        NodeKind::Fallback => SiblingClass::Fallback,
        _ => SiblingClass::Route,
    };
    let specificity = if class == SiblingClass::Route && node.is_parameterized() {
        Specificity::Dynamic {
            static_prefix: Reverse(node.static_prefix_len()),
        }
    } else {
        Specificity::Static
    };
    SortKey {
        class,
        specificity,
        order_key: node.order_key,
    }
}

/// ツリー全体の兄弟の並びを確定させる
///
/// ツリーの所有権を受け取り、並べ替えたものを返す。安定ソートなので
/// 何度適用しても結果は変わらない。
pub fn order(mut node: RouteNode) -> RouteNode {
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(order)
        .collect();
    node.children.sort_by_key(sort_key);
    node
}
