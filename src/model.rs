// src/model.rs
use serde::Serialize;
use std::collections::BTreeSet;

/// パラメータを表すディレクトリ名の先頭文字 (例: `_userId` → `:userId`)
pub const PARAMETER_MARKER: char = '_';

/// 親子ルートとしてネストさせるディレクトリ名の先頭文字 (例: `#contact`)
pub const NESTING_MARKER: char = '#';

/// すべてのルートにマッチするフォールバックのパス
pub const WILDCARD_PATH: &str = "**";

pub const ROOT_INDEX_IDENTIFIER: &str = "RootRouteIndexComponent";
pub const ROOT_INDEX_SELECTOR: &str = "app-root-route-index";
pub const NOT_FOUND_IDENTIFIER: &str = "NotFoundComponent";
pub const NOT_FOUND_SELECTOR: &str = "app-not-found";

/// ページのディレクトリ 1 階層分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum Segment {
    Literal(String),
    Parameter(String),
    NestedScope(String),
}

impl Segment {
    /// マーカーを取り除いた名前
    pub fn name(&self) -> &str {
        match self {
            Segment::Literal(name) | Segment::Parameter(name) | Segment::NestedScope(name) => name,
        }
    }

    /// ルートの path に出力される断片
    pub fn path_fragment(&self) -> String {
        match self {
            Segment::Parameter(name) => format!(":{}", name),
            other => other.name().to_string(),
        }
    }

    /// マーカー付きの元のディレクトリ名
    pub fn raw(&self) -> String {
        match self {
            Segment::Literal(name) => name.clone(),
            Segment::Parameter(name) => format!("{}{}", PARAMETER_MARKER, name),
            Segment::NestedScope(name) => format!("{}{}", NESTING_MARKER, name),
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Segment::Parameter(_))
    }

    pub fn is_nested_scope(&self) -> bool {
        matches!(self, Segment::NestedScope(_))
    }
}

/// ページの種類。ルートページと not-found ページは予約済みの名前を持つ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageRole {
    Route,
    RootIndex,
    NotFound,
}

/// 探索された 1 ページ分の情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// ページルートからの相対パス (例: "users/_userId/index.html")
    pub source_path: String,
    /// マーカー付きのままのディレクトリ (ルートページは "")
    pub directory: String,
    pub segments: Vec<Segment>,
    /// コンポーネントのクラス名 (例: "UsersUserIdRouteIndexComponent")
    pub identifier: String,
    /// コンポーネントのセレクタ (例: "app-users-user-id-route-index")
    pub selector: String,
    pub role: PageRole,
    pub discovery_index: usize,
}

impl PageDescriptor {
    /// 生成されるコンポーネントファイルのページルートからの相対パス
    pub fn component_path(&self) -> String {
        match self.role {
            PageRole::NotFound => "not-found.component.ts".to_string(),
            _ if self.directory.is_empty() => "index.component.ts".to_string(),
            _ => format!("{}/index.component.ts", self.directory),
        }
    }

    /// コンポーネントの `templateUrl` が指す HTML (コンポーネントと同じディレクトリ)
    pub fn template_path(&self) -> String {
        self.component_path().replace(".component.ts", ".component.html")
    }

    /// ルーティングモジュールからの import パス
    pub fn import_path(&self) -> String {
        crate::resolver::import_specifier(&self.component_path())
    }

    pub fn component_ref(&self) -> ComponentRef {
        ComponentRef {
            identifier: self.identifier.clone(),
            import_path: self.import_path(),
        }
    }
}

/// ガードクラスが実装しているメソッドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardCapability {
    CanActivate,
    CanActivateChild,
    CanDeactivate,
}

impl GuardCapability {
    pub const ALL: [GuardCapability; 3] = [
        GuardCapability::CanActivate,
        GuardCapability::CanActivateChild,
        GuardCapability::CanDeactivate,
    ];

    /// TypeScript のメソッド名。Angular のルートプロパティ名も同じ
    pub fn method_name(self) -> &'static str {
        match self {
            GuardCapability::CanActivate => "canActivate",
            GuardCapability::CanActivateChild => "canActivateChild",
            GuardCapability::CanDeactivate => "canDeactivate",
        }
    }

    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.method_name() == name)
    }
}

/// 1 つのガードファイルの解析結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardDescriptor {
    /// ページルートからの相対パス (例: "users/index.guard.ts")
    pub source_path: String,
    /// ガードが適用されるディレクトリ (ページルートは "")
    pub directory: String,
    pub class_name: String,
    pub capabilities: BTreeSet<GuardCapability>,
    pub discovery_index: usize,
}

impl GuardDescriptor {
    pub fn import_path(&self) -> String {
        crate::resolver::import_specifier(&self.source_path)
    }
}

/// 設定ファイルから読み込んだリダイレクト 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectRule {
    pub source: String,
    pub target: String,
}

impl RedirectRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PathMatch {
    Full,
    Prefix,
}

impl PathMatch {
    pub fn as_str(self) -> &'static str {
        match self {
            PathMatch::Full => "full",
            PathMatch::Prefix => "prefix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub target: String,
    pub path_match: PathMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub identifier: String,
    pub import_path: String,
}

/// ノードに付与されたガード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedGuard {
    pub class_name: String,
    pub import_path: String,
    pub capabilities: BTreeSet<GuardCapability>,
    pub discovery_index: usize,
}

impl From<&GuardDescriptor> for AttachedGuard {
    fn from(guard: &GuardDescriptor) -> Self {
        AttachedGuard {
            class_name: guard.class_name.clone(),
            import_path: guard.import_path(),
            capabilities: guard.capabilities.clone(),
            discovery_index: guard.discovery_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// `Routes` 配列そのものを表す最上位のコンテナ
    Config,
    /// コンポーネントを持たないまとめ用のノード (ルートグループを含む)
    Group,
    Page,
    RootIndex,
    Redirect,
    Fallback,
}

/// 出力するルートツリーのノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    pub kind: NodeKind,
    pub path_segment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    /// 子ルート。順序がそのままマッチの優先順位になる
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<AttachedGuard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
    /// このノードを生んだディレクトリ (マーカー付きのまま)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip)]
    pub order_key: usize,
}

impl RouteNode {
    pub fn new(kind: NodeKind, path_segment: impl Into<String>) -> Self {
        RouteNode {
            kind,
            path_segment: path_segment.into(),
            component: None,
            children: Vec::new(),
            guard: None,
            redirect: None,
            origin: None,
            order_key: 0,
        }
    }

    pub fn with_component(mut self, component: ComponentRef) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_order_key(mut self, order_key: usize) -> Self {
        self.order_key = order_key;
        self
    }

    pub fn redirect(rule: &RedirectRule, order_key: usize) -> Self {
        let path_match = if rule.source.is_empty() {
            PathMatch::Full
        } else {
            PathMatch::Prefix
        };
        let mut node = RouteNode::new(NodeKind::Redirect, rule.source.clone()).with_order_key(order_key);
        node.redirect = Some(Redirect {
            target: rule.target.clone(),
            path_match,
        });
        node
    }

    pub fn fallback() -> Self {
        RouteNode::new(NodeKind::Fallback, WILDCARD_PATH).with_component(ComponentRef {
            identifier: NOT_FOUND_IDENTIFIER.to_string(),
            import_path: crate::resolver::import_specifier("not-found.component.ts"),
        })
    }

    pub fn is_redirect(&self) -> bool {
        self.kind == NodeKind::Redirect
    }

    /// path の中にパラメータ (`:name`) が含まれるか
    pub fn is_parameterized(&self) -> bool {
        self.path_segment.split('/').any(|part| part.starts_with(':'))
    }

    /// 先頭から続く静的なパス要素の数
    pub fn static_prefix_len(&self) -> usize {
        self.path_segment
            .split('/')
            .filter(|part| !part.is_empty())
            .take_while(|part| !part.starts_with(':'))
            .count()
    }

    /// 子孫をすべて含めた前順の走査
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RouteNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
