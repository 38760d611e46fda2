use swc_common::{FileName, SourceMap, sync::Lrc};
use swc_ecma_ast::*;
use swc_ecma_parser::{Parser as SwcParser, StringInput, Syntax, TsConfig, lexer::Lexer};
use swc_ecma_visit::{Visit, VisitWith};

use crate::error::{CompileError, Result};

/// export されているクラス 1 つ分の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedClass {
    /// `export default class {}` のように名前が無い場合は None
    pub name: Option<String>,
    /// クラスに定義されたメソッド名・プロパティ名 (宣言順)
    pub members: Vec<String>,
}

/// AST をトラバースして export されたクラス宣言を集める Visitor
///
/// 関数本体やネストしたスコープの中身には関心がないので、
/// export 宣言の中にあるクラスだけを見る。
#[derive(Default)]
struct ExportVisitor {
    classes: Vec<ExportedClass>,
}

impl ExportVisitor {
    /// クラス本体からメソッド名とプロパティ名を取り出す
    fn collect_members(class: &Class) -> Vec<String> {
        class
            .body
            .iter()
            .filter_map(|member| match member {
                ClassMember::Method(ClassMethod { key, .. }) => prop_name(key),
                ClassMember::ClassProp(ClassProp { key, .. }) => prop_name(key),
                _ => None,
            })
            .collect()
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(Str { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

impl Visit for ExportVisitor {
    /// `export class Foo {}`
    fn visit_export_decl(&mut self, export: &ExportDecl) {
        if let Decl::Class(ClassDecl { ident, class, .. }) = &export.decl {
            self.classes.push(ExportedClass {
                name: Some(ident.sym.to_string()),
                members: Self::collect_members(class),
            });
        }
    }

    /// `export default class Foo {}`
    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        if let DefaultDecl::Class(ClassExpr { ident, class, .. }) = &export.decl {
            self.classes.push(ExportedClass {
                name: ident.as_ref().map(|i| i.sym.to_string()),
                members: Self::collect_members(class),
            });
        }
    }
}

/// TypeScript ソースを解析し、export されたクラスを宣言順に返す
///
/// 型検査などは行わず、構文木からクラス宣言とメンバー名を拾うだけ。
pub fn exported_classes(source_path: &str, src: &str) -> Result<Vec<ExportedClass>> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(source_path.to_string()), src.to_string());

    // デコレータ (@Injectable) を含む TypeScript としてパースする
    let syntax = Syntax::Typescript(TsConfig {
        tsx: false,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: true,
    });

    let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
    let mut parser = SwcParser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| CompileError::GuardParse {
        path: source_path.to_string(),
        message: format!("{:?}", e.kind()),
    })?;

    let mut visitor = ExportVisitor::default();
    module.visit_with(&mut visitor);

    tracing::debug!(
        file = source_path,
        classes = visitor.classes.len(),
        "ガードファイルの export を解析しました"
    );

    Ok(visitor.classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_decorated_exported_class_and_methods() {
        let src = r#"
import { Injectable } from '@angular/core';

@Injectable({
  providedIn: 'root'
})
export class AppRouteGuard implements CanActivate {
  public canActivate(): Promise<boolean> {
    return Promise.resolve(false);
  }
  public canDeactivate() {}
}
"#;
        let classes = exported_classes("index.guard.ts", src).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name.as_deref(), Some("AppRouteGuard"));
        assert_eq!(classes[0].members, vec!["canActivate", "canDeactivate"]);
    }

    #[test]
    fn ignores_non_exported_classes() {
        let src = "class Helper { canActivate() {} }\nexport const x = 1;";
        let classes = exported_classes("index.guard.ts", src).unwrap();
        assert!(classes.is_empty());
    }

    #[test]
    fn collects_default_export_and_arrow_properties() {
        let src = "export default class Guard { canActivateChild = () => true; }";
        let classes = exported_classes("index.guard.ts", src).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name.as_deref(), Some("Guard"));
        assert_eq!(classes[0].members, vec!["canActivateChild"]);
    }

    #[test]
    fn reports_syntax_errors() {
        let err = exported_classes("broken.guard.ts", "export class {").unwrap_err();
        assert!(matches!(err, CompileError::GuardParse { path, .. } if path == "broken.guard.ts"));
    }
}
