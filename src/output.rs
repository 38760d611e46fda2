// src/output.rs
//
// コンパイル結果をディレクトリに書き出す。
// ルーティングモジュール、ページごとのコンポーネントとそのテンプレートを作る。

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compiler::CompiledRoutes;
use crate::emitter::render_index_component;
use crate::error::CompileError;
use crate::model::{PageDescriptor, PageRole};
use crate::segment::parse;

pub const ROUTING_MODULE_FILE: &str = "app-routing.module.ts";

/// ルートの index.html が無いときの RootRouteIndexComponent のテンプレート
pub const ROOT_OUTLET_TEMPLATE: &str = "<router-outlet></router-outlet>";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Could not write \"{}\": {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not copy \"{}\" to \"{}\": {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `out_dir` に生成物をすべて書き出し、書いたファイルを書き出し順で返す
///
/// ページのテンプレートは `pages_dir` にある元の index.html をそのままコピーする。
pub fn write_outputs(
    compiled: &CompiledRoutes,
    pages_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, OutputError> {
    let mut written = Vec::new();

    let module = out_dir.join(ROUTING_MODULE_FILE);
    write_file(&module, &compiled.routing_module())?;
    written.push(module);

    for page in compiled.pages.iter().filter(|p| p.role != PageRole::NotFound) {
        written.extend(write_page(page, pages_dir, out_dir)?);
    }

    // ルートの index.html が無くても RootRouteIndexComponent は必要
    if !compiled.pages.iter().any(|p| p.role == PageRole::RootIndex) {
        let root = parse("index.html", 0)?;
        let component = out_dir.join(root.component_path());
        write_file(&component, &render_index_component(&root))?;
        let template = out_dir.join(root.template_path());
        write_file(&template, ROOT_OUTLET_TEMPLATE)?;
        written.push(component);
        written.push(template);
    }

    tracing::info!(
        out_dir = %out_dir.display(),
        files = written.len(),
        "ファイルを書き出しました"
    );
    Ok(written)
}

fn write_page(
    page: &PageDescriptor,
    pages_dir: &Path,
    out_dir: &Path,
) -> Result<[PathBuf; 2], OutputError> {
    let component = out_dir.join(page.component_path());
    write_file(&component, &render_index_component(page))?;

    let source = pages_dir.join(&page.source_path);
    let template = out_dir.join(page.template_path());
    fs::copy(&source, &template).map_err(|err| OutputError::Copy {
        from: source.clone(),
        to: template.clone(),
        source: err,
    })?;
    tracing::debug!(from = %source.display(), to = %template.display(), "テンプレートをコピーしました");

    Ok([component, template])
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    let io_err = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    tracing::debug!(file = %path.display(), "書き出しました");
    Ok(())
}
