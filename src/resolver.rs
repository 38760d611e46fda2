use path_absolutize::Absolutize;
use std::io;
use std::path::{Path, PathBuf};

/// ページルートからの相対ファイルパスを、ルーティングモジュールから見た
/// import 指定子に変換する。
///
/// - `"users/index.guard.ts"` → `"./users/index.guard"`
/// - `"index.component.ts"`   → `"./index.component"`
pub fn import_specifier(relative_file: &str) -> String {
    let normalized = normalize_separators(relative_file);
    let without_ext = normalized
        .strip_suffix(".ts")
        .unwrap_or(normalized.as_str());
    format!("./{}", without_ext)
}

/// `\` を `/` に揃え、先頭の `./` と空の要素を取り除く
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// ファイルパスの親ディレクトリ (`/` 区切り、ページルート直下は "")
pub fn parent_directory(relative_file: &str) -> String {
    let normalized = normalize_separators(relative_file);
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// プロジェクトルートを絶対パス化する。canonicalize と違い、シンボリックリンクを解決しない
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    Ok(path.absolutize()?.to_path_buf())
}

/// `root` を基準にした `/` 区切りの相対パス。`root` の外にあれば `None`
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_specifier_strips_ts_extension() {
        assert_eq!(import_specifier("users/index.guard.ts"), "./users/index.guard");
        assert_eq!(import_specifier("index.component.ts"), "./index.component");
        assert_eq!(
            import_specifier("about/#contact/index.component.ts"),
            "./about/#contact/index.component"
        );
    }

    #[test]
    fn normalize_handles_windows_separators() {
        assert_eq!(normalize_separators(".\\users\\_id\\index.html"), "users/_id/index.html");
        assert_eq!(normalize_separators("users//index.html"), "users/index.html");
    }

    #[test]
    fn parent_directory_of_root_file_is_empty() {
        assert_eq!(parent_directory("index.guard.ts"), "");
        assert_eq!(parent_directory("users/_id/index.guard.ts"), "users/_id");
    }

    #[test]
    fn relative_to_outside_root_is_none() {
        let root = Path::new("/proj/src/app");
        assert_eq!(
            relative_to(Path::new("/proj/src/app/users/index.html"), root).as_deref(),
            Some("users/index.html")
        );
        assert_eq!(relative_to(Path::new("/other/index.html"), root), None);
    }
}
