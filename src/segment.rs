// src/segment.rs
//
// ページのファイルパスを型付きのセグメント列に分解し、
// コンポーネント名・セレクタを導出する。

use std::collections::HashMap;

use crate::error::{CompileError, Result};
use crate::model::{
    NESTING_MARKER, NOT_FOUND_IDENTIFIER, NOT_FOUND_SELECTOR, PARAMETER_MARKER, PageDescriptor,
    PageRole, ROOT_INDEX_IDENTIFIER, ROOT_INDEX_SELECTOR, Segment,
};
use crate::resolver::normalize_separators;

const IDENTIFIER_SUFFIX: &str = "RouteIndexComponent";
const SELECTOR_PREFIX: &str = "app-";
const SELECTOR_SUFFIX: &str = "-route-index";
const NOT_FOUND_STEM: &str = "not-found";

/// ページルートからの相対パスを `PageDescriptor` に変換する
///
/// 最後の要素 (ページファイル自身) は捨て、ディレクトリだけをセグメントにする。
pub fn parse(source_path: &str, discovery_index: usize) -> Result<PageDescriptor> {
    let normalized = normalize_separators(source_path);
    let mut parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();

    let file_name = parts.pop().ok_or_else(|| CompileError::InvalidPagePath {
        path: source_path.to_string(),
        reason: "the path is empty".to_string(),
    })?;

    if parts.is_empty() && file_stem(file_name) == NOT_FOUND_STEM {
        return Ok(PageDescriptor {
            source_path: normalized.clone(),
            directory: String::new(),
            segments: Vec::new(),
            identifier: NOT_FOUND_IDENTIFIER.to_string(),
            selector: NOT_FOUND_SELECTOR.to_string(),
            role: PageRole::NotFound,
            discovery_index,
        });
    }

    let segments = parts
        .iter()
        .map(|raw| classify(raw, source_path))
        .collect::<Result<Vec<_>>>()?;

    let (identifier, selector, role) = if segments.is_empty() {
        (
            ROOT_INDEX_IDENTIFIER.to_string(),
            ROOT_INDEX_SELECTOR.to_string(),
            PageRole::RootIndex,
        )
    } else {
        (identifier_for(&segments), selector_for(&segments), PageRole::Route)
    };

    Ok(PageDescriptor {
        source_path: normalized.clone(),
        directory: parts.join("/"),
        segments,
        identifier,
        selector,
        role,
        discovery_index,
    })
}

/// ディレクトリ名 1 つをマーカーで分類する
pub fn classify(raw: &str, source_path: &str) -> Result<Segment> {
    let marked = |marker: char, build: fn(String) -> Segment| -> Result<Segment> {
        let name = &raw[marker.len_utf8()..];
        if name.is_empty() {
            return Err(CompileError::InvalidPagePath {
                path: source_path.to_string(),
                reason: format!("the directory \"{}\" has a marker but no name", raw),
            });
        }
        Ok(build(name.to_string()))
    };

    if raw.starts_with(NESTING_MARKER) {
        marked(NESTING_MARKER, Segment::NestedScope)
    } else if raw.starts_with(PARAMETER_MARKER) {
        marked(PARAMETER_MARKER, Segment::Parameter)
    } else {
        Ok(Segment::Literal(raw.to_string()))
    }
}

/// `users/_userId` → `UsersUserIdRouteIndexComponent`
pub fn identifier_for(segments: &[Segment]) -> String {
    let mut identifier: String = segments
        .iter()
        .flat_map(|s| split_words(s.name()))
        .map(|word| capitalize(&word))
        .collect();
    identifier.push_str(IDENTIFIER_SUFFIX);
    identifier
}

/// `users/_userId` → `app-users-user-id-route-index`
pub fn selector_for(segments: &[Segment]) -> String {
    let words: Vec<String> = segments
        .iter()
        .flat_map(|s| split_words(s.name()))
        .map(|word| word.to_lowercase())
        .collect();
    format!("{}{}{}", SELECTOR_PREFIX, words.join("-"), SELECTOR_SUFFIX)
}

/// 識別子が全ページで一意であることを、ノードを作る前にまとめて確認する
pub fn check_unique_identifiers(pages: &[PageDescriptor]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(pages.len());
    for page in pages {
        if let Some(first) = seen.insert(&page.identifier, &page.source_path) {
            return Err(CompileError::DuplicateIdentifier {
                identifier: page.identifier.clone(),
                first: first.to_string(),
                second: page.source_path.clone(),
            });
        }
    }
    Ok(())
}

/// `-` `_` `.` 空白、および小文字→大文字の境目で単語に分ける
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '-' || ch == '_' || ch == '.' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
