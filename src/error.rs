// src/error.rs

use thiserror::Error;

/// ルート設定コンパイル中に発生するエラー
///
/// どのエラーもその時点でコンパイル全体を中断する (部分的な出力は行わない)。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// 2 つのページが同じコンポーネント名に解決された
    #[error(
        "The pages \"{first}\" and \"{second}\" both resolve to the component name \"{identifier}\"."
    )]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },

    /// ページパスに空のマーカー名などが含まれている
    #[error("The page path \"{path}\" is invalid: {reason}.")]
    InvalidPagePath { path: String, reason: String },

    #[error("The file \"{path}\" does not export a class.")]
    MissingGuardExport { path: String },

    #[error("As a best practice, only export one guard per file in \"{path}\".")]
    AmbiguousGuardExport { path: String },

    #[error(
        "The file \"{path}\" does not export a route guard class, or it is formatted incorrectly."
    )]
    MalformedGuard { path: String },

    /// ガードファイルが TypeScript として解析できなかった
    #[error("Could not parse the guard file \"{path}\": {message}")]
    GuardParse { path: String, message: String },

    #[error("The directory \"{directory}\" declares more than one guard (\"{first}\" and \"{second}\").")]
    DuplicateGuardDirectory {
        directory: String,
        first: String,
        second: String,
    },

    /// 別々のガードファイルが同じクラス名を export している (import 名が衝突する)
    #[error(
        "The guard class \"{class_name}\" is exported by both \"{first}\" and \"{second}\"; guard class names must be unique."
    )]
    DuplicateGuardClass {
        class_name: String,
        first: String,
        second: String,
    },

    /// 同じディレクトリがネストスコープとフラットパスの両方として参照された
    #[error(
        "The directories \"{first}\" and \"{second}\" resolve to the same route \"{route}\"; a directory cannot be both a nested scope and a flat path."
    )]
    ConflictingScope {
        route: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, CompileError>;
