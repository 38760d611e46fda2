// src/lib.rs
//
// ファイルベースのルーティング (SKY UX 4 の index.html 構成) を
// Angular の `Routes` 定義に変換するルート設定コンパイラ。

pub mod builder;
pub mod compiler;
pub mod config;
pub mod discovery;
pub mod emitter;
pub mod error;
pub mod guards;
pub mod logger;
pub mod model;
pub mod ordering;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod segment;

pub use compiler::{CompileInput, CompiledRoutes, compile};
pub use error::{CompileError, Result};
