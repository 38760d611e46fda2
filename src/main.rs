// src/main.rs

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use skyux_route_compiler::compile;
use skyux_route_compiler::config::{SKYUX_CONFIG_FILE, SkyuxConfig};
use skyux_route_compiler::discovery::discover;
use skyux_route_compiler::logger::init_logger;
use skyux_route_compiler::output::write_outputs;
use skyux_route_compiler::resolver::absolutize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// app-routing.module.ts の全文
    Module,
    /// ルートツリーと import 一覧の JSON
    Json,
}

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "SKY UX Route Compiler",
    version,
    about = "SKY UX のファイルベースのルーティングを Angular の Routes 定義に変換する CLI ツール"
)]
struct Cli {
    /// 変換対象の SKY UX プロジェクトルート
    /// 例: `--project-root C:/path/to/my-spa`
    #[arg(short = 'r', long = "project-root", value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// プロジェクトルートからのページディレクトリ
    #[arg(long = "pages-dir", value_name = "DIR", default_value = "src/app")]
    pages_dir: PathBuf,

    /// skyuxconfig.json のパス (省略時はプロジェクトルート直下)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Module)]
    format: OutputFormat,

    /// 指定すると標準出力ではなく、このディレクトリにファイルを書き出す
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    out_dir: Option<PathBuf>,

    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    // 1) CLI 引数をパースし、プロジェクトルートを絶対パス化
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let project_dir = absolutize(&cli.project_root)
        .with_context(|| format!("invalid project root {:?}", cli.project_root))?;

    // 2) skyuxconfig.json からリダイレクトを読み込む
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| project_dir.join(SKYUX_CONFIG_FILE));
    let config = SkyuxConfig::load(&config_path)?;
    match config.project_name(&project_dir) {
        Ok(name) => tracing::info!(project = %name, "ルート設定を生成します"),
        Err(err) => tracing::warn!(error = %err, "プロジェクト名を決定できませんでした"),
    }

    // 3) ページとガードを探索してコンパイル
    let pages_dir = project_dir.join(&cli.pages_dir);
    let discovered = discover(&pages_dir)?;
    let compiled = compile(&discovered.into_input(config.redirect_rules()))?;

    // 4) 結果を出力 (コンパイルに失敗した場合はここまで来ないので、ファイルは一切書かない)
    match &cli.out_dir {
        Some(out_dir) => {
            write_outputs(&compiled, &pages_dir, out_dir)?;
        }
        None => match cli.format {
            OutputFormat::Module => print!("{}", compiled.routing_module()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
        },
    }

    Ok(())
}
