// src/config.rs
//
// skyuxconfig.json からリダイレクトとプロジェクト名を読み込む。

use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::RedirectRule;

pub const SKYUX_CONFIG_FILE: &str = "skyuxconfig.json";
const PACKAGE_JSON_FILE: &str = "package.json";
const SPA_PACKAGE_PREFIX: &str = "blackbaud-skyux-spa-";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "A skyuxconfig.json file was not found. Please execute this command within a SKY UX project."
    )]
    NotFound(PathBuf),

    #[error("Could not read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse \"{}\": {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine the project name from skyuxconfig.json or package.json.")]
    MissingProjectName,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSection {
    #[serde(default)]
    pub base: Option<String>,
}

/// skyuxconfig.json のうち、このツールが使う部分だけ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkyuxConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub app: Option<AppSection>,
    /// 元パス → 転送先。宣言順がそのまま優先順位になるので IndexMap で保持する
    #[serde(default)]
    pub redirects: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
}

impl SkyuxConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        read_json(path)
    }

    pub fn redirect_rules(&self) -> Vec<RedirectRule> {
        self.redirects
            .iter()
            .map(|(source, target)| RedirectRule::new(source.as_str(), target.as_str()))
            .collect()
    }

    /// `app.base` → `name` → package.json の name (SPA の接頭辞を除く) の順で決める
    pub fn project_name(&self, project_root: &Path) -> Result<String, ConfigError> {
        if let Some(base) = self.app.as_ref().and_then(|app| app.base.clone()) {
            return Ok(base);
        }
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        let package: PackageJson = read_json(&project_root.join(PACKAGE_JSON_FILE))?;
        let name = package.name.ok_or(ConfigError::MissingProjectName)?;
        Ok(strip_prefix_ignore_case(&name, SPA_PACKAGE_PREFIX).to_string())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}
