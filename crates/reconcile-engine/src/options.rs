//! The `options` table from spec.md §6, plus a teacher-style config file
//! layer (`RedlineOptionsFile` merged over `RedlineOptions::default()`) for
//! the CLI's ergonomic defaults — mirrors `core_config::discover()`/
//! `load_from()` exactly. The library API itself never reads a file; only
//! `reconcile-cli` calls `discover`/`load_from`.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RedlineOptions {
    /// Revision metadata author; defaults to a fixed engine identity.
    pub author: String,
    /// When false, emit plain text without `w:ins`/`w:del`/`w:rPrChange`
    /// wrappers but otherwise apply the same diff.
    pub generate_redlines: bool,
    /// Preferred `w14:paraId` match inside table wrappers.
    pub target_paragraph_id: Option<String>,
    /// Internal flag preventing infinite recursion through the table-cell
    /// recursion (C12); callers should never set this themselves.
    pub isolated_table_cell: bool,
    /// Font family to attach to newly generated runs in list generation.
    pub font: Option<String>,
}

impl Default for RedlineOptions {
    fn default() -> Self {
        RedlineOptions {
            author: "Redline Engine".to_string(),
            generate_redlines: true,
            target_paragraph_id: None,
            isolated_table_cell: false,
            font: None,
        }
    }
}

impl RedlineOptions {
    /// Returns a copy scoped for the table-cell recursion: same author and
    /// tracking behavior, cleared paragraph targeting (the isolated
    /// fragment already contains exactly the target paragraph), and the
    /// recursion guard set.
    pub fn for_isolated_cell(&self) -> RedlineOptions {
        RedlineOptions {
            author: self.author.clone(),
            generate_redlines: self.generate_redlines,
            target_paragraph_id: None,
            isolated_table_cell: true,
            font: self.font.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RedlineOptionsFile {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub generate_redlines: Option<bool>,
    #[serde(default)]
    pub font: Option<String>,
}

/// Checks the working directory for `redline.toml` first, falling back to
/// the platform config directory, the same order `core_config::discover`
/// uses for `oxidized.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("redline.toml");
    if local.exists() {
        return local;
    }
    match dirs::config_dir() {
        Some(dir) => dir.join("redline").join("redline.toml"),
        None => local,
    }
}

/// Loads `RedlineOptionsFile` from `path` (or the discovered default when
/// `None`) and merges it over `RedlineOptions::default()`. A missing file
/// is not an error — the defaults stand unchanged.
pub fn load_from(path: Option<PathBuf>) -> anyhow::Result<RedlineOptions> {
    let path = path.unwrap_or_else(discover);
    let mut options = RedlineOptions::default();
    if let Ok(raw) = std::fs::read_to_string(&path) {
        let file: RedlineOptionsFile =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        merge(&mut options, file);
    }
    Ok(options)
}

fn merge(options: &mut RedlineOptions, file: RedlineOptionsFile) {
    if let Some(author) = file.author {
        options.author = author;
    }
    if let Some(generate_redlines) = file.generate_redlines {
        options.generate_redlines = generate_redlines;
    }
    if let Some(font) = file.font {
        options.font = Some(font);
    }
}
