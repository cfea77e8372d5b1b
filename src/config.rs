use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{IconStackError, IconStackResult};
use crate::pipeline::manifest::{PROCEDURAL_TARGETS, SOURCE_FAMILIES};
use crate::pipeline::store::normalize_rel_path;
use crate::procedural::scene::ProceduralStyle;
use crate::raster::text::FontSource;

/// Where the pixels for one source family come from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Image file relative to `source_dir`.
    File { path: String },
    /// Ask the image source provider.
    Prompt { prompt: String },
    /// Fully transparent image at every scale.
    Blank,
}

impl SourceSpec {
    pub fn file(path: impl Into<String>) -> Self {
        SourceSpec::File { path: path.into() }
    }
}

/// Everything a run needs. Loaded once and passed to [`crate::Driver::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory source images are read from.
    pub source_dir: PathBuf,
    /// Directory rendered files are written to; created if missing.
    pub output_dir: PathBuf,
    /// Asset catalog (`.brandassets`) to install into, if any.
    pub catalog_dir: Option<PathBuf>,
    /// Procedural rendering resolution multiplier.
    pub super_sample: u32,
    /// Process families on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; rayon's default when unset.
    pub threads: Option<usize>,
    /// Restrict a run to these family ids; empty means all.
    pub only: Vec<String>,
    /// Font candidates in preference order; the built-in bitmap font is always tried last.
    pub fonts: Vec<FontSource>,
    /// Per-family source overrides, keyed by family id.
    pub sources: BTreeMap<String, SourceSpec>,
    pub style: ProceduralStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("nanobanana-output"),
            output_dir: PathBuf::from("PRO_DISPLAY_ASSETS"),
            catalog_dir: None,
            super_sample: 4,
            parallel: false,
            threads: None,
            only: Vec::new(),
            fonts: default_fonts(),
            sources: BTreeMap::new(),
            style: ProceduralStyle::default(),
        }
    }
}

/// Heavy system faces, most preferred first.
pub fn default_fonts() -> Vec<FontSource> {
    vec![
        FontSource::new("/System/Library/Fonts/Supplemental/Avenir Next.ttc", 7),
        FontSource::new("/System/Library/Fonts/Helvetica.ttc", 1),
        FontSource::new("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf", 0),
    ]
}

/// Built-in source for a family id, used when `sources` has no entry.
pub fn default_source(family: &str) -> SourceSpec {
    match family {
        "icon_small_back" | "icon_large_back" => {
            SourceSpec::file("dark_grey_brushed_aluminum_textu.png")
        }
        "icon_small_middle" | "icon_large_middle" => {
            SourceSpec::file("minimalist_technical_wireframe_g.png")
        }
        "icon_small_front" | "icon_large_front" => {
            SourceSpec::file("glossy_glass_prism_in_the_shape_.png")
        }
        "top_shelf" | "launch_image" => SourceSpec::file("cinematic_wide_shot_of_a_highend.png"),
        "top_shelf_wide" => SourceSpec::file("abstract_wide_artistic_banner_fe.png"),
        _ => SourceSpec::Blank,
    }
}

impl PipelineConfig {
    /// Parse from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> IconStackResult<Self> {
        let cfg: PipelineConfig = serde_json::from_reader(r)
            .map_err(|e| IconStackError::serde(format!("parse pipeline config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse from a JSON file. Relative directories are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> IconStackResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            IconStackError::validation(format!("open pipeline config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(base) = path.parent() {
            cfg.rebase(base);
        }
        Ok(cfg)
    }

    /// Make relative directories relative to `base`.
    pub fn rebase(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.source_dir);
        fix(&mut self.output_dir);
        if let Some(c) = self.catalog_dir.as_mut() {
            fix(c);
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> IconStackResult<()> {
        if self.super_sample == 0 {
            return Err(IconStackError::validation("super_sample must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(IconStackError::validation("threads must be >= 1 when set"));
        }
        for id in &self.only {
            if !is_known_family(id) {
                return Err(IconStackError::validation(format!(
                    "unknown family id '{id}' in only"
                )));
            }
        }
        for (id, spec) in &self.sources {
            if !SOURCE_FAMILIES.iter().any(|f| f.id == id) {
                return Err(IconStackError::validation(format!(
                    "unknown family id '{id}' in sources"
                )));
            }
            match spec {
                SourceSpec::File { path } => {
                    normalize_rel_path(path).map_err(|e| {
                        IconStackError::validation(format!("sources.{id}: {e}"))
                    })?;
                }
                SourceSpec::Prompt { prompt } if prompt.trim().is_empty() => {
                    return Err(IconStackError::validation(format!(
                        "sources.{id}: prompt must be non-empty"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Configured or built-in source for a family.
    pub fn source_for(&self, family: &str) -> SourceSpec {
        self.sources
            .get(family)
            .cloned()
            .unwrap_or_else(|| default_source(family))
    }

    /// Whether `family` takes part in this run.
    pub fn selects(&self, family: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|id| id == family)
    }
}

fn is_known_family(id: &str) -> bool {
    SOURCE_FAMILIES.iter().any(|f| f.id == id) || PROCEDURAL_TARGETS.iter().any(|t| t.id == id)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
