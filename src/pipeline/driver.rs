use std::path::PathBuf;

use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::assets::encode::encode_png;
use crate::catalog::contents::{CatalogFile, install};
use crate::config::{PipelineConfig, SourceSpec};
use crate::fit::cover::fit_cover;
use crate::foundation::buffer::PixelBuffer;
use crate::foundation::error::{IconStackError, IconStackResult};
use crate::pipeline::manifest::{
    AssetSlot, PROCEDURAL_TARGETS, ProceduralKind, ProceduralTarget, SOURCE_FAMILIES, SlotFamily,
};
use crate::pipeline::store::{InputStore, OutputStore};
use crate::procedural::scene::{downsample_layers, flatten_downsampled, render_layers};
use crate::provider::ImageSourceProvider;
use crate::raster::text::{FontChain, ResolvedFont, TextEngine};

/// A file the run wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFile {
    pub slot: AssetSlot,
    pub path: PathBuf,
}

/// A family that produced no files.
#[derive(Debug)]
pub struct SkippedSlot {
    /// Family or target id.
    pub family: String,
    pub error: IconStackError,
}

/// Outcome of one run, in manifest order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<WrittenFile>,
    pub skipped: Vec<SkippedSlot>,
    /// Non-fatal problems, such as catalog manifests that could not be updated.
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Written file names, in order.
    pub fn file_names(&self) -> Vec<&str> {
        self.written
            .iter()
            .map(|f| f.slot.file_name.as_str())
            .collect()
    }
}

type FamilyOutcome = (&'static str, IconStackResult<Vec<WrittenFile>>);

/// Runs the source or procedural pipeline over the static manifest.
///
/// Each family is encoded completely in memory before any of its files is written. A family whose
/// source is missing, or whose provider fails, is skipped and reported; the others still run.
pub struct Driver {
    config: PipelineConfig,
    provider: Option<Box<dyn ImageSourceProvider>>,
    inputs: InputStore,
    outputs: OutputStore,
    fonts: FontChain,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("provider", &self.provider.is_some())
            .field("fonts", &self.fonts)
            .finish()
    }
}

impl Driver {
    /// Validate `config` and prepare the output directory.
    pub fn new(
        config: PipelineConfig,
        provider: Option<Box<dyn ImageSourceProvider>>,
    ) -> IconStackResult<Self> {
        config.validate()?;
        let inputs = InputStore::new(&config.source_dir);
        let outputs = OutputStore::create(&config.output_dir)?;
        let fonts = FontChain::from_sources(&config.fonts);
        Ok(Self {
            config,
            provider,
            inputs,
            outputs,
            fonts,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cover-fit every source family into its slots.
    #[tracing::instrument(skip(self))]
    pub fn run_sources(&self) -> IconStackResult<RunReport> {
        let families: Vec<&SlotFamily> = SOURCE_FAMILIES
            .iter()
            .filter(|f| self.config.selects(f.id))
            .collect();
        let outcomes = self.fan_out(
            &families,
            || (),
            |_, family| (family.id, self.source_family(family)),
        )?;
        self.finish_run(outcomes)
    }

    /// Render every procedural target into its slots.
    #[tracing::instrument(skip(self))]
    pub fn run_procedural(&self) -> IconStackResult<RunReport> {
        let targets: Vec<&ProceduralTarget> = PROCEDURAL_TARGETS
            .iter()
            .filter(|t| self.config.selects(t.id))
            .collect();
        let outcomes = self.fan_out(
            &targets,
            || {
                let mut engine = TextEngine::new();
                let font = self.fonts.resolve(&mut engine);
                (engine, font)
            },
            |state, target| {
                let (engine, font) = state;
                (target.id, self.procedural_target(target, engine, font))
            },
        )?;
        self.finish_run(outcomes)
    }

    #[tracing::instrument(skip(self, family), fields(family = family.id))]
    fn source_family(&self, family: &SlotFamily) -> IconStackResult<Vec<WrittenFile>> {
        let slots = family.slots()?;
        let mut encoded = Vec::with_capacity(slots.len());
        match self.config.source_for(family.id) {
            SourceSpec::Blank => {
                for slot in slots {
                    let bytes = encode_png(&PixelBuffer::new(slot.size)?, slot.alpha)?;
                    encoded.push((slot, bytes));
                }
            }
            spec => {
                let source = decode_image(&self.load_source(&spec)?)?;
                tracing::debug!(source = %source.size(), "source decoded");
                // Each scale runs its own fit against the source, never an upscaled 1× result.
                for slot in slots {
                    let fitted = fit_cover(&source, slot.size)?;
                    let bytes = encode_png(&fitted, slot.alpha)?;
                    encoded.push((slot, bytes));
                }
            }
        }
        self.write_family(encoded)
    }

    #[tracing::instrument(skip(self, target, engine, font), fields(target = target.id))]
    fn procedural_target(
        &self,
        target: &ProceduralTarget,
        engine: &mut TextEngine,
        font: &ResolvedFont,
    ) -> IconStackResult<Vec<WrittenFile>> {
        let mut encoded = Vec::new();
        for &scale in target.scales {
            let size = target.size_at(scale)?;
            let slots = target.slots_at(scale)?;
            let stack = render_layers(
                size,
                self.config.super_sample,
                &self.config.style,
                font,
                engine,
            )?;
            match target.kind {
                ProceduralKind::IconLayers(_) => {
                    let layers = downsample_layers(stack, size)?;
                    for (slot, layer) in slots.into_iter().zip(layers) {
                        let bytes = encode_png(&layer.buffer, slot.alpha)?;
                        encoded.push((slot, bytes));
                    }
                }
                ProceduralKind::Flattened(_) => {
                    let flat = flatten_downsampled(&stack, size)?;
                    for slot in slots {
                        let bytes = encode_png(&flat, slot.alpha)?;
                        encoded.push((slot, bytes));
                    }
                }
            }
        }
        self.write_family(encoded)
    }

    fn load_source(&self, spec: &SourceSpec) -> IconStackResult<Vec<u8>> {
        match spec {
            SourceSpec::File { path } => self.inputs.read(path),
            SourceSpec::Prompt { prompt } => {
                let provider = self.provider.as_ref().ok_or_else(|| {
                    IconStackError::provider_failure("no image source provider configured")
                })?;
                let bytes = provider.generate(prompt).map_err(|e| match e {
                    IconStackError::ProviderFailure(_) => e,
                    other => IconStackError::provider_failure(other.to_string()),
                })?;
                if bytes.is_empty() {
                    return Err(IconStackError::provider_failure("provider returned no bytes"));
                }
                Ok(bytes)
            }
            SourceSpec::Blank => Err(IconStackError::validation("blank sources have no bytes")),
        }
    }

    /// Write every encoded slot of one family. If any write fails, files already written for the
    /// family are removed so a skipped family leaves nothing behind.
    fn write_family(&self, encoded: Vec<(AssetSlot, Vec<u8>)>) -> IconStackResult<Vec<WrittenFile>> {
        let mut written: Vec<WrittenFile> = Vec::with_capacity(encoded.len());
        for (slot, bytes) in encoded {
            let path = match self.outputs.write(&slot.file_name, &bytes) {
                Ok(path) => path,
                Err(e) => {
                    for f in &written {
                        if let Err(rm) = std::fs::remove_file(&f.path) {
                            tracing::warn!(file = %f.path.display(), error = %rm, "cleanup failed");
                        }
                    }
                    return Err(e);
                }
            };
            tracing::info!(file = %slot.file_name, size = %slot.size, "wrote {}", slot.label);
            written.push(WrittenFile { slot, path });
        }
        Ok(written)
    }

    fn fan_out<T, S, R>(
        &self,
        items: &[T],
        init: impl Fn() -> S + Sync + Send,
        work: impl Fn(&mut S, &T) -> R + Sync + Send,
    ) -> IconStackResult<Vec<R>>
    where
        T: Sync,
        R: Send,
    {
        if !self.config.parallel {
            let mut state = init();
            return Ok(items.iter().map(|item| work(&mut state, item)).collect());
        }
        let pool = build_thread_pool(self.config.threads)?;
        Ok(pool.install(|| {
            items
                .par_iter()
                .map_init(&init, |state, item| work(state, item))
                .collect()
        }))
    }

    fn finish_run(&self, outcomes: Vec<FamilyOutcome>) -> IconStackResult<RunReport> {
        let mut report = RunReport::default();
        for (family, outcome) in outcomes {
            match outcome {
                Ok(files) => {
                    if let Some(root) = &self.config.catalog_dir {
                        self.install_catalog(root, &files, &mut report);
                    }
                    report.written.extend(files);
                }
                Err(error) if error.is_slot_recoverable() => {
                    tracing::warn!(family, %error, "skipping family");
                    report.skipped.push(SkippedSlot {
                        family: family.to_owned(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        tracing::info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            "run finished"
        );
        Ok(report)
    }

    fn install_catalog(&self, root: &std::path::Path, files: &[WrittenFile], report: &mut RunReport) {
        let mut subpaths: Vec<&str> = Vec::new();
        for f in files {
            if !subpaths.contains(&f.slot.catalog_subpath.as_str()) {
                subpaths.push(&f.slot.catalog_subpath);
            }
        }
        for subpath in subpaths {
            let group: Vec<CatalogFile> = files
                .iter()
                .filter(|f| f.slot.catalog_subpath == subpath)
                .map(|f| CatalogFile {
                    scale: f.slot.scale,
                    file_name: f.slot.file_name.clone(),
                    source: f.path.clone(),
                })
                .collect();
            let (outcome, warning) = install(root, subpath, &group);
            if let Some(w) = warning {
                tracing::warn!(subpath, copied = outcome.copied.len(), "{w}");
                report.warnings.push(format!("{subpath}: {w}"));
            }
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> IconStackResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(IconStackError::validation("threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| IconStackError::validation(format!("failed to build rayon thread pool: {e}")))
}
