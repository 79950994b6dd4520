use image::RgbaImage;
use thiserror::Error;
use ztx_gfx::{
    grid::compose_textures,
    meta_tile::{compose_meta_tiles, decode_meta_tile},
    tile::render_tile,
    ExtractionContext,
    GfxError,
};

use crate::{
    artifact::{ArtifactKind, ArtifactSink},
    config::ExtractorConfig,
    jobs::{MetaTileBatchJob, TextureBatchJob},
};

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("{failed} of {total} artifacts could not be extracted")]
pub struct JobsFailed {
    pub failed: usize,
    pub total:  usize,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<String>,
    /// Artifact name and the reason it was not written.
    pub failed:  Vec<(String, String)>,
}

/// Produces artifacts one job at a time. A job that fails is logged and skipped, the remaining
/// jobs still run.
pub struct Extractor<'c, S: ArtifactSink> {
    ctx:          &'c ExtractionContext,
    sink:         S,
    grid_columns: usize,
    only:         Option<ArtifactKind>,
    report:       RunReport,
}

// -------------------------------------------------------------------------------------------------

impl RunReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn into_result(self) -> Result<Self, JobsFailed> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(JobsFailed { failed: self.failed.len(), total: self.total() })
        }
    }
}

impl<'c, S: ArtifactSink> Extractor<'c, S> {
    pub fn new(ctx: &'c ExtractionContext, sink: S, grid_columns: usize) -> Self {
        Self { ctx, sink, grid_columns, only: None, report: RunReport::default() }
    }

    /// Skips every job that does not produce `kind`.
    #[must_use]
    pub fn only(self, kind: Option<ArtifactKind>) -> Self {
        Self { only: kind, ..self }
    }

    pub fn wants(&self, kind: ArtifactKind) -> bool {
        self.only.map_or(true, |only| only == kind)
    }

    pub fn texture(&mut self, offset: usize) {
        self.produce(ArtifactKind::Texture, offset, |ctx, _| render_tile(ctx, offset));
    }

    pub fn textures(&mut self, job: TextureBatchJob) {
        self.produce(ArtifactKind::Textures, job.offset, |ctx, columns| {
            compose_textures(ctx, job.offset, job.count, columns)
        });
    }

    pub fn meta_texture(&mut self, offset: usize) {
        self.produce(ArtifactKind::MetaTexture, offset, |ctx, _| decode_meta_tile(ctx, offset));
    }

    pub fn meta_textures(&mut self, job: MetaTileBatchJob) {
        self.produce(ArtifactKind::MetaTextures, job.offset, |ctx, columns| {
            compose_meta_tiles(ctx, job.offset, job.count, columns)
        });
    }

    /// Runs every job of `config`, in order, with `texture_jobs` after the sample texture.
    pub fn run_all(mut self, config: &ExtractorConfig, texture_jobs: &[TextureBatchJob]) -> (RunReport, S) {
        self.texture(config.sample_texture_offset);
        texture_jobs.iter().for_each(|&job| self.textures(job));
        self.textures(config.wall_texture_batch);
        self.meta_texture(config.sample_meta_texture_offset);
        config.meta_texture_batches.iter().for_each(|&job| self.meta_textures(job));
        self.finish()
    }

    pub fn finish(self) -> (RunReport, S) {
        (self.report, self.sink)
    }

    fn produce<F>(&mut self, kind: ArtifactKind, offset: usize, extract: F)
    where
        F: FnOnce(&ExtractionContext, usize) -> Result<RgbaImage, GfxError>,
    {
        if !self.wants(kind) {
            return;
        }

        let name = kind.file_stem(offset);
        log::info!("Extracting {kind} {name}");
        let result = extract(self.ctx, self.grid_columns)
            .map_err(anyhow::Error::from)
            .and_then(|image| self.sink.write(&name, &image));
        match result {
            Ok(()) => self.report.written.push(name),
            Err(e) => {
                log::error!("Could not extract {kind} {name}:\n- {e:#}");
                self.report.failed.push((name, format!("{e:#}")));
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
