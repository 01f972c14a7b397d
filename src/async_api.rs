use crate::batch;
use crate::catalog::SizeSpec;
use crate::rendering::{RasterResult, Rasterizer};
use crate::source::VectorSource;
use crate::{Error, RasterConfig, Result};
use log::info;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// An async icon generator backed by tokio's blocking thread pool.
///
/// Every rasterization runs in its own `spawn_blocking` task; a semaphore
/// caps how many run at once. All tasks are issued up front and awaited
/// together, and results are reassembled in the order of the requested specs.
#[derive(Clone)]
pub struct IconGenerator {
    config: RasterConfig,
    rasterizer: Rasterizer,
    permits: Arc<Semaphore>,
}

impl IconGenerator {
    /// Create a generator. System fonts, if enabled, are loaded once here.
    pub fn new(config: RasterConfig) -> Result<Self> {
        config.validate()?;
        let rasterizer = Rasterizer::new(&config);
        let permits = Arc::new(Semaphore::new(config.jobs));
        Ok(Self {
            config,
            rasterizer,
            permits,
        })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Rasterize one spec.
    pub async fn rasterize(&self, source: VectorSource, spec: SizeSpec) -> Result<RasterResult> {
        self.generate_each(source, &[spec])
            .await
            .pop()
            .unwrap_or_else(|| Err(Error::Other("No result produced".into())))
    }

    /// Generate every spec, failing as a whole if any single entry fails.
    pub async fn generate(
        &self,
        source: VectorSource,
        specs: &[SizeSpec],
    ) -> Result<Vec<RasterResult>> {
        let outcomes = self.generate_each(source, specs).await;
        batch::collect(specs, outcomes)
    }

    /// Generate every spec and return each outcome, in spec order, so the
    /// caller can decide what to do with individual failures.
    pub async fn generate_each(
        &self,
        source: VectorSource,
        specs: &[SizeSpec],
    ) -> Vec<Result<RasterResult>> {
        let timeout = self.config.timeout();
        let check_type = self.config.check_content_type;

        // Loading may hit the filesystem or network, so keep it off the runtime.
        let loaded = tokio::task::spawn_blocking(move || {
            let dir = source.resources_dir();
            source.load_with(timeout, check_type).map(|svg| (svg, dir))
        })
        .await;

        let (svg, dir) = match loaded {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(err)) => return batch::replicate_failure(specs, err),
            Err(err) => {
                return batch::replicate_failure(
                    specs,
                    Error::Other(format!("Loader task failed: {}", err)),
                )
            }
        };

        let svg: Arc<[u8]> = svg.into();
        let rasterizer = Arc::new(self.rasterizer.clone().with_resources_dir(dir));
        info!(
            "rasterizing {} icon(s), at most {} at a time",
            specs.len(),
            self.config.jobs
        );

        let tasks = specs.iter().copied().map(|spec| {
            let svg = svg.clone();
            let rasterizer = rasterizer.clone();
            let permits = self.permits.clone();
            async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Other(format!("Worker pool closed: {}", e)))?;
                tokio::task::spawn_blocking(move || rasterizer.rasterize(&svg, spec))
                    .await
                    .map_err(|e| Error::Other(format!("Rasterization task failed: {}", e)))?
            }
        });

        futures::future::join_all(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ICON_SIZES;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><path d="M0 0h10v10z" fill="#222"/></svg>"##;

    #[test]
    fn zero_jobs_is_config_error() {
        let cfg = RasterConfig { jobs: 0, ..Default::default() };
        assert!(matches!(IconGenerator::new(cfg), Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn generate_returns_catalog_order() {
        let cfg = RasterConfig { jobs: 3, ..Default::default() };
        let generator = IconGenerator::new(cfg).unwrap();
        let source = VectorSource::from_bytes(SVG.as_bytes().to_vec());
        let results = generator.generate(source, &ICON_SIZES).await.unwrap();
        let dims: Vec<u32> = results.iter().map(|r| r.dimension()).collect();
        assert_eq!(dims, vec![192, 512, 192, 512, 16, 32, 48, 180, 152, 167]);
    }

    #[tokio::test]
    async fn single_rasterize_matches_sync_path() {
        let generator = IconGenerator::new(RasterConfig::default()).unwrap();
        let source = VectorSource::from_bytes(SVG.as_bytes().to_vec());
        let a = generator.rasterize(source.clone(), ICON_SIZES[4]).await.unwrap();
        let b = crate::rasterize(&source, ICON_SIZES[4], &RasterConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
