//! Synchronous fan-out / fan-in over scoped threads
//!
//! Work is split round-robin across at most `jobs` threads. Every outcome is
//! written back to the slot of the spec it came from, so results come back in
//! request order whatever order the threads finish in.

use log::{error, info, warn};

use crate::catalog::SizeSpec;
use crate::rendering::{RasterResult, Rasterizer};
use crate::source::VectorSource;
use crate::{Error, RasterConfig, Result};

/// Rasterizes `svg` once per spec and returns every outcome in spec order.
pub fn rasterize_each(
    rasterizer: &Rasterizer,
    svg: &[u8],
    specs: &[SizeSpec],
    jobs: usize,
) -> Vec<Result<RasterResult>> {
    let workers = jobs.max(1).min(specs.len().max(1));
    let mut slots: Vec<Option<Result<RasterResult>>> = specs.iter().map(|_| None).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    specs
                        .iter()
                        .enumerate()
                        .skip(worker)
                        .step_by(workers)
                        .map(|(i, spec)| (i, rasterizer.rasterize(svg, *spec)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            // A panicked worker leaves its slots empty.
            if let Ok(done) = handle.join() {
                for (i, outcome) in done {
                    slots[i] = Some(outcome);
                }
            }
        }
    });

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(Error::Other("Rasterization worker panicked".into())))
        })
        .collect()
}

/// Loads `source` and rasterizes it for every spec.
///
/// When the source cannot be loaded, every entry reports the `LoadError`.
pub fn rasterize_source_each(
    source: &VectorSource,
    specs: &[SizeSpec],
    config: &RasterConfig,
) -> Vec<Result<RasterResult>> {
    let svg = match source.load_with(config.timeout(), config.check_content_type) {
        Ok(svg) => svg,
        Err(err) => return replicate_failure(specs, err),
    };
    let rasterizer = Rasterizer::new(config).with_resources_dir(source.resources_dir());
    info!("rasterizing {} icon(s) on up to {} thread(s)", specs.len(), config.jobs);
    rasterize_each(&rasterizer, &svg, specs, config.jobs)
}

/// Gives every spec its own copy of a failure that happened before fan-out.
/// The variant is kept, so a loader panic is not reported as a `LoadError`.
pub(crate) fn replicate_failure(specs: &[SizeSpec], err: Error) -> Vec<Result<RasterResult>> {
    specs.iter().map(|_| Err(err.duplicate())).collect()
}

/// Aggregates per-spec outcomes: all results when every entry succeeded,
/// otherwise a single `BatchFailed` holding every failure and no results.
pub fn collect(
    specs: &[SizeSpec],
    outcomes: Vec<Result<RasterResult>>,
) -> Result<Vec<RasterResult>> {
    let total = outcomes.len();
    let mut results = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (spec, outcome) in specs.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                warn!("{} failed: {}", spec, err);
                failures.push((*spec, err));
            }
        }
    }

    if failures.is_empty() {
        info!("generated {} icon(s)", results.len());
        Ok(results)
    } else {
        error!("{} of {} icon(s) failed; discarding batch", failures.len(), total);
        Err(Error::BatchFailed { total, failures })
    }
}

/// Keeps the successful outcomes, logging and dropping failures.
pub fn successes(specs: &[SizeSpec], outcomes: Vec<Result<RasterResult>>) -> Vec<RasterResult> {
    specs
        .iter()
        .zip(outcomes)
        .filter_map(|(spec, outcome)| match outcome {
            Ok(result) => Some(result),
            Err(err) => {
                warn!("skipping {}: {}", spec, err);
                None
            }
        })
        .collect()
}
