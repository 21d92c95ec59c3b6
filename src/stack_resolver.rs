use crate::catalog::{CatalogClient, CatalogError};
use crate::geometry::DEFAULT_PLANE_TOLERANCE;
use crate::ordering::{DEFAULT_COVERAGE_THRESHOLD, OrderedStack, order_stack};
use crate::record::InstanceRecord;

use futures::future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no renderable instances in series")]
    NoRenderableInstances,

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Tunable constants of the resolution pipeline. The defaults have not been
/// calibrated against real acquisitions.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub plane_tolerance: f64,
    pub coverage_threshold: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            plane_tolerance: DEFAULT_PLANE_TOLERANCE,
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
        }
    }
}

/// Output of one resolution pass: the ordered stack plus the typed records
/// it was built from, for diagnostics and plane inspection.
#[derive(Debug, Clone)]
pub struct ResolvedSeries {
    pub stack: OrderedStack,
    pub records: Vec<InstanceRecord>,
}

pub struct StackResolver;

impl StackResolver {
    /// Resolve a series into an ordered, navigable stack.
    ///
    /// Lists the series' instances, fetches their metadata concurrently,
    /// filters out instances without pixel data, classifies geometry and
    /// orders the rest.
    ///
    /// # Errors
    ///
    /// Returns an error when any catalog call fails or when no instance in
    /// the series is renderable.
    pub async fn resolve(
        catalog: &CatalogClient,
        study: &str,
        series: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedSeries, ResolveError> {
        let ids = catalog.list_instances(study, series).await?;
        log::debug!("series {series}: {} instances listed", ids.len());

        // No ordering dependency between instances: fetch all metadata
        // concurrently, fail the pass on the first catalog error.
        let documents = future::try_join_all(
            ids.iter()
                .map(|id| catalog.instance_metadata(study, series, id)),
        )
        .await?;

        let records = ids
            .into_iter()
            .zip(&documents)
            .map(|(id, document)| {
                InstanceRecord::from_document(id, document, options.plane_tolerance)
            })
            .collect();

        Self::build_stack(records, options)
    }

    /// Filter and order an already-ingested record set. Split from
    /// [`StackResolver::resolve`] so the pipeline is testable without a
    /// catalog.
    pub fn build_stack(
        records: Vec<InstanceRecord>,
        options: &ResolveOptions,
    ) -> Result<ResolvedSeries, ResolveError> {
        let renderable: Vec<_> = records
            .into_iter()
            .filter(InstanceRecord::is_renderable)
            .collect();

        if renderable.is_empty() {
            return Err(ResolveError::NoRenderableInstances);
        }

        let stack = order_stack(&renderable, options.coverage_threshold);
        log::debug!(
            "stack of {} instances ordered by {:?}",
            stack.len(),
            stack.strategy()
        );

        Ok(ResolvedSeries {
            stack,
            records: renderable,
        })
    }
}
