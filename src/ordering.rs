use crate::record::InstanceRecord;

/// Fraction of candidates that must carry a strategy's field before the
/// strategy is chosen. Coverage must strictly exceed this value.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.6;

/// Ordering signals in priority order. The first strategy whose coverage
/// exceeds the threshold wins; [`OrderingStrategy::InstanceId`] covers every
/// record and so terminates the search, at degraded quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    InstanceNumber,
    ProjectedPosition,
    DepthPosition,
    InstanceId,
}

#[derive(PartialEq, PartialOrd)]
enum OrderKey {
    Scalar(f64),
    Id(String),
}

impl OrderingStrategy {
    pub const PRIORITY: [Self; 4] = [
        Self::InstanceNumber,
        Self::ProjectedPosition,
        Self::DepthPosition,
        Self::InstanceId,
    ];

    fn key(&self, record: &InstanceRecord) -> Option<OrderKey> {
        match self {
            Self::InstanceNumber => record.instance_number.map(|n| OrderKey::Scalar(n as f64)),
            Self::ProjectedPosition => record.projected_position.map(OrderKey::Scalar),
            Self::DepthPosition => record.position.map(|p| OrderKey::Scalar(p[2])),
            Self::InstanceId => Some(OrderKey::Id(record.id.clone())),
        }
    }

    /// Fraction of records carrying this strategy's ordering field.
    pub fn coverage(&self, records: &[InstanceRecord]) -> f64 {
        if records.is_empty() {
            return 0.0;
        }
        let covered = records.iter().filter(|r| self.key(r).is_some()).count();
        covered as f64 / records.len() as f64
    }
}

/// The resolved stack: instance identifiers in display order plus the
/// strategy that produced the order, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct OrderedStack {
    ids: Vec<String>,
    strategy: OrderingStrategy,
}

impl OrderedStack {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id_at(&self, index: usize) -> &str {
        &self.ids[index]
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn strategy(&self) -> OrderingStrategy {
        self.strategy
    }

    /// Flip the display order in place. The caller is responsible for
    /// remapping its navigation index (see `NavigationState::remap_reversed`).
    pub fn reverse(&mut self) {
        self.ids.reverse();
    }
}

/// Sort the candidate set into an [`OrderedStack`] using the highest-priority
/// strategy whose coverage exceeds `coverage_threshold`.
///
/// Total and deterministic for any non-empty candidate set; records missing
/// the chosen field sort ahead of keyed ones, keeping their relative input
/// order (stable sort).
pub fn order_stack(records: &[InstanceRecord], coverage_threshold: f64) -> OrderedStack {
    let strategy = OrderingStrategy::PRIORITY
        .into_iter()
        .find(|s| s.coverage(records) > coverage_threshold)
        .unwrap_or(OrderingStrategy::InstanceId);

    if strategy == OrderingStrategy::InstanceId {
        log::warn!(
            "no ordering signal covers more than {:.0}% of {} instances; \
             falling back to identifier order, spatial sequence not guaranteed",
            coverage_threshold * 100.0,
            records.len()
        );
    }

    let mut keyed: Vec<(Option<OrderKey>, &str)> = records
        .iter()
        .map(|record| (strategy.key(record), record.id.as_str()))
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    OrderedStack {
        ids: keyed.into_iter().map(|(_, id)| id.to_string()).collect(),
        strategy,
    }
}
