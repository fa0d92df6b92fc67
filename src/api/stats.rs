//! Pool statistics.

/// Counters maintained by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances created, by prewarm or fallback.
    pub instantiated: u64,

    /// Instances created during prewarm.
    pub prewarmed: u64,

    /// Instances created because a reserve was empty at `get`.
    pub fallback_instantiations: u64,

    /// Successful borrows.
    pub borrows: u64,

    /// Return requests that reached an active instance.
    pub returns_requested: u64,

    /// Returns started by lifetime expiry.
    pub auto_returns: u64,

    /// Instances pushed back onto a reserve.
    pub reclaimed: u64,

    /// Borrows that moved the instance to a different scope.
    pub reparents: u64,

    /// Queued deactivation signals dropped because the instance had been
    /// lent out again since they were raised.
    pub stale_signals: u64,
}

impl PoolStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of borrows served from a reserve instead of a new instance.
    pub fn reuse_ratio(&self) -> f64 {
        if self.borrows == 0 {
            return 0.0;
        }
        let reused = self.borrows.saturating_sub(self.fallback_instantiations);
        reused as f64 / self.borrows as f64
    }
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pool Statistics:")?;
        writeln!(f, "  Instantiated:    {}", self.instantiated)?;
        writeln!(f, "  Prewarmed:       {}", self.prewarmed)?;
        writeln!(f, "  Fallbacks:       {}", self.fallback_instantiations)?;
        writeln!(f, "  Borrows:         {}", self.borrows)?;
        writeln!(f, "  Returns:         {}", self.returns_requested)?;
        writeln!(f, "  Auto-returns:    {}", self.auto_returns)?;
        writeln!(f, "  Reclaimed:       {}", self.reclaimed)?;
        writeln!(f, "  Reparents:       {}", self.reparents)?;
        writeln!(f, "  Stale signals:   {}", self.stale_signals)?;
        writeln!(f, "  Reuse ratio:     {:.2}", self.reuse_ratio())?;
        Ok(())
    }
}

/// Snapshot of one reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveStats {
    /// Concrete type of the reserve.
    pub type_name: &'static str,
    /// Idle instances ready for reuse.
    pub idle: usize,
    /// Instances of this type the provider owns, idle or on loan.
    pub total: usize,
}

impl ReserveStats {
    /// Instances of this type currently on loan.
    pub fn on_loan(&self) -> usize {
        self.total.saturating_sub(self.idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse_ratio() {
        let mut stats = PoolStats::new();
        assert_eq!(stats.reuse_ratio(), 0.0);

        stats.borrows = 4;
        stats.fallback_instantiations = 1;
        assert!((stats.reuse_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_on_loan() {
        let stats = ReserveStats {
            type_name: "Spark",
            idle: 2,
            total: 5,
        };
        assert_eq!(stats.on_loan(), 3);
    }
}
