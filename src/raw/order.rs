/// Occupancy limits for a tree of order `M` (at most `M` children per node).
pub(crate) struct Order<const M: usize>;

impl<const M: usize> Order<M> {
    /// Evaluated by every tree constructor so that `M < 3` fails to compile.
    pub(crate) const VALID: () = assert!(M >= 3, "B-tree order `M` must be at least 3");

    pub(crate) const MAX_KEYS: usize = M - 1;
    pub(crate) const MIN_KEYS: usize = M.div_ceil(2) - 1;
}
