use std::sync::Arc;

/// Things that are fast to clone in the context of an application such as
/// the indexer. A `CheapClone` should be cheap enough to clone on every
/// block or every handler invocation without thinking about it.
pub trait CheapClone: Clone {
    #[inline]
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Arc<T> {}
impl CheapClone for slog::Logger {}
