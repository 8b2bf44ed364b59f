/// A value together with the name of the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: &'static str,
}

/// Ordered data-source strategies; the first one returning a value wins.
///
/// Strategies run lazily and in insertion order, so later (cheaper or
/// synthetic) sources are only consulted when every earlier one is absent.
pub struct Fallback<'a, T> {
    strategies: Vec<(&'static str, Box<dyn FnOnce() -> Option<T> + 'a>)>,
}

impl<'a, T> Fallback<'a, T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn then(mut self, source: &'static str, strategy: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.strategies.push((source, Box::new(strategy)));
        self
    }

    pub fn resolve(self) -> Option<Resolved<T>> {
        for (source, strategy) in self.strategies {
            if let Some(value) = strategy() {
                return Some(Resolved { value, source });
            }
            log::debug!("Source '{}' had nothing, trying next", source);
        }
        None
    }
}

impl<T> Default for Fallback<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}
