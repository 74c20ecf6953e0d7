use std::sync::atomic::{AtomicU32, Ordering};

/// Runtime-mutable ceiling on crawl depth
///
/// Read once per crawl task; only ever raised. Increases are plain atomic
/// additions, so concurrent raises commute and a reader never sees a torn value.
#[derive(Debug)]
pub struct DepthBound {
    bound: AtomicU32,
}

impl DepthBound {
    pub fn new(initial: u32) -> Self {
        Self {
            bound: AtomicU32::new(initial),
        }
    }

    /// Returns the current bound
    pub fn current(&self) -> u32 {
        self.bound.load(Ordering::Acquire)
    }

    /// Raises the bound by `delta`, saturating at `u32::MAX`
    ///
    /// Returns the new bound.
    pub fn increase(&self, delta: u32) -> u32 {
        let previous = self
            .bound
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bound| {
                Some(bound.saturating_add(delta))
            })
            .unwrap_or_else(|bound| bound);
        previous.saturating_add(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_initial_bound() {
        let bound = DepthBound::new(3);
        assert_eq!(bound.current(), 3);
    }

    #[test]
    fn test_increase_adds_delta() {
        let bound = DepthBound::new(3);
        assert_eq!(bound.increase(2), 5);
        assert_eq!(bound.increase(2), 7);
        assert_eq!(bound.current(), 7);
    }

    #[test]
    fn test_zero_increase_keeps_bound() {
        let bound = DepthBound::new(0);
        assert_eq!(bound.increase(0), 0);
        assert_eq!(bound.current(), 0);
    }

    #[test]
    fn test_increase_saturates() {
        let bound = DepthBound::new(u32::MAX - 1);
        assert_eq!(bound.increase(5), u32::MAX);
        assert_eq!(bound.current(), u32::MAX);
    }

    #[test]
    fn test_concurrent_increases_commute() {
        let bound = Arc::new(DepthBound::new(1));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let bound = bound.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        bound.increase(1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(bound.current(), 1 + 16 * 100);
    }
}
