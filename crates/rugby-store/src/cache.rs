use std::time::{Duration, Instant};

/// A single cached document that expires after a fixed time.
pub(crate) struct TtlCell<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T: Clone> TtlCell<T> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns a copy of the value if it is younger than the TTL.
    pub(crate) fn get(&mut self) -> Option<T> {
        if self
            .entry
            .as_ref()
            .is_some_and(|(at, _)| at.elapsed() > self.ttl)
        {
            self.entry = None;
        }
        self.entry.as_ref().map(|(_, v)| v.clone())
    }

    pub(crate) fn insert(&mut self, value: T) {
        self.entry = Some((Instant::now(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_value_is_returned() {
        let mut cell = TtlCell::new(Duration::from_secs(60));
        cell.insert(vec![1, 2]);
        assert_eq!(cell.get(), Some(vec![1, 2]));
    }

    #[test]
    fn expired_value_is_dropped() {
        let mut cell = TtlCell::new(Duration::ZERO);
        cell.insert(1);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn empty_cell_returns_none() {
        let mut cell: TtlCell<u8> = TtlCell::new(Duration::from_secs(1));
        assert_eq!(cell.get(), None);
    }
}
