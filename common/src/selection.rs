/// Ordered, duplicate-free set of tickers picked by the user.
///
/// Insertion order is display order. Equality is by value, so a selection
/// rebuilt with the same tickers in the same order compares equal and does
/// not trigger a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    tickers: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `ticker` unless it is already selected. Returns whether it was added.
    pub fn add(&mut self, ticker: impl Into<String>) -> bool {
        let ticker = ticker.into();
        if self.contains(&ticker) {
            return false;
        }
        self.tickers.push(ticker);
        true
    }

    /// Remove `ticker` if present. Returns whether anything changed.
    pub fn remove(&mut self, ticker: &str) -> bool {
        let before = self.tickers.len();
        self.tickers.retain(|selected| selected != ticker);
        self.tickers.len() != before
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|selected| selected == ticker)
    }

    pub fn clear(&mut self) {
        self.tickers.clear();
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for ticker in iter {
            selection.add(ticker);
        }
        selection
    }
}
