use crate::selection::Selection;

/// Number of suggestions offered by the ticker search.
pub const DEFAULT_SUGGESTIONS: usize = 3;

/// Case-insensitive prefix search over the backend's ticker list.
///
/// Already-selected tickers are never offered. Results keep the order of
/// `all`; an empty prefix offers the first `limit` unselected tickers.
pub fn matching_tickers(
    all: &[String],
    prefix: &str,
    selected: &Selection,
    limit: usize,
) -> Vec<String> {
    let prefix = prefix.trim().to_lowercase();
    all.iter()
        .filter(|ticker| !selected.contains(ticker))
        .filter(|ticker| prefix.is_empty() || ticker.to_lowercase().starts_with(&prefix))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<String> {
        ["AAPL", "AMZN", "AMD", "ABNB", "MSFT", "TSLA"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_bounded() {
        let matches = matching_tickers(&universe(), "a", &Selection::new(), DEFAULT_SUGGESTIONS);
        assert_eq!(matches, vec!["AAPL", "AMZN", "AMD"]);
    }

    #[test]
    fn selected_tickers_are_excluded() {
        let selected: Selection = ["AMZN"].into_iter().collect();
        let matches = matching_tickers(&universe(), "am", &selected, DEFAULT_SUGGESTIONS);
        assert_eq!(matches, vec!["AMD"]);
    }

    #[test]
    fn empty_prefix_offers_first_unselected() {
        let selected: Selection = ["AAPL"].into_iter().collect();
        let matches = matching_tickers(&universe(), "  ", &selected, 2);
        assert_eq!(matches, vec!["AMZN", "AMD"]);
    }

    #[test]
    fn removed_ticker_is_offered_again() {
        let mut selected = Selection::new();
        selected.add("AAPL");
        assert_eq!(
            matching_tickers(&universe(), "aa", &selected, DEFAULT_SUGGESTIONS),
            Vec::<String>::new()
        );

        selected.remove("AAPL");
        assert_eq!(
            matching_tickers(&universe(), "aa", &selected, DEFAULT_SUGGESTIONS),
            vec!["AAPL"]
        );
    }

    #[test]
    fn zero_limit_offers_nothing() {
        assert!(matching_tickers(&universe(), "", &Selection::new(), 0).is_empty());
    }
}
