use indexmap::IndexMap;

use crate::error::{ClientError, Result};
use crate::model::StockParameters;

/// Parameters displayed in the grid, keyed by ticker in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBook {
    rows: IndexMap<String, StockParameters>,
}

impl ParameterBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one ticker's row, keeping its position if present.
    pub fn insert(&mut self, stock: StockParameters) {
        self.rows.insert(stock.ticker.clone(), stock);
    }

    pub fn remove(&mut self, ticker: &str) -> Option<StockParameters> {
        self.rows.shift_remove(ticker)
    }

    /// Replace every row with a fresh fetch result, in the order returned.
    pub fn replace_all<I>(&mut self, stocks: I)
    where
        I: IntoIterator<Item = StockParameters>,
    {
        self.rows.clear();
        for stock in stocks {
            self.insert(stock);
        }
    }

    pub fn get(&self, ticker: &str) -> Option<&StockParameters> {
        self.rows.get(ticker)
    }

    pub fn tickers(&self) -> Vec<String> {
        self.rows.keys().cloned().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &StockParameters> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accept the result of a single-ticker fetch only if it has exactly one record.
pub fn expect_single(stocks: Vec<StockParameters>) -> Result<StockParameters> {
    let received = stocks.len();
    let [stock] = <[StockParameters; 1]>::try_from(stocks).map_err(|_| {
        ClientError::PartialResult {
            requested: 1,
            received,
        }
    })?;
    Ok(stock)
}

/// A validated drift/volatility pair typed into the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterEdit {
    pub drift: f64,
    pub volatility: f64,
}

impl ParameterEdit {
    pub fn parse(drift: &str, volatility: &str) -> Result<Self> {
        let drift = parse_field("drift", drift)?;
        let volatility = parse_field("volatility", volatility)?;
        if volatility < 0.0 {
            return Err(ClientError::InvalidInput(format!(
                "volatility must not be negative, got {volatility}"
            )));
        }
        Ok(Self { drift, volatility })
    }
}

fn parse_field(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidInput(format!("{name} {raw:?} is not a number")))?;
    if !value.is_finite() {
        return Err(ClientError::InvalidInput(format!("{name} must be finite")));
    }
    Ok(value)
}
