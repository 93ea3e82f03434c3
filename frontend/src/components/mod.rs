pub mod dashboard;
pub mod parameter_editor;
pub mod price_chart;
pub mod stock_grid;
pub mod ticker_search;
