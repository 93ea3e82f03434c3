use leptos::*;
use stock_dashboard_common::{PriceSeries, SyncState, Synchronizer};

use crate::format::{latest_label, price_label, time_label};

use super::dashboard::SelectionSignal;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 320.0;
const PALETTE: [&str; 6] = [
    "#38bdf8", "#f97316", "#a3e635", "#f472b6", "#facc15", "#c084fc",
];

/// Live chart of every selected ticker on a shared price axis.
#[component]
pub fn PriceChart() -> impl IntoView {
    let selection = use_context::<SelectionSignal>().expect("selection context missing");
    let sync = create_rw_signal(Synchronizer::new());

    #[cfg(target_arch = "wasm32")]
    crate::live::start(selection.0, sync);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = selection;

    let chart_state = create_memo(move |_| sync.with(ChartState::from_sync));

    view! {
        <section class="price-chart">
            <h2>"Price History"</h2>
            {move || match chart_state.get() {
                ChartState::NoSelection => view! {
                    <p class="price-chart__placeholder">"Select stocks..."</p>
                }
                .into_view(),
                ChartState::Loading => view! {
                    <p class="price-chart__placeholder">"Loading..."</p>
                }
                .into_view(),
                ChartState::Error(message) => view! {
                    <p class="price-chart__placeholder price-chart__placeholder--error">"Error: "{message}</p>
                }
                .into_view(),
                ChartState::Collecting => view! {
                    <p class="price-chart__placeholder">"Collecting more samples..."</p>
                }
                .into_view(),
                ChartState::Ready(geometry) => chart_view(geometry).into_view(),
            }}
        </section>
    }
}

fn chart_view(geometry: ChartGeometry) -> impl IntoView {
    view! {
        <div class="price-chart__content">
            <svg
                width=CHART_WIDTH
                height=CHART_HEIGHT
                viewBox=format!("0 0 {} {}", CHART_WIDTH, CHART_HEIGHT)
                class="price-chart__svg"
            >
                {geometry
                    .lines
                    .iter()
                    .map(|line| view! {
                        <polyline
                            class="price-chart__line"
                            fill="none"
                            stroke=line.color
                            points=line.points.clone()
                        />
                    })
                    .collect_view()}
            </svg>
            <footer class="price-chart__footer">
                <span>{format!("{} to {}", geometry.start, geometry.end)}</span>
                <span>{format!("High: {}", price_label(geometry.max_price))}</span>
                <span>{format!("Low: {}", price_label(geometry.min_price))}</span>
            </footer>
            <ul class="price-chart__legend">
                {geometry
                    .lines
                    .into_iter()
                    .map(|line| view! {
                        <li>
                            <span
                                class="price-chart__swatch"
                                style=format!("background:{}", line.color)
                            ></span>
                            {line.latest}
                        </li>
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ChartState {
    NoSelection,
    Loading,
    Error(String),
    Collecting,
    Ready(ChartGeometry),
}

impl ChartState {
    fn from_sync(sync: &Synchronizer) -> Self {
        match sync.state() {
            SyncState::Idle => ChartState::NoSelection,
            SyncState::Loading => ChartState::Loading,
            SyncState::Failed(message) => ChartState::Error(message.clone()),
            SyncState::Live => compute_chart_geometry(
                sync.series(),
                sync.selection().tickers(),
                CHART_WIDTH,
                CHART_HEIGHT,
            )
            .map(ChartState::Ready)
            .unwrap_or(ChartState::Collecting),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub ticker: String,
    pub color: &'static str,
    pub points: String,
    /// Legend text for the most recent price.
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub lines: Vec<ChartLine>,
    pub min_price: f64,
    pub max_price: f64,
    pub start: String,
    pub end: String,
}

/// Project `series` onto a `width` x `height` viewport, one polyline per
/// ticker in selection order. Needs at least two rows.
pub fn compute_chart_geometry(
    series: &PriceSeries,
    tickers: &[String],
    width: f64,
    height: f64,
) -> Option<ChartGeometry> {
    if series.len() < 2 || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let prices = || {
        series
            .points()
            .iter()
            .flat_map(|point| tickers.iter().filter_map(|ticker| point.price(ticker)))
    };
    let min_price = prices().fold(f64::INFINITY, f64::min);
    let max_price = prices().fold(f64::NEG_INFINITY, f64::max);
    if !min_price.is_finite() || !max_price.is_finite() {
        return None;
    }

    let start = series.points().first()?.timestamp;
    let end = series.latest()?.timestamp;
    let ts_span = ((end - start).num_milliseconds() as f64).max(1.0);
    // A flat series sits on the middle line.
    let (floor, price_span) = if (max_price - min_price).abs() < f64::EPSILON {
        (min_price - 0.5, 1.0)
    } else {
        (min_price, max_price - min_price)
    };

    let lines = tickers
        .iter()
        .enumerate()
        .filter_map(|(index, ticker)| {
            let column = series.column(ticker);
            let &(last_ts, last_price) = column.last()?;
            let points = column
                .iter()
                .map(|(timestamp, price)| {
                    let x = ((*timestamp - start).num_milliseconds() as f64 / ts_span) * width;
                    let y = height - ((price - floor) / price_span) * height;
                    format!("{:.2},{:.2}", x, y)
                })
                .collect::<Vec<_>>()
                .join(" ");
            Some(ChartLine {
                ticker: ticker.clone(),
                color: PALETTE[index % PALETTE.len()],
                points,
                latest: latest_label(ticker, last_price, last_ts),
            })
        })
        .collect();

    Some(ChartGeometry {
        lines,
        min_price,
        max_price,
        start: time_label(start),
        end: time_label(end),
    })
}
