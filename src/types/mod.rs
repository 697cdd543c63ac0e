pub mod bar;
pub mod signal;

pub use bar::{Bar, BarSeries};
pub use signal::{
    ChartData, ChartPoint, ConfluenceReport, DetectorDetail, DetectorOutcome, Signal,
    SwingPointInfo, TradeSetup, Trend, TrendAnalysis,
};
