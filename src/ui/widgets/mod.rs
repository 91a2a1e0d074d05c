//! Custom widgets for the dashboard

pub mod sparkline;
pub mod sun_arc;

pub use sparkline::TrendSparkline;
pub use sun_arc::SunArc;
