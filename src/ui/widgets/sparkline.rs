//! Temperature sparkline widget for the hourly strip

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline showing the temperature trend across forecast slots
///
/// Each value is stretched over an equal share of the area's width and scaled
/// between the lowest and highest value shown.
pub struct TrendSparkline<'a> {
    /// Temperature per slot
    values: &'a [f64],
    /// Style for the sparkline
    style: Style,
    /// Style for the warmest slot
    peak_style: Style,
}

impl<'a> TrendSparkline<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self {
            values,
            style: Style::default().fg(Color::Cyan),
            peak_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn peak_style(mut self, style: Style) -> Self {
        self.peak_style = style;
        self
    }

    /// Lowest and highest finite value
    fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((low, high)) => Some((low.min(v), high.max(v))),
            })
    }

    fn value_to_block(value: f64, low: f64, high: f64) -> char {
        let span = high - low;
        // A flat line sits in the middle
        let normalized = if span > 0.0 { (value - low) / span } else { 0.5 };
        let index = ((normalized.clamp(0.0, 1.0) * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TrendSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.values.is_empty() {
            return;
        }
        let Some((low, high)) = self.range() else {
            return;
        };

        let width = area.width as usize;
        let count = self.values.len();

        for column in 0..width {
            let index = (column * count / width).min(count - 1);
            let value = self.values[index];
            let style = if value >= high { self.peak_style } else { self.style };

            if let Some(cell) = buf.cell_mut((area.x + column as u16, area.y)) {
                cell.set_char(Self::value_to_block(value, low, high)).set_style(style);
            }
        }
    }
}
