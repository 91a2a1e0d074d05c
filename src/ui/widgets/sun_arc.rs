//! Daylight arc with the sun's current position

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::sun::{arc_point, ArcPoint};

/// Vertical extent of the arc in canvas units (vertex to end points)
const ARC_TOP: f64 = 10.0;
const ARC_BOTTOM: f64 = 91.0;

const PATH_CHAR: char = '·';
const SUN_CHAR: char = '●';

/// Draws the sun's path across the area and marks the current position
pub struct SunArc {
    /// Daylight progress in [0, 1]
    fraction: f64,
    path_style: Style,
    sun_style: Style,
}

impl SunArc {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            path_style: Style::default().fg(Color::DarkGray),
            sun_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn path_style(mut self, style: Style) -> Self {
        self.path_style = style;
        self
    }

    /// Maps a canvas point onto a cell of `area`
    fn to_cell(point: ArcPoint, area: Rect) -> (u16, u16) {
        let last_column = f64::from(area.width.saturating_sub(1));
        let last_row = f64::from(area.height.saturating_sub(1));

        // The arc spans x = 10..190 on the canvas
        let column = ((point.x - 10.0) / 180.0 * last_column).round();
        let row = ((point.y - ARC_TOP) / (ARC_BOTTOM - ARC_TOP) * last_row).round();

        (
            area.x + column.clamp(0.0, last_column) as u16,
            area.y + row.clamp(0.0, last_row) as u16,
        )
    }
}

impl Widget for SunArc {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height == 0 {
            return;
        }

        let steps = area.width - 1;
        for step in 0..=steps {
            let point = arc_point(f64::from(step) / f64::from(steps));
            if let Some(cell) = buf.cell_mut(Self::to_cell(point, area)) {
                cell.set_char(PATH_CHAR).set_style(self.path_style);
            }
        }

        if let Some(cell) = buf.cell_mut(Self::to_cell(arc_point(self.fraction), area)) {
            cell.set_char(SUN_CHAR).set_style(self.sun_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun_cell(fraction: f64, area: Rect) -> (u16, u16) {
        let mut buf = Buffer::empty(area);
        SunArc::new(fraction).render(area, &mut buf);

        (area.top()..area.bottom())
            .flat_map(|y| (area.left()..area.right()).map(move |x| (x, y)))
            .find(|&(x, y)| buf.cell((x, y)).map_or(false, |cell| cell.symbol() == "●"))
            .expect("sun should be drawn")
    }

    #[test]
    fn test_sun_at_noon_is_top_center() {
        let area = Rect::new(0, 0, 21, 5);
        assert_eq!(sun_cell(0.5, area), (10, 0));
    }

    #[test]
    fn test_sun_at_sunrise_and_sunset_sits_on_the_horizon() {
        let area = Rect::new(2, 1, 21, 5);
        assert_eq!(sun_cell(0.0, area), (2, 5));
        assert_eq!(sun_cell(1.0, area), (22, 5));
    }

    #[test]
    fn test_tiny_area_is_skipped() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        SunArc::new(0.5).render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).map(|cell| cell.symbol()), Some(" "));
    }
}
