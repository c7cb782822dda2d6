//! One-row sparkline of an hourly series

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different values (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Drawn for hours without a value
const GAP: char = ' ';

/// A sparkline with one cell per hour and an optional cursor marker
pub struct HourlySparkline<'a> {
    values: &'a [Option<f64>],
    /// Value drawn as the lowest block
    min: f64,
    /// Value drawn as the full block
    max: f64,
    cursor: Option<usize>,
    style: Style,
    cursor_style: Style,
}

impl<'a> HourlySparkline<'a> {
    pub fn new(values: &'a [Option<f64>], min: f64, max: f64) -> Self {
        Self {
            values,
            min,
            max,
            cursor: None,
            style: Style::default().fg(Color::Cyan),
            cursor_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn cursor(mut self, hour: usize) -> Self {
        self.cursor = Some(hour);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_to_block(&self, value: Option<f64>) -> char {
        let Some(value) = value else {
            return GAP;
        };
        let span = self.max - self.min;
        if !value.is_finite() || span <= 0.0 {
            return BLOCKS[0];
        }
        let normalized = ((value - self.min) / span).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl Widget for HourlySparkline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (i, value) in self.values.iter().take(area.width as usize).enumerate() {
            let style = if self.cursor == Some(i) {
                self.cursor_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((area.x + i as u16, area.y)) {
                cell.set_char(self.value_to_block(*value)).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_block_bounds() {
        let sparkline = HourlySparkline::new(&[], 0.0, 100.0);
        assert_eq!(sparkline.value_to_block(Some(0.0)), '▁');
        assert_eq!(sparkline.value_to_block(Some(100.0)), '█');
        assert_eq!(sparkline.value_to_block(Some(250.0)), '█');
        assert_eq!(sparkline.value_to_block(Some(-5.0)), '▁');
    }

    #[test]
    fn test_missing_value_is_a_gap() {
        let sparkline = HourlySparkline::new(&[], 0.0, 100.0);
        assert_eq!(sparkline.value_to_block(None), ' ');
    }

    #[test]
    fn test_flat_range_draws_lowest_block() {
        let sparkline = HourlySparkline::new(&[], 5.0, 5.0);
        assert_eq!(sparkline.value_to_block(Some(5.0)), '▁');
    }

    #[test]
    fn test_render_marks_cursor() {
        let values = [Some(0.0), Some(50.0), None, Some(100.0)];
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);

        HourlySparkline::new(&values, 0.0, 100.0)
            .cursor(1)
            .render(area, &mut buf);

        let symbols: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert_eq!(symbols, "▁▅ █");
        assert_eq!(buf[(1, 0)].fg, Color::Yellow);
        assert_eq!(buf[(0, 0)].fg, Color::Cyan);
    }
}
