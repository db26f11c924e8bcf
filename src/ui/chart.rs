use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};

use crate::view::ChartData;

/// Approximate columns taken by one "%Y-%m" label plus spacing.
const MONTH_LABEL_WIDTH: usize = 9;

/// Close, both averages and the crossover markers on one time axis.
pub struct SignalChart<'a> {
    chart: &'a ChartData,
    title: &'a str,
}

impl<'a> SignalChart<'a> {
    pub fn new(chart: &'a ChartData, title: &'a str) -> Self {
        Self { chart, title }
    }
}

/// Spread at most `max_labels` ticks evenly over `ticks`, keeping both ends.
pub fn thin_month_labels(ticks: &[String], max_labels: usize) -> Vec<String> {
    if ticks.len() <= max_labels.max(2) {
        return ticks.to_vec();
    }
    let max_labels = max_labels.max(2);
    let last = ticks.len() - 1;
    (0..max_labels)
        .map(|k| {
            let idx = (k * last + (max_labels - 1) / 2) / (max_labels - 1);
            ticks[idx].clone()
        })
        .collect()
}

impl Widget for SignalChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.chart.is_empty() {
            Paragraph::new("No data for the selected range")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        }

        let datasets = vec![
            Dataset::default()
                .name("Close Price")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&self.chart.close),
            Dataset::default()
                .name("MA20")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Green))
                .data(&self.chart.ma_short),
            Dataset::default()
                .name("MA50")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&self.chart.ma_long),
            Dataset::default()
                .name("Buy Signal")
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                .data(&self.chart.buys),
            Dataset::default()
                .name("Sell Signal")
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .data(&self.chart.sells),
        ];

        let max_labels = (area.width as usize / MONTH_LABEL_WIDTH).max(2);
        let x_labels: Vec<Span> = thin_month_labels(&self.chart.month_ticks, max_labels)
            .into_iter()
            .map(|label| Span::styled(label, Style::default().fg(Color::DarkGray)))
            .collect();

        let [y_lo, y_hi] = self.chart.y_bounds;
        let y_labels = vec![
            Span::styled(format!("{:.2}", y_lo), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.2}", (y_lo + y_hi) / 2.0),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{:.2}", y_hi), Style::default().fg(Color::DarkGray)),
        ];

        Chart::new(datasets)
            .block(block)
            .legend_position(Some(LegendPosition::TopLeft))
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(self.chart.x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(self.chart.y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("m{}", i)).collect()
    }

    #[test]
    fn thinning_keeps_short_lists() {
        assert_eq!(thin_month_labels(&ticks(3), 5), ticks(3));
    }

    #[test]
    fn thinning_keeps_both_ends() {
        let out = thin_month_labels(&ticks(37), 5);
        assert_eq!(out.len(), 5);
        assert_eq!(out.first().map(String::as_str), Some("m0"));
        assert_eq!(out.last().map(String::as_str), Some("m36"));
        assert_eq!(out[2], "m18");
    }
}
