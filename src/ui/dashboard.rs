use chrono::{NaiveDateTime, Timelike};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::model::signal::SignalRow;
use crate::params::DashboardParams;
use crate::view::{RecentSignalRow, SummaryRow};

use super::ParamField;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().copied().map(Cell::from)).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
}

/// Dates for daily and coarser grids, full timestamps for intraday ones.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.hour() == 0 && ts.minute() == 0 && ts.second() == 0 {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "NaN".to_string())
}

pub struct ParamsBar<'a> {
    params: &'a DashboardParams,
    focus: ParamField,
}

impl<'a> ParamsBar<'a> {
    pub fn new(params: &'a DashboardParams, focus: ParamField) -> Self {
        Self { params, focus }
    }
}

impl Widget for ParamsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fields = [
            (ParamField::Symbol, "Symbol", self.params.symbol.to_string()),
            (ParamField::StartDate, "Start Date", self.params.start_date.to_string()),
            (ParamField::EndDate, "End Date", self.params.end_date.to_string()),
            (
                ParamField::Frequency,
                "Resampling",
                self.params.frequency.label().to_string(),
            ),
        ];

        let mut spans = Vec::with_capacity(fields.len() * 3);
        for (i, (field, label, value)) in fields.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("{}: ", label),
                Style::default().fg(Color::DarkGray),
            ));
            let style = if field == self.focus {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", value), style));
        }

        Paragraph::new(Line::from(spans))
            .block(panel("Parameters"))
            .render(area, buf);
    }
}

pub struct SummaryPanel<'a> {
    rows: &'a [SummaryRow],
    buy_count: usize,
    sell_count: usize,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(rows: &'a [SummaryRow], buy_count: usize, sell_count: usize) -> Self {
        Self {
            rows,
            buy_count,
            sell_count,
        }
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel("Summary");
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let table_height = inner.height.saturating_sub(2);
        let rows = self.rows.iter().map(|r| {
            Row::new(vec![
                Cell::from(format_timestamp(r.timestamp)),
                Cell::from(fmt_opt(r.close, 2)),
                Cell::from(format!("{:.2}", r.ma_short)),
                Cell::from(format!("{:.2}", r.ma_long)),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
            ],
        )
        .header(header(&["Date", "Close", "MA20", "MA50"]))
        .render(
            Rect {
                height: table_height,
                ..inner
            },
            buf,
        );

        let totals = [
            Line::from(vec![
                Span::styled("Total Buy signals: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.buy_count.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Total Sell signals: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.sell_count.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        for (i, line) in totals.iter().enumerate() {
            let y = inner.y + table_height + i as u16;
            if y < inner.y + inner.height {
                buf.set_line(inner.x, y, line, inner.width);
            }
        }
    }
}

pub struct RecentSignalsPanel<'a> {
    rows: &'a [RecentSignalRow],
}

impl<'a> RecentSignalsPanel<'a> {
    pub fn new(rows: &'a [RecentSignalRow]) -> Self {
        Self { rows }
    }
}

impl Widget for RecentSignalsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows.iter().map(|r| {
            let flag = |v: u8, color: Color| {
                let style = if v == 1 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Cell::from(v.to_string()).style(style)
            };
            Row::new(vec![
                Cell::from(format_timestamp(r.timestamp)),
                Cell::from(format!("{:.2}", r.ma_short)),
                Cell::from(format!("{:.2}", r.ma_long)),
                flag(r.buy, Color::White),
                flag(r.sell, Color::Red),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(4),
                Constraint::Length(4),
            ],
        )
        .header(header(&["Date", "MA20", "MA50", "Buy", "Sell"]))
        .block(panel("Recent Signals"))
        .render(area, buf);
    }
}

/// "Raw Data (first-last of total)", 1-based; "0-0" when no row is shown.
fn raw_data_title(start: usize, visible: usize, total: usize) -> String {
    let end = (start + visible).min(total);
    let (first, last) = if end > start { (start + 1, end) } else { (0, 0) };
    format!("Raw Data ({}-{} of {})", first, last, total)
}

pub struct RawDataPanel<'a> {
    rows: &'a [SignalRow],
    scroll: usize,
}

impl<'a> RawDataPanel<'a> {
    pub fn new(rows: &'a [SignalRow], scroll: usize) -> Self {
        Self { rows, scroll }
    }
}

impl Widget for RawDataPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(3) as usize;
        let start = self.scroll.min(self.rows.len().saturating_sub(visible));
        let title = raw_data_title(start, visible, self.rows.len());

        let rows = self.rows.iter().skip(start).take(visible).map(|r| {
            Row::new(vec![
                Cell::from(format_timestamp(r.timestamp())),
                Cell::from(fmt_opt(r.bar.open, 2)),
                Cell::from(fmt_opt(r.bar.high, 2)),
                Cell::from(fmt_opt(r.bar.low, 2)),
                Cell::from(fmt_opt(r.bar.close, 2)),
                Cell::from(fmt_opt(r.bar.volume, 0)),
                Cell::from(format!("{:.2}", r.ma_short)),
                Cell::from(format!("{:.2}", r.ma_long)),
                Cell::from(r.signal.value().to_string()),
                Cell::from(u8::from(r.buy).to_string()),
                Cell::from(u8::from(r.sell).to_string()),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(6),
                Constraint::Length(4),
                Constraint::Length(4),
            ],
        )
        .header(header(&[
            "Date", "Open", "High", "Low", "Close", "Volume", "MA20", "MA50", "Signal", "Buy",
            "Sell",
        ]))
        .block(panel(&title))
        .render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub title: &'a str,
    pub params: &'a DashboardParams,
    pub loading: bool,
    pub rows: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = if self.loading {
            Span::styled(" LOADING ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(" READY ", Style::default().fg(Color::Green))
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.params.symbol.as_str(), Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.params.frequency.code(), Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            state,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("rows: {}", self.rows),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Last error, else the run notice.
pub struct MessageLine<'a> {
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
}

impl Widget for MessageLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match (self.error, self.notice) {
            (Some(err), _) => Line::from(vec![
                Span::styled(" ERROR ", Style::default().fg(Color::Black).bg(Color::Red)),
                Span::styled(format!(" {}", err), Style::default().fg(Color::Red)),
            ]),
            (None, Some(notice)) => Line::from(Span::styled(
                format!(" {}", notice),
                Style::default().fg(Color::Yellow),
            )),
            (None, None) => Line::default(),
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
            Span::styled(" field  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Up/Down]", Style::default().fg(Color::Yellow)),
            Span::styled(" change  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[PgUp/PgDn]", Style::default().fg(Color::Yellow)),
            Span::styled(" month  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[J/K]", Style::default().fg(Color::Yellow)),
            Span::styled(" scroll raw  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("erun", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
