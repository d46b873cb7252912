//! Ratatui-based terminal dashboard.
//!
//! The TUI exposes the same filters as the original dashboard — a multi-year
//! selection, a single month, and the UI language — and renders the four
//! chart views plus the paginated raw-data table. All data comes from the
//! aggregation engine; this module only shapes it into widgets.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
    Terminal,
};

use crate::domain::{DashConfig, Lang, Month};
use crate::engine::Engine;
use crate::error::AppError;
use crate::labels::{labels, Labels};

mod plotters_chart;

use plotters_chart::{palette_tui_color, ChartSeries, DashChart};

/// Start the TUI.
pub fn run(config: DashConfig) -> Result<(), AppError> {
    // Validate before touching the terminal so fatal load errors print as
    // plain messages rather than flashing through an alternate screen.
    let engine = crate::app::pipeline::load_engine(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, engine);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Filter panel fields, top to bottom.
const FIELD_YEARS: usize = 0;
const FIELD_MONTH: usize = 1;
const FIELD_LANG: usize = 2;

struct App {
    config: DashConfig,
    engine: Engine,
    lang: Lang,
    /// All years present in the dataset, ascending.
    years: Vec<i32>,
    /// Selection flags parallel to `years`.
    selected: Vec<bool>,
    year_cursor: usize,
    /// Months present in the dataset, canonical order.
    months: Vec<Month>,
    month_idx: usize,
    focus: usize,
    page: usize,
    status: String,
}

impl App {
    fn new(config: DashConfig, engine: Engine) -> Self {
        let years = engine.dataset().years();
        let months = engine.dataset().months();

        // Initial widget state mirrors the original dashboard: first year
        // selected, first month selected.
        let mut selected = vec![false; years.len()];
        if let Some(first) = selected.first_mut() {
            *first = true;
        }

        let lang = config.lang;
        Self {
            config,
            engine,
            lang,
            years,
            selected,
            year_cursor: 0,
            months,
            month_idx: 0,
            focus: FIELD_YEARS,
            page: 0,
            status: "Ready.".to_string(),
        }
    }

    fn selected_years(&self) -> Vec<i32> {
        self.years
            .iter()
            .zip(&self.selected)
            .filter(|(_, sel)| **sel)
            .map(|(year, _)| *year)
            .collect()
    }

    fn month_name(&self) -> String {
        self.months
            .get(self.month_idx)
            .map(|m| m.name().to_string())
            .unwrap_or_default()
    }

    fn labels(&self) -> &'static Labels {
        labels(self.lang)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.focus > 0 {
                    self.focus -= 1;
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus = (self.focus + 1) % 3;
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.focus == FIELD_YEARS {
                    self.toggle_year();
                }
            }
            KeyCode::Char('n') | KeyCode::PageDown => self.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => self.prev_page(),
            KeyCode::Char('e') => self.export_all(),
            KeyCode::Char('d') => self.write_debug(),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.focus {
            FIELD_YEARS => {
                if self.years.is_empty() {
                    return;
                }
                if delta >= 0 {
                    self.year_cursor = (self.year_cursor + 1) % self.years.len();
                } else if self.year_cursor == 0 {
                    self.year_cursor = self.years.len() - 1;
                } else {
                    self.year_cursor -= 1;
                }
            }
            FIELD_MONTH => {
                if self.months.is_empty() {
                    return;
                }
                if delta >= 0 {
                    self.month_idx = (self.month_idx + 1) % self.months.len();
                } else if self.month_idx == 0 {
                    self.month_idx = self.months.len() - 1;
                } else {
                    self.month_idx -= 1;
                }
                self.page = 0;
                self.status = format!("{} {}", self.labels().select_month, self.month_name());
            }
            FIELD_LANG => {
                self.lang = match self.lang {
                    Lang::Ar => Lang::En,
                    Lang::En => Lang::Ar,
                };
                self.status = format!("{} {:?}", self.labels().language_label, self.lang);
            }
            _ => {}
        }
    }

    fn toggle_year(&mut self) {
        if let Some(flag) = self.selected.get_mut(self.year_cursor) {
            *flag = !*flag;
            self.page = 0;
            let years = self.selected_years();
            self.status = format!("{} {years:?}", self.labels().select_year);
        }
    }

    fn sample_rows(&self) -> Vec<crate::domain::SalesRecord> {
        self.engine
            .profit_volume_sample(&self.selected_years(), &self.month_name())
    }

    fn page_count(&self, rows: usize) -> usize {
        let size = self.config.page_size.max(1);
        rows.div_ceil(size).max(1)
    }

    fn next_page(&mut self) {
        let pages = self.page_count(self.sample_rows().len());
        if self.page + 1 < pages {
            self.page += 1;
        }
    }

    fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    fn export_all(&mut self) {
        let dir = self
            .config
            .export
            .clone()
            .unwrap_or_else(|| PathBuf::from("exports"));
        match self.run_export(&dir) {
            Ok(()) => self.status = format!("Exported 4 CSVs to {}", dir.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn run_export(&self, dir: &std::path::Path) -> Result<(), AppError> {
        use crate::io::export::{
            ensure_export_dir, export_path, write_breakdown_csv, write_sample_csv,
            write_share_csv, write_trend_csv, ChartKind,
        };

        ensure_export_dir(dir)?;
        let years = self.selected_years();
        let month = self.month_name();

        write_trend_csv(&export_path(dir, ChartKind::Trend), &self.engine.monthly_trend(&years))?;
        write_breakdown_csv(
            &export_path(dir, ChartKind::Breakdown),
            &self.engine.regional_breakdown(&month),
        )?;
        write_share_csv(
            &export_path(dir, ChartKind::Share),
            &self.engine.region_share(&years, &month),
        )?;
        write_sample_csv(
            &export_path(dir, ChartKind::Scatter),
            &self.engine.profit_volume_sample(&years, &month),
        )?;
        Ok(())
    }

    fn write_debug(&mut self) {
        match crate::debug::write_debug_bundle(
            &self.engine,
            &self.selected_years(),
            &self.month_name(),
        ) {
            Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
            Err(err) => self.status = format!("Debug write failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let table_height = (self.config.page_size.max(1) as u16).saturating_add(4);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(12),
                Constraint::Length(table_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_charts(frame, chunks[1]);
        self.draw_table(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sdash", Style::default().fg(Color::Cyan)),
            Span::raw(" — "),
            Span::styled(labels.title, Style::default().add_modifier(Modifier::BOLD)),
        ]));

        // Year list with selection marks and a cursor, month, language.
        let mut spans: Vec<Span> = Vec::new();
        spans.push(Span::styled(
            format!("{} ", labels.select_year),
            Style::default().fg(Color::Gray),
        ));
        for (idx, year) in self.years.iter().enumerate() {
            let mark = if self.selected[idx] { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if self.focus == FIELD_YEARS && idx == self.year_cursor {
                style = style.fg(Color::Black).bg(Color::White);
            }
            spans.push(Span::styled(format!("{mark}{year} "), style));
        }
        spans.push(Span::styled(
            format!("| {} {} ", labels.select_month, self.month_name()),
            Style::default().fg(Color::Gray),
        ));
        spans.push(Span::styled(
            format!("| {} {:?}", labels.language_label, self.lang),
            Style::default().fg(Color::Gray),
        ));
        lines.push(Line::from(spans));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        self.draw_trend_chart(frame, top[0]);
        self.draw_breakdown_chart(frame, top[1]);
        self.draw_share_chart(frame, bottom[0]);
        self.draw_scatter_chart(frame, bottom[1]);
    }

    fn draw_trend_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let block = Block::default()
            .title(labels.line_chart_title)
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let years = self.selected_years();
        let trend = self.engine.monthly_trend(&years);
        if trend.is_empty() {
            self.draw_empty_hint(frame, inner);
            return;
        }

        let mut lines: Vec<ChartSeries> = Vec::new();
        for year in &years {
            let data: Vec<(f64, f64)> = trend
                .iter()
                .filter(|row| row.year == *year)
                .map(|row| (row.month.index() as f64, row.revenue))
                .collect();
            if data.is_empty() {
                continue;
            }
            let color_idx = self.years.iter().position(|y| y == year).unwrap_or(0);
            lines.push(ChartSeries {
                name: year.to_string(),
                color_idx,
                data,
            });
        }

        let y_bounds = pad_bounds(trend.iter().map(|row| row.revenue));
        let widget = DashChart {
            lines: &lines,
            points: &[],
            x_bounds: [0.5, 6.5],
            y_bounds,
            x_label: labels.month_label,
            y_label: labels.revenue_label,
            fmt_x: fmt_month_tick,
            fmt_y: fmt_value_tick,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_breakdown_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let month = self.month_name();
        let block = Block::default()
            .title(labels.bar_chart_title(&month))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let breakdown = self.engine.regional_breakdown(&month);
        if breakdown.is_empty() {
            self.draw_empty_hint(frame, inner);
            return;
        }

        let regions = self.engine.dataset().regions();
        let mut chart = BarChart::default()
            .bar_width(7)
            .bar_gap(1)
            .group_gap(2);

        let mut years: Vec<i32> = breakdown.iter().map(|row| row.year).collect();
        years.dedup(); // already year-ascending from the engine

        for year in years {
            let bars: Vec<Bar> = breakdown
                .iter()
                .filter(|row| row.year == year)
                .map(|row| {
                    let color_idx = regions
                        .iter()
                        .position(|r| r == &row.region)
                        .unwrap_or(0);
                    Bar::default()
                        .value(row.revenue.round() as u64)
                        .label(Line::from(truncate_label(&row.region, 7)))
                        .style(Style::default().fg(palette_tui_color(color_idx)))
                })
                .collect();
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(year.to_string()))
                    .bars(&bars),
            );
        }

        frame.render_widget(chart, inner);
    }

    fn draw_share_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let month = self.month_name();
        let block = Block::default()
            .title(labels.pie_chart_title(&month))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let share = self.engine.region_share(&self.selected_years(), &month);
        if share.is_empty() {
            self.draw_empty_hint(frame, inner);
            return;
        }

        let total: f64 = share.iter().map(|row| row.revenue).sum();
        let regions = self.engine.dataset().regions();
        let bar_width = inner.width.saturating_sub(30).clamp(8, 24) as usize;

        let items: Vec<ListItem> = share
            .iter()
            .map(|row| {
                let pct = if total > 0.0 { row.revenue / total * 100.0 } else { 0.0 };
                let filled = ((pct / 100.0) * bar_width as f64).round() as usize;
                let color_idx = regions.iter().position(|r| r == &row.region).unwrap_or(0);
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<12} ", truncate_label(&row.region, 12))),
                    Span::styled(
                        "█".repeat(filled.min(bar_width)),
                        Style::default().fg(palette_tui_color(color_idx)),
                    ),
                    Span::raw(format!(" {pct:>5.1}%  {:.2}", row.revenue)),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items), inner);
    }

    fn draw_scatter_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let month = self.month_name();
        let block = Block::default()
            .title(labels.scatter_chart_title(&month))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let sample = self.sample_rows();
        if sample.is_empty() {
            self.draw_empty_hint(frame, inner);
            return;
        }

        let regions = self.engine.dataset().regions();
        let mut points: Vec<ChartSeries> = Vec::new();
        for (color_idx, region) in regions.iter().enumerate() {
            let data: Vec<(f64, f64)> = sample
                .iter()
                .filter(|row| &row.region == region)
                .map(|row| (row.units_sold, row.profit))
                .collect();
            if data.is_empty() {
                continue;
            }
            points.push(ChartSeries {
                name: region.clone(),
                color_idx,
                data,
            });
        }

        let x_bounds = pad_bounds(sample.iter().map(|row| row.units_sold));
        let y_bounds = pad_bounds(sample.iter().map(|row| row.profit));
        let widget = DashChart {
            lines: &[],
            points: &points,
            x_bounds,
            y_bounds,
            x_label: labels.units_sold_label,
            y_label: labels.profit_label,
            fmt_x: fmt_value_tick,
            fmt_y: fmt_value_tick,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.labels();
        let rows = self.sample_rows();
        let pages = self.page_count(rows.len());
        let page = self.page.min(pages - 1);
        let size = self.config.page_size.max(1);

        let title = format!("{} ({}/{pages})", labels.data_table_title, page + 1);
        let header = Row::new(vec![
            labels.month_label,
            labels.year_label,
            labels.region_label,
            labels.revenue_label,
            labels.units_sold_label,
            labels.profit_label,
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let body: Vec<Row> = rows
            .iter()
            .skip(page * size)
            .take(size)
            .map(|r| {
                Row::new(vec![
                    r.month.name().to_string(),
                    r.year.to_string(),
                    r.region.clone(),
                    format!("{:.2}", r.revenue),
                    format!("{:.1}", r.units_sold),
                    format!("{:.2}", r.profit),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
        ];
        let table = Table::new(body, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ field  ←/→ adjust  Space toggle year  n/p page  e export  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_empty_hint(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        // Fail-soft selections render an explicit empty state, never an error.
        let msg = Paragraph::new("(no rows match the selection)")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, area);
    }
}

/// Min/max of an iterator with 5% padding, with degenerate-range fallbacks.
fn pad_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - 1.0, hi + 1.0];
    }
    let pad = (hi - lo).abs() * 0.05;
    [lo - pad, hi + pad]
}

fn fmt_month_tick(v: f64) -> String {
    let idx = v.round() as usize;
    Month::ALL
        .get(idx.wrapping_sub(1))
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_default()
}

fn fmt_value_tick(v: f64) -> String {
    format!("{v:.0}")
}

fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_bounds_handles_degenerate_ranges() {
        assert_eq!(pad_bounds(std::iter::empty()), [0.0, 1.0]);
        assert_eq!(pad_bounds([5.0].into_iter()), [4.0, 6.0]);
        let [lo, hi] = pad_bounds([0.0, 100.0].into_iter());
        assert!(lo < 0.0 && hi > 100.0);
    }

    #[test]
    fn month_ticks_use_short_names() {
        assert_eq!(fmt_month_tick(1.0), "Jan");
        assert_eq!(fmt_month_tick(6.2), "Jun");
        assert_eq!(fmt_month_tick(9.0), "");
    }
}
