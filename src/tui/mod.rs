//! Ratatui-based terminal dashboard.
//!
//! The dashboard shows the KPI cards, a Trend / Changes / Alerts tab strip and a
//! threshold panel. Every threshold change re-runs the full metric pipeline on
//! the already-loaded series; `r` reloads the series itself.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs},
};
use tracing::{info, warn};

use crate::app::pipeline::{self, RunOutput};
use crate::cli::DashboardArgs;
use crate::domain::{DerivedRow, LoadConfig, Session};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::i18n::{Labels, labels};
use crate::report::{fmt_level, fmt_opt, fmt_pct};

mod plotters_chart;

use plotters_chart::{ChartSeries, Mark, SeriesChart, padded_bounds};

/// Rows shown on the Changes tab.
const CHANGES_WINDOW: usize = 24;

const FOOD_COLOR: RGBColor = RGBColor(255, 165, 0);
const GENERAL_COLOR: RGBColor = RGBColor(0, 255, 255);
const ALERT_COLOR: RGBColor = RGBColor(255, 0, 0);
const MOM_COLOR: RGBColor = RGBColor(0, 255, 0);
const THRESHOLD_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Start the dashboard.
pub fn run(args: DashboardArgs) -> Result<(), AppError> {
    let session = args.session.session()?;
    let load = args.source.load_config();

    // Load before taking over the terminal so fatal errors print normally.
    let output = pipeline::run(&load, &session.thresholds)?;
    let mut app = App::new(session, load, output);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Trend,
    Changes,
    Alerts,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Trend, Tab::Changes, Tab::Alerts];

    fn index(self) -> usize {
        match self {
            Tab::Trend => 0,
            Tab::Changes => 1,
            Tab::Alerts => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn title(self, l: &Labels) -> &'static str {
        match self {
            Tab::Trend => l.tab_trend,
            Tab::Changes => l.tab_changes,
            Tab::Alerts => l.tab_alerts,
        }
    }
}

/// Which threshold the arrow keys adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Yoy,
    Mom,
}

struct App {
    session: Session,
    load: LoadConfig,
    run: RunOutput,
    tab: Tab,
    field: Field,
    status: String,
}

impl App {
    fn new(session: Session, load: LoadConfig, run: RunOutput) -> Self {
        let status = format!("{} rows loaded", run.table.len());
        Self {
            session,
            load,
            run,
            tab: Tab::Trend,
            field: Field::Yoy,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Trend,
            KeyCode::Char('2') => self.tab = Tab::Changes,
            KeyCode::Char('3') => self.tab = Tab::Alerts,
            KeyCode::Up => self.field = Field::Yoy,
            KeyCode::Down => self.field = Field::Mom,
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('l') => {
                self.session.language = self.session.language.toggle();
                self.status = format!("{}: {}", self.labels().language, self.session.language.code());
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn labels(&self) -> &'static Labels {
        labels(self.session.language)
    }

    fn adjust(&mut self, steps: i32) {
        let t = self.session.thresholds;
        let next = match self.field {
            Field::Yoy => t.step_yoy(steps),
            Field::Mom => t.step_mom(steps),
        };
        if next == t {
            return;
        }
        self.session.thresholds = next;
        self.recompute();
    }

    fn recompute(&mut self) {
        match pipeline::compute(self.run.series.clone(), &self.session.thresholds) {
            Ok(run) => {
                self.status = format!(
                    "YoY > {:.1} | MoM > {:.1} | alerts={}",
                    self.session.thresholds.yoy,
                    self.session.thresholds.mom,
                    run.table.alerts().count()
                );
                self.run = run;
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Reload the series from its source. A failure keeps the current table.
    fn reload(&mut self) {
        match pipeline::run(&self.load, &self.session.thresholds) {
            Ok(run) => {
                info!(origin = %run.series.origin, rows = run.table.len(), "reloaded CPI series");
                self.status = format!("Reloaded {} rows ({})", run.table.len(), run.series.origin);
                self.run = run;
            }
            Err(e) => {
                warn!("reload failed: {e}");
                self.status = format!("Reload failed: {e}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
        self.draw_tabs(frame, chunks[2]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(chunks[3]);
        match self.tab {
            Tab::Trend => self.draw_trend(frame, body[0]),
            Tab::Changes => self.draw_changes(frame, body[0]),
            Tab::Alerts => self.draw_alerts(frame, body[0]),
        }
        self.draw_settings(frame, body[1]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let lines = vec![
            Line::from(Span::styled(
                l.title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{} | {}: {} | {}: {}",
                    l.subtitle, l.source, self.run.series.origin, l.latest_as_of, self.run.latest.date
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let latest = &self.run.latest;
        let cards = [
            (l.kpi_food_latest, fmt_level(latest.food_cpi)),
            (l.kpi_food_yoy, fmt_pct(latest.food_cpi_yoy_pct)),
            (l.kpi_food_mom, fmt_pct(latest.food_cpi_mom_pct)),
        ];
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        for ((caption, value), rect) in cards.into_iter().zip(cols.iter()) {
            let p = Paragraph::new(Span::styled(value, Style::default().add_modifier(Modifier::BOLD)))
                .block(Block::default().title(caption).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let titles: Vec<String> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title(l)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let rows = &self.run.table.rows;

        let food = points(rows, |r| r.food_cpi);
        let general = points(rows, |r| r.general_cpi);
        let alerts: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.alert)
            .filter_map(|r| r.food_cpi.map(|v| (month_ordinal(r.date), v)))
            .collect();

        let series = [
            ChartSeries {
                points: &general,
                color: GENERAL_COLOR,
                mark: Mark::Line,
            },
            ChartSeries {
                points: &food,
                color: FOOD_COLOR,
                mark: Mark::Line,
            },
            ChartSeries {
                points: &alerts,
                color: ALERT_COLOR,
                mark: Mark::Dots,
            },
        ];
        let y_bounds = padded_bounds(food.iter().chain(&general).map(|p| p.1), 0.05);
        self.draw_chart(frame, area, l.trend_title, &series, x_bounds(rows), y_bounds, "index");
    }

    fn draw_changes(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let rows = &self.run.table.rows;
        let window = &rows[rows.len().saturating_sub(CHANGES_WINDOW)..];

        let yoy = points(window, |r| r.food_cpi_yoy_pct);
        let mom = points(window, |r| r.food_cpi_mom_pct);
        let xb = x_bounds(window);
        let t = self.session.thresholds;
        let yoy_line = [(xb[0], t.yoy), (xb[1], t.yoy)];
        let mom_line = [(xb[0], t.mom), (xb[1], t.mom)];

        let series = [
            ChartSeries {
                points: &yoy_line,
                color: THRESHOLD_COLOR,
                mark: Mark::Line,
            },
            ChartSeries {
                points: &mom_line,
                color: THRESHOLD_COLOR,
                mark: Mark::Line,
            },
            ChartSeries {
                points: &yoy,
                color: FOOD_COLOR,
                mark: Mark::Line,
            },
            ChartSeries {
                points: &mom,
                color: MOM_COLOR,
                mark: Mark::Line,
            },
        ];
        let y_bounds = padded_bounds(
            yoy.iter().chain(&mom).map(|p| p.1).chain([t.yoy, t.mom, 0.0]),
            0.05,
        );
        self.draw_chart(frame, area, l.changes_title, &series, xb, y_bounds, "%");
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_chart(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        series: &[ChartSeries<'_>],
        x_bounds: [f64; 2],
        y_bounds: [f64; 2],
        y_label: &str,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let widget = SeriesChart {
            series,
            x_bounds,
            y_bounds,
            x_label: "month",
            y_label,
            fmt_x: fmt_month,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_alerts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let block = Block::default().title(l.alerts_intro).borders(Borders::ALL);

        let alerts: Vec<&DerivedRow> = self.run.table.alerts().collect();
        if alerts.is_empty() {
            let p = Paragraph::new(l.no_alerts)
                .style(Style::default().fg(Color::Green))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let header = Row::new([l.col_date, l.col_food_cpi, l.col_food_yoy, l.col_food_mom, l.col_heat])
            .style(Style::default().add_modifier(Modifier::BOLD));
        // Most recent first.
        let body = alerts.iter().rev().map(|r| {
            Row::new([
                Cell::from(r.date.to_string()),
                Cell::from(fmt_opt(r.food_cpi, 2)),
                Cell::from(fmt_opt(r.food_cpi_yoy_pct, 2)),
                Cell::from(fmt_opt(r.food_cpi_mom_pct, 2)),
                Cell::from(fmt_opt(r.heat, 2)),
            ])
        });
        let widths = [
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(8),
        ];
        let table = Table::new(body, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let t = self.session.thresholds;
        let items = vec![
            ListItem::new(format!("{}: {:.1}", l.yoy_threshold, t.yoy)),
            ListItem::new(format!("{}: {:.1}", l.mom_threshold, t.mom)),
            ListItem::new(""),
            ListItem::new(format!("{}: {}", l.language, self.session.language.code())),
            ListItem::new(Text::from(l.alert_rule)).style(Style::default().fg(Color::Gray)),
        ];

        let list = List::new(items)
            .block(Block::default().title(l.data_controls).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(match self.field {
            Field::Yoy => 0,
            Field::Mom => 1,
        }));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let l = self.labels();
        let lines = vec![
            Line::from(vec![
                Span::styled(l.footer_help, Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(l.footer_note, Style::default().fg(Color::DarkGray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Months since year 0, so consecutive months are one unit apart on the x axis.
fn month_ordinal(date: NaiveDate) -> f64 {
    f64::from(date.year() * 12 + date.month0() as i32)
}

fn fmt_month(v: f64) -> String {
    let ordinal = v.round() as i32;
    format!("{:04}-{:02}", ordinal.div_euclid(12), ordinal.rem_euclid(12) + 1)
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.1}")
}

fn points(rows: &[DerivedRow], value: impl Fn(&DerivedRow) -> Option<f64>) -> Vec<(f64, f64)> {
    rows.iter()
        .filter_map(|r| value(r).map(|v| (month_ordinal(r.date), v)))
        .collect()
}

fn x_bounds(rows: &[DerivedRow]) -> [f64; 2] {
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if last.date > first.date => [month_ordinal(first.date), month_ordinal(last.date)],
        (Some(only), _) => {
            let x = month_ordinal(only.date);
            [x - 1.0, x + 1.0]
        }
        _ => [0.0, 1.0],
    }
}
