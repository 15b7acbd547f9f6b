use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType, List,
        ListItem, ListState, Paragraph,
    },
    Frame, Terminal,
};
use sales_dashboard::report::{quarter_shares, DashboardReport};
use sales_dashboard::view::{format_lakhs, format_lakhs_compact, DashboardState, Trend};
use sales_dashboard::Quarter;
use std::io;
use std::time::{Duration, Instant};

/// How often the loop wakes up to check the loading timer
const TICK_RATE: Duration = Duration::from_millis(50);

pub struct App {
    pub state: DashboardState,
    list_state: ListState,
}

impl App {
    pub fn new(state: DashboardState) -> Self {
        let list_state = ListState::default().with_selected(Some(state.selected_index()));
        Self { state, list_state }
    }

    /// Handle one key press. Returns true when the user asked to quit.
    pub fn on_key(&mut self, code: KeyCode, now: Instant) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select_next(now)?;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.select_previous(now)?;
            }
            KeyCode::Home => {
                self.state.select_first(now)?;
            }
            KeyCode::End => {
                self.state.select_last(now)?;
            }
            _ => {}
        }
        Ok(false)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        draw(terminal, app)?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key.code, Instant::now())? {
                    return Ok(());
                }
            }
        }

        app.state.tick(Instant::now());
    }
}

/// Derive this frame's numbers and render them
pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let report = DashboardReport::build(&app.state).context("Failed to derive dashboard data")?;
    app.list_state.select(Some(app.state.selected_index()));

    let state = &app.state;
    let list_state = &mut app.list_state;
    terminal.draw(|f| ui(f, state, list_state, &report))?;
    Ok(())
}

fn ui(f: &mut Frame, state: &DashboardState, list_state: &mut ListState, report: &DashboardReport) {
    let show_banner = state.is_forecast() && !state.is_loading();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                     // Header
            Constraint::Length(if show_banner { 3 } else { 0 }),      // Prediction banner
            Constraint::Min(0),                                        // Content area
            Constraint::Length(3),                                     // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], state);
    if show_banner {
        render_prediction_banner(f, chunks[1], state);
    }

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(chunks[2]);

    render_year_selector(f, content[0], state, list_state);

    if state.is_loading() {
        render_loading(f, content[1], state);
    } else {
        render_dashboard(f, content[1], report);
    }

    render_status_bar(f, chunks[3], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = vec![
        Span::styled(
            " 📊 Sales Prediction Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            state.selected().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ];

    if state.is_forecast() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("🔮 Predicted", Style::default().fg(Color::Magenta)));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_prediction_banner(f: &mut Frame, area: Rect, state: &DashboardState) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" Prediction Mode ", Style::default().fg(Color::Black).bg(Color::Magenta)),
        Span::raw(format!(
            "  Displaying predicted sales data for {} based on historical trends and growth patterns.",
            state.selected()
        )),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Magenta)));

    f.render_widget(banner, area);
}

fn render_year_selector(f: &mut Frame, area: Rect, state: &DashboardState, list_state: &mut ListState) {
    let timeline = state.engine().timeline();

    let items: Vec<ListItem> = timeline
        .years()
        .iter()
        .map(|year| {
            if timeline.is_forecast(*year) {
                ListItem::new(Line::from(vec![
                    Span::raw(year.to_string()),
                    Span::styled(" 🔮 Predicted", Style::default().fg(Color::Magenta)),
                ]))
            } else {
                ListItem::new(Line::from(year.to_string()))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Fiscal Year "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, list_state);
}

fn render_loading(f: &mut Frame, area: Rect, state: &DashboardState) {
    let content = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("⏳ Loading sales data for {}...", state.selected()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let placeholder = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));

    f.render_widget(placeholder, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, report: &DashboardReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Metric cards
            Constraint::Percentage(50), // Quarterly + monthly
            Constraint::Min(8),         // Year-on-year
        ])
        .split(area);

    render_cards(f, rows[0], report);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_quarterly(f, charts[0], report);
    render_monthly(f, charts[1], report);
    render_year_on_year(f, rows[2], report);
}

fn render_cards(f: &mut Frame, area: Rect, report: &DashboardReport) {
    let summary = &report.summary;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let status_color = if summary.is_forecast { Color::Magenta } else { Color::Green };
    let (trend_icon, trend_color) = match summary.trend {
        Trend::Growing => ("📈", Color::Green),
        Trend::Declining => ("📉", Color::Red),
        Trend::NoBaseline => ("·", Color::DarkGray),
    };

    let card = |title: &'static str, value: String, badge: String, color: Color| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(badge, Style::default().fg(color))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
    };

    f.render_widget(
        card(
            " Total Annual Sales ",
            format_lakhs(summary.annual_total),
            summary.status().to_string(),
            status_color,
        ),
        cards[0],
    );
    f.render_widget(
        card(
            " Average Quarterly Sales ",
            format_lakhs(summary.average_quarterly),
            "Per Quarter".to_string(),
            Color::Cyan,
        ),
        cards[1],
    );
    f.render_widget(
        card(
            " Growth Rate (YoY) ",
            format!("{}%", summary.growth),
            format!("{} {}", trend_icon, summary.trend.label()),
            trend_color,
        ),
        cards[2],
    );
}

fn quarter_color(quarter: Quarter) -> Color {
    match quarter {
        Quarter::Q1 => Color::Cyan,
        Quarter::Q2 => Color::Green,
        Quarter::Q3 => Color::Yellow,
        Quarter::Q4 => Color::Magenta,
    }
}

fn chart_title(prefix: &str, report: &DashboardReport) -> String {
    if report.summary.is_forecast {
        format!(" {} - {} [Predicted] ", prefix, report.summary.fiscal_year)
    } else {
        format!(" {} - {} ", prefix, report.summary.fiscal_year)
    }
}

fn render_quarterly(f: &mut Frame, area: Rect, report: &DashboardReport) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(chart_title("Quarterly Sales", report));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(inner);

    let shares = quarter_shares(&report.quarterly);
    for ((quarter, share), slot) in report.quarterly.iter().zip(shares).zip(slots.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(quarter_color(quarter.quarter)).bg(Color::Black))
            .ratio(share.clamp(0.0, 1.0))
            .label(format!(
                "{}: {} ({:.1}%)",
                quarter.quarter,
                format_lakhs_compact(quarter.sales),
                share * 100.0
            ));
        f.render_widget(gauge, *slot);
    }
}

fn render_monthly(f: &mut Frame, area: Rect, report: &DashboardReport) {
    let bars: Vec<Bar> = report
        .monthly
        .iter()
        .map(|m| {
            Bar::default()
                .value((m.sales * 100.0).round().max(0.0) as u64)
                .text_value(format!("{:.1}", m.sales))
                .label(Line::from(m.month.name()))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(chart_title("Monthly Sales", report)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));

    f.render_widget(chart, area);
}

fn render_year_on_year(f: &mut Frame, area: Rect, report: &DashboardReport) {
    let series = &report.timeline;

    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yearly_total))
        .collect();

    // forecast line starts at the last historical point so the two connect
    let split = series.iter().position(|p| p.is_forecast).unwrap_or(series.len());
    let historical = &points[..split];
    let forecast = &points[split.saturating_sub(1)..];

    let (min, max) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| {
        (lo.min(*y), hi.max(*y))
    });
    let (y_min, y_max) = if points.is_empty() {
        (0.0, 1.0)
    } else {
        ((min * 0.95).floor(), (max * 1.05).ceil())
    };

    let datasets = vec![
        Dataset::default()
            .name("Actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(historical),
        Dataset::default()
            .name("Predicted")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(forecast),
    ];

    let x_labels: Vec<Span> = match (series.first(), series.get(split.saturating_sub(1)), series.last()) {
        (Some(first), Some(pivot), Some(last)) => vec![
            Span::raw(first.year.clone()),
            Span::raw(pivot.year.clone()),
            Span::raw(last.year.clone()),
        ],
        _ => vec![],
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(
                    " Year-on-Year Sales Comparison ({} Years View) ",
                    series.len()
                )),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, points.len().saturating_sub(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &DashboardState) {
    let timeline = state.engine().timeline();

    let status_spans = vec![
        Span::styled(
            format!(" Year: {}/{} ", state.selected_index() + 1, timeline.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Select year | "),
        Span::styled("Home/End", Style::default().fg(Color::Yellow)),
        Span::raw(" First/Last | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

// ============================================================================
// TESTS
// ============================================================================
