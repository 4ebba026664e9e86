//! Ratatui rendering for the signal dashboard
//!
//! Stateless: every frame is drawn from `&App` and the clickable regions are
//! handed back so the event loop can route mouse clicks.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

use crate::shared::app::{App, HitTarget, InputMode, LoadState, Modal};
use crate::shared::chart::{ChartSnapshot, ChartTheme};
use crate::shared::detail::{SignalDetail, SourcePlatform};
use crate::shared::filter::SignalFilter;
use crate::shared::format::{CardView, Tone};

// Colors matching the trading terminals palette
const C_BUY: Color = Color::Rgb(100, 220, 100);
const C_SELL: Color = Color::Rgb(220, 100, 100);
const C_NEUTRAL: Color = Color::Rgb(170, 170, 170);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_HEADER: Color = Color::Rgb(180, 130, 220);
const C_WARN: Color = Color::Rgb(220, 180, 80);

pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 7;

/// Clickable regions and grid width produced by one draw
#[derive(Debug, Clone, Default)]
pub struct DrawnLayout {
    pub hit_regions: Vec<(Rect, HitTarget)>,
    pub columns: usize,
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => C_BUY,
        Tone::Negative => C_SELL,
        Tone::Neutral => C_NEUTRAL,
    }
}

fn platform_color(platform: SourcePlatform) -> Color {
    match platform {
        SourcePlatform::Reddit => Color::Rgb(255, 120, 60),
        SourcePlatform::TikTok => Color::Rgb(230, 90, 200),
        SourcePlatform::Twitter => C_ACCENT,
        SourcePlatform::News => C_WARN,
        SourcePlatform::Unknown => C_DIM,
    }
}

/// Draw the whole dashboard
pub fn render_dashboard(f: &mut Frame, app: &App) -> DrawnLayout {
    let mut layout = DrawnLayout::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_metrics(f, app, chunks[0]);
    render_controls(f, app, chunks[1], &mut layout);
    render_cards(f, app, chunks[2], &mut layout);
    render_footer(f, app, chunks[3]);

    if let Modal::Open(detail) = app.modal() {
        render_detail_modal(f, detail, &app.chart_container().snapshot(), &mut layout);
    }

    layout
}

fn render_metrics(f: &mut Frame, app: &App, area: Rect) {
    let metrics = app.metrics();
    let block = Block::default()
        .title(" SIGNAL DASHBOARD ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_HEADER));

    let status = match app.load_state() {
        LoadState::Loading => Span::styled("  loading...", Style::default().fg(C_DIM)),
        LoadState::Loaded => Span::styled(
            app.loaded_at()
                .map(|t| format!("  loaded {}", t.format("%H:%M:%S UTC")))
                .unwrap_or_default(),
            Style::default().fg(C_DIM),
        ),
    };

    let line = Line::from(vec![
        Span::styled("TOTAL ", Style::default().fg(C_DIM)),
        Span::styled(
            metrics.total.to_string(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   BLIND SPOTS ", Style::default().fg(C_DIM)),
        Span::styled(
            metrics.blind_spots.to_string(),
            Style::default().fg(C_WARN).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   SENTIMENT ", Style::default().fg(C_DIM)),
        Span::styled(
            metrics.mean_sentiment_label(),
            Style::default()
                .fg(tone_color(Tone::from_sentiment(metrics.mean_sentiment)))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   LAST SCAN ", Style::default().fg(C_DIM)),
        Span::styled(
            app.last_scan().unwrap_or("-").to_string(),
            Style::default().fg(C_BRIGHT),
        ),
        status,
    ]);

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_controls(f: &mut Frame, app: &App, area: Rect, layout: &mut DrawnLayout) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let searching = app.input_mode() == InputMode::Search;
    let search_block = Block::default()
        .title(" SEARCH (/) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if searching { C_ACCENT } else { C_DIM }));
    let mut search_line = vec![Span::styled(app.search().to_string(), Style::default().fg(C_BRIGHT))];
    if searching {
        search_line.push(Span::styled("█", Style::default().fg(C_ACCENT)));
    } else if app.search().is_empty() {
        search_line.push(Span::styled("ticker...", Style::default().fg(C_DIM)));
    }
    f.render_widget(Paragraph::new(Line::from(search_line)).block(search_block), columns[0]);
    layout.hit_regions.push((columns[0], HitTarget::SearchBar));

    let filter_block = Block::default()
        .title(" FILTER (1/2/3, Tab) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    let inner = filter_block.inner(columns[1]);
    f.render_widget(filter_block, columns[1]);

    let mut x = inner.x;
    for filter in SignalFilter::ALL {
        let label = format!(" {} ", filter.label());
        let width = (label.chars().count() as u16).min(inner.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        let button = Rect::new(x, inner.y, width, 1);
        let style = if app.filter() == filter {
            Style::default().fg(Color::Black).bg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_BRIGHT)
        };
        f.render_widget(Paragraph::new(Span::styled(label, style)), button);
        layout.hit_regions.push((button, HitTarget::Filter(filter)));
        x = x.saturating_add(width + 1);
    }
}

fn render_cards(f: &mut Frame, app: &App, area: Rect, layout: &mut DrawnLayout) {
    let visible = app.visible();
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    layout.columns = columns;

    if visible.is_empty() {
        let message = match app.load_state() {
            LoadState::Loading => "Loading signals...",
            LoadState::Loaded => "No signals match",
        };
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(C_DIM)))
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(C_DIM))),
            area,
        );
        return;
    }

    let card_width = area.width / columns as u16;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected = app.selected();
    let first_row = (selected / columns).saturating_sub(visible_rows - 1);

    for (offset, signal) in visible
        .iter()
        .enumerate()
        .skip(first_row * columns)
        .take(visible_rows * columns)
    {
        let slot = offset - first_row * columns;
        let row = (slot / columns) as u16;
        let col = (slot % columns) as u16;
        let card_area = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT)),
        );
        render_card(f, &CardView::from_signal(signal), card_area, offset == selected);
        layout.hit_regions.push((card_area, HitTarget::Card(offset)));
    }
}

fn render_card(f: &mut Frame, card: &CardView, area: Rect, selected: bool) {
    let border_color = if selected {
        C_ACCENT
    } else if card.blind_spot {
        C_WARN
    } else {
        C_DIM
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", card.ticker),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ))
        .title(
            Line::from(Span::styled(
                format!(" {} ", card.sentiment),
                Style::default().fg(tone_color(card.sentiment_tone)),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let label = |text: &'static str| Span::styled(text, Style::default().fg(C_DIM));
    let lines = vec![
        Line::from(Span::styled(
            card.price.clone(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            label("SIGNAL     "),
            Span::styled(card.strength.clone(), Style::default().fg(C_BRIGHT)),
            Span::styled(format!(" {}", card.velocity), Style::default().fg(C_DIM)),
        ]),
        Line::from(vec![
            label("SOURCES    "),
            Span::styled(card.source_count.to_string(), Style::default().fg(C_BRIGHT)),
        ]),
        Line::from(vec![
            label("HYPE RATIO "),
            Span::styled(card.hype.clone(), Style::default().fg(tone_color(card.hype_tone))),
        ]),
        Line::from(vec![
            label("SEARCH VOL "),
            Span::styled(card.search_volume.clone(), Style::default().fg(C_BRIGHT)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = match (app.modal(), app.input_mode()) {
        (Modal::Open(_), _) => "x close  q quit",
        (Modal::Closed, InputMode::Search) => "type to search  Enter/Esc done",
        (Modal::Closed, InputMode::Normal) => {
            "/ search  1/2/3 filter  arrows move  Enter open  q quit"
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(C_DIM))),
        area,
    );
}

/// Centered popup area, `percent_x` by `percent_y` of `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_detail_modal(
    f: &mut Frame,
    detail: &SignalDetail,
    chart: &ChartSnapshot,
    layout: &mut DrawnLayout,
) {
    let popup = centered_rect(80, 90, f.area());
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", detail.ticker),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    // Close control sits on the top border
    let close_label = "[x] close";
    let close_width = close_label.len() as u16;
    if popup.width > close_width + 4 {
        let close_area = Rect::new(popup.right() - close_width - 2, popup.y, close_width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(
                close_label,
                Style::default().fg(C_SELL).add_modifier(Modifier::BOLD),
            )),
            close_area,
        );
        layout.hit_regions.push((close_area, HitTarget::CloseModal));
    }

    let chart_height = chart.request.as_ref().map(|r| r.height).unwrap_or(10);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(chart_height),
        ])
        .split(inner);

    render_detail_summary(f, detail, sections[0]);
    render_sentiment_battle(f, detail, sections[1]);
    render_sources(f, detail, sections[2]);
    render_chart(f, chart, sections[3]);
}

fn render_detail_summary(f: &mut Frame, detail: &SignalDetail, area: Rect) {
    let mut spans = Vec::new();
    if !detail.price.is_empty() {
        spans.push(Span::styled("PRICE ", Style::default().fg(C_DIM)));
        spans.push(Span::styled(
            detail.price.clone(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("   "));
    }
    if let Some(shares) = &detail.est_position_shares {
        spans.push(Span::styled("EST SHARES ", Style::default().fg(C_DIM)));
        spans.push(Span::styled(shares.clone(), Style::default().fg(C_BRIGHT)));
        spans.push(Span::raw("   "));
    }
    if let Some(rating) = &detail.analyst_rating {
        spans.push(Span::styled("ANALYST ", Style::default().fg(C_DIM)));
        spans.push(Span::styled(rating.clone(), Style::default().fg(C_BRIGHT)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sentiment_battle(f: &mut Frame, detail: &SignalDetail, area: Rect) {
    let split = &detail.split;
    let width = area.width as usize;
    let (bull_cells, bear_cells) = split.bar_cells(width);

    let bull_text = format!("BULL {:.1}%  {}", split.bullish_pct, split.bullish_label());
    let bear_text = format!("{}  {:.1}% BEAR", split.bearish_label(), split.bearish_pct);
    let gap = width.saturating_sub(bull_text.chars().count() + bear_text.chars().count());

    let lines = vec![
        Line::from(Span::styled(
            "SENTIMENT BATTLE",
            Style::default().fg(C_HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("█".repeat(bull_cells), Style::default().fg(C_BUY)),
            Span::styled("█".repeat(bear_cells), Style::default().fg(C_SELL)),
        ]),
        Line::from(vec![
            Span::styled(bull_text, Style::default().fg(C_BUY)),
            Span::raw(" ".repeat(gap)),
            Span::styled(bear_text, Style::default().fg(C_SELL)),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_sources(f: &mut Frame, detail: &SignalDetail, area: Rect) {
    let items: Vec<ListItem> = detail
        .sources
        .iter()
        .map(|source| {
            let platform = Span::styled(
                format!("{:<8} ", source.platform.label()),
                Style::default()
                    .fg(platform_color(source.platform))
                    .add_modifier(Modifier::BOLD),
            );
            let text = if source.is_link() {
                Span::styled(
                    source.text.clone(),
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::UNDERLINED),
                )
            } else {
                Span::styled(source.text.clone(), Style::default().fg(C_BRIGHT))
            };
            ListItem::new(Line::from(vec![platform, text]))
        })
        .collect();

    let block = Block::default()
        .title(format!(" SOURCES ({}) ", detail.sources.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));
    f.render_widget(List::new(items).block(block), area);
}

fn render_chart(f: &mut Frame, chart: &ChartSnapshot, area: Rect) {
    let Some(request) = &chart.request else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(request.width_pct.min(100)), Constraint::Min(0)])
        .split(area);
    let area = columns[0];

    let (line_color, base_style) = match request.theme {
        ChartTheme::Dark => (C_ACCENT, Style::default().fg(C_DIM)),
        ChartTheme::Light => (Color::Blue, Style::default().fg(Color::Black).bg(Color::White)),
    };

    let block = Block::default()
        .title(format!(
            " {} · {} · {} ",
            request.symbol, request.interval, request.timezone
        ))
        .borders(Borders::ALL)
        .style(base_style);

    let Some(series) = &chart.series else {
        f.render_widget(block, area);
        return;
    };
    let Some((low, high)) = series.bounds() else {
        f.render_widget(block, area);
        return;
    };

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, close))| (i as f64, *close))
        .collect();
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let (low, high) = if high > low { (low, high) } else { (low - 1.0, high + 1.0) };

    let first_date = series
        .points
        .first()
        .map(|(t, _)| t.with_timezone(&request.timezone).format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let last_date = series
        .points
        .last()
        .map(|(t, _)| t.with_timezone(&request.timezone).format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line_color))
        .data(&points);

    let chart_widget = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![first_date, last_date]),
        )
        .y_axis(
            Axis::default()
                .bounds([low, high])
                .labels(vec![format!("{:.2}", low), format!("{:.2}", high)]),
        );

    f.render_widget(chart_widget, area);
}
