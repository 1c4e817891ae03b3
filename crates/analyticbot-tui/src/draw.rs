// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{
    AppState, ChatRole, DataPreview, Direction as TextDirection, Localizer, Message, Route,
    SessionRole, Trend, nav_items,
};
use analyticbot_client::{resolve_asset_url, rewrite_markdown_images};
use analyticbot_render::{
    BundleView, CartesianChart, CartesianMark, ChartView, KpiCard, MISSING_PLACEHOLDER,
    PRIMARY_ACCENT, PieChart, ScatterChart, Section, SortableTable, TableView, display_value,
    hex_rgb,
};
use analyticbot_session::{AdminWorkspace, SessionManager, UploadStatus};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Axis as ChartAxis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset,
    GraphType, Paragraph, Row, Table, Tabs, Wrap,
};

use crate::{TableFocus, ViewData};

const BAR_SCALE: f64 = 1000.0;
const USER_PREFIX: &str = "›";
const ASSISTANT_PREFIX: &str = "•";

pub(crate) fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    session: &SessionManager,
    admin: &AdminWorkspace,
    view_data: &ViewData,
) {
    let i18n = *session.localizer();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let routes = nav_items(state.role);
    let selected = routes
        .iter()
        .position(|route| *route == state.route)
        .unwrap_or(0);
    let titles = routes
        .iter()
        .map(|route| i18n.translate(route.label_key()).to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(header_title(state, &i18n))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.route {
        Route::Chat => render_chat(frame, layout[1], session, view_data),
        Route::Admin => render_admin(frame, layout[1], admin, &i18n, view_data),
    }

    let status = Paragraph::new(status_text(state, &i18n))
        .style(Style::default().fg(Color::Yellow))
        .alignment(alignment(&i18n))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.confirm_new_chat {
        let area = centered_rect(60, 25, frame.area());
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!(
            "{}\n\n{}",
            i18n.translate("confirm_new_chat"),
            i18n.translate("confirm_hint")
        ))
        .alignment(alignment(&i18n))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(i18n.translate("new_chat"))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(prompt, area);
    }

    if let Some(input) = &view_data.upload_prompt {
        let area = centered_rect(60, 20, frame.area());
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!(
            "{}\n> {input}\n\n{}",
            i18n.translate("upload_path_prompt"),
            i18n.translate("supported_files")
        ))
        .block(
            Block::default()
                .title(i18n.translate("upload_data"))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(prompt, area);
    }
}

pub(crate) fn header_title(state: &AppState, i18n: &Localizer) -> String {
    let role_label = match state.role {
        SessionRole::Admin => i18n.translate("admin_user"),
        SessionRole::User => i18n.translate("standard_user"),
    };
    format!(
        "{} | {}: {} | {}: {}",
        i18n.translate("app_name"),
        i18n.translate("role"),
        role_label,
        i18n.translate("language"),
        i18n.language().as_str()
    )
}

pub(crate) fn status_text(state: &AppState, i18n: &Localizer) -> String {
    match &state.status_line {
        Some(status) => status.clone(),
        None => format!(
            "{} | ctrl+n {} | ctrl+r {} | ctrl+l {} | tab",
            i18n.translate("quit_hint"),
            i18n.translate("new_chat"),
            i18n.translate("switch_role"),
            i18n.translate("language"),
        ),
    }
}

fn alignment(i18n: &Localizer) -> Alignment {
    match i18n.direction() {
        TextDirection::Rtl => Alignment::Right,
        TextDirection::Ltr => Alignment::Left,
    }
}

fn render_chat(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    session: &SessionManager,
    view_data: &ViewData,
) {
    let i18n = *session.localizer();
    let panel = view_data.panel_bundle(session);

    let mut constraints = vec![Constraint::Min(6)];
    if panel.is_some() {
        constraints.push(Constraint::Percentage(60));
    }
    constraints.push(Constraint::Length(3));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let lines = transcript_lines(session, view_data);
    let visible = layout[0].height.saturating_sub(2) as usize;
    let keep = lines.len().saturating_sub(visible);
    let transcript = Paragraph::new(lines.into_iter().skip(keep).collect::<Vec<_>>().join("\n"))
        .alignment(alignment(&i18n))
        .block(
            Block::default()
                .title(i18n.translate("chat_assistant"))
                .borders(Borders::ALL),
        );
    frame.render_widget(transcript, layout[0]);

    if let Some((message_index, bundle)) = panel {
        let focus = view_data
            .focus
            .filter(|focus| focus.message == message_index);
        render_bundle_panel(frame, layout[1], bundle, &i18n, focus);
    }

    let composer_text = if session.composer().is_empty() && view_data.focus.is_none() {
        Span::styled(
            i18n.translate("ask_placeholder").to_owned(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(format!("> {}", session.composer()))
    };
    let composer = Paragraph::new(Line::from(composer_text))
        .alignment(alignment(&i18n))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(composer, layout[layout.len() - 1]);
}

/// Flattened transcript of the active role. Bundles appear as a one-line
/// summary; the full sections are drawn in the panel below.
pub(crate) fn transcript_lines(session: &SessionManager, view_data: &ViewData) -> Vec<String> {
    let i18n = session.localizer();
    let origin = session.asset_origin();
    let role = session.active_role();
    let mut lines = Vec::new();

    for (index, message) in session.active_history().iter().enumerate() {
        lines.extend(message_lines(message, origin, i18n));
        if let Some(cached) = view_data.bundles.get(&(role, index)) {
            lines.push(format!("  {}", bundle_summary(&cached.view, i18n)));
        }
        lines.push(String::new());
    }

    if session.is_pending(role) {
        lines.push(format!("{ASSISTANT_PREFIX} {}", i18n.translate("analyzing")));
    }
    lines
}

pub(crate) fn message_lines(message: &Message, origin: &str, i18n: &Localizer) -> Vec<String> {
    let prefix = match message.role {
        ChatRole::User => USER_PREFIX,
        ChatRole::Assistant => ASSISTANT_PREFIX,
    };
    let content = rewrite_markdown_images(origin, &message.content);

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{prefix} {line}")
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>();
    if lines.is_empty() {
        lines.push(prefix.to_owned());
    }
    if let Some(image) = &message.image {
        lines.push(format!(
            "  [{}] {}",
            i18n.translate("image"),
            resolve_asset_url(origin, image)
        ));
    }
    lines
}

pub(crate) fn bundle_summary(view: &BundleView, i18n: &Localizer) -> String {
    view.sections
        .iter()
        .map(|section| match section {
            Section::Kpis(cards) => cards
                .iter()
                .map(|card| format!("{} {}", card.label, card.value))
                .collect::<Vec<_>>()
                .join(" · "),
            Section::Charts(charts) => charts
                .iter()
                .map(|chart| match chart.frame().and_then(|frame| frame.title.clone()) {
                    Some(title) => format!("[{title}]"),
                    None => chart
                        .placeholder_text(i18n)
                        .map(|text| format!("[{text}]"))
                        .unwrap_or_else(|| format!("[{}]", i18n.translate("image"))),
                })
                .collect::<Vec<_>>()
                .join(" "),
            Section::Tables(tables) => tables
                .iter()
                .map(|table| {
                    let title = table.config().title.clone().unwrap_or_default();
                    format!("[{title} {}×{}]", table.config().rows.len(), table.config().columns.len())
                })
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_bundle_panel(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    bundle: &BundleView,
    i18n: &Localizer,
    focus: Option<TableFocus>,
) {
    let constraints = bundle
        .sections
        .iter()
        .map(|section| match section {
            Section::Kpis(_) => Constraint::Length(6),
            Section::Charts(_) | Section::Tables(_) => Constraint::Min(6),
        })
        .collect::<Vec<_>>();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (section, area) in bundle.sections.iter().zip(layout.iter().copied()) {
        match section {
            Section::Kpis(cards) => render_kpis(frame, area, cards, i18n),
            Section::Charts(charts) => {
                for (chart, area) in charts.iter().zip(split_even(area, charts.len()).iter()) {
                    render_chart(frame, *area, chart, i18n);
                }
            }
            Section::Tables(tables) => {
                for (index, (table, area)) in tables
                    .iter()
                    .zip(split_even(area, tables.len()).iter())
                    .enumerate()
                {
                    let column = focus
                        .filter(|focus| focus.table == index)
                        .map(|focus| focus.column);
                    render_sortable_table(frame, *area, table, i18n, column);
                }
            }
        }
    }
}

fn split_even(area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area)
        .to_vec()
}

fn render_kpis(frame: &mut ratatui::Frame<'_>, area: Rect, cards: &[KpiCard], i18n: &Localizer) {
    for (card, area) in cards.iter().zip(split_even(area, cards.len()).iter()) {
        let lines = kpi_card_lines(card)
            .into_iter()
            .enumerate()
            .map(|(index, line)| match index {
                0 => Line::styled(line, Style::default().add_modifier(Modifier::BOLD)),
                1 => Line::styled(line, Style::default().fg(trend_color(card.badge))),
                _ => Line::raw(line),
            })
            .collect::<Vec<_>>();
        let widget = Paragraph::new(Text::from(lines))
            .alignment(alignment(i18n))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(card.label.clone())
                    .borders(Borders::ALL),
            );
        frame.render_widget(widget, *area);
    }
}

/// Value line, change line (blank when absent), then the description.
pub(crate) fn kpi_card_lines(card: &KpiCard) -> Vec<String> {
    let value = match &card.unit {
        Some(unit) => format!("{} {unit}", card.value),
        None => card.value.clone(),
    };
    let change = match (&card.change, card.trend) {
        (Some(change), Some(trend)) => format!("{} {change}", trend_marker(trend)),
        (Some(change), None) => change.clone(),
        (None, Some(trend)) => trend_marker(trend).to_owned(),
        (None, None) => String::new(),
    };
    let mut lines = vec![value, change];
    if let Some(description) = &card.description {
        lines.push(description.clone());
    }
    lines
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Flat => "●",
    }
}

fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Flat => Color::Gray,
    }
}

fn hex_color(hex: &str) -> Color {
    hex_rgb(hex).map_or(Color::Blue, |(red, green, blue)| Color::Rgb(red, green, blue))
}

fn chart_block(view: &ChartView) -> Block<'static> {
    let title = view
        .frame()
        .and_then(|frame| frame.title.clone())
        .unwrap_or_default();
    Block::default().title(title).borders(Borders::ALL)
}

fn render_chart(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ChartView, i18n: &Localizer) {
    match view {
        ChartView::NoData | ChartView::Unsupported { .. } => {
            let text = view.placeholder_text(i18n).unwrap_or_default();
            let placeholder = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(placeholder, area);
        }
        ChartView::Cartesian(chart) if chart.mark == CartesianMark::Bar => {
            render_bar_chart(frame, area, view, chart);
        }
        ChartView::Cartesian(chart) => render_line_chart(frame, area, view, chart),
        ChartView::Pie(chart) => {
            let legend = Paragraph::new(Text::from(pie_legend_lines(chart)))
                .alignment(alignment(i18n))
                .block(chart_block(view));
            frame.render_widget(legend, area);
        }
        ChartView::Scatter(chart) => render_scatter_chart(frame, area, view, chart),
    }
}

fn render_bar_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ChartView,
    chart: &CartesianChart,
) {
    let max = chart.max_value().filter(|max| *max > 0.0).unwrap_or(1.0);
    let bars = chart
        .points
        .iter()
        .map(|point| {
            let height = point
                .value
                .map(|value| (value.max(0.0) / max * BAR_SCALE).round() as u64)
                .unwrap_or(0);
            let text = point
                .value
                .map(format_number)
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned());
            Bar::default()
                .label(Line::from(point.label.clone()))
                .value(height)
                .text_value(text)
        })
        .collect::<Vec<_>>();
    let width = (area.width.saturating_sub(2) / bars.len().max(1) as u16)
        .saturating_sub(1)
        .clamp(1, 12);
    let widget = BarChart::default()
        .block(chart_block(view))
        .data(BarGroup::default().bars(&bars))
        .bar_width(width)
        .bar_gap(1)
        .max(BAR_SCALE as u64)
        .bar_style(Style::default().fg(hex_color(chart.color)))
        .value_style(Style::default().fg(Color::Black).bg(hex_color(chart.color)));
    frame.render_widget(widget, area);
}

/// Line and area series; gaps in the data break nothing, the points are
/// simply absent.
pub(crate) fn series_points(chart: &CartesianChart) -> Vec<(f64, f64)> {
    chart
        .points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| point.value.map(|value| (index as f64, value)))
        .collect()
}

fn value_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let low = min.min(0.0);
    if max > low { [low, max] } else { [low, low + 1.0] }
}

fn render_line_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ChartView,
    chart: &CartesianChart,
) {
    let data = series_points(chart);
    let graph_type = match chart.mark {
        CartesianMark::Area => GraphType::Bar,
        CartesianMark::Bar | CartesianMark::Line => GraphType::Line,
    };
    let dataset = Dataset::default()
        .name(chart.y_axis.label.clone())
        .marker(Marker::Braille)
        .graph_type(graph_type)
        .style(Style::default().fg(hex_color(chart.color)))
        .data(&data);

    let x_max = chart.points.len().saturating_sub(1).max(1) as f64;
    let x_labels = [chart.points.first(), chart.points.last()]
        .into_iter()
        .flatten()
        .map(|point| point.label.clone())
        .collect::<Vec<_>>();
    let y_bounds = value_bounds(data.iter().map(|(_, value)| *value));

    let widget = Chart::new(vec![dataset])
        .block(chart_block(view))
        .x_axis(
            ChartAxis::default()
                .title(chart.x_axis.label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            ChartAxis::default()
                .title(chart.y_axis.label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_bounds.iter().map(|value| format_number(*value))),
        );
    frame.render_widget(widget, area);
}

fn render_scatter_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ChartView,
    chart: &ScatterChart,
) {
    let dataset = Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(hex_color(chart.color)))
        .data(&chart.points);
    let x_bounds = value_bounds(chart.points.iter().map(|(x, _)| *x));
    let y_bounds = value_bounds(chart.points.iter().map(|(_, y)| *y));

    let widget = Chart::new(vec![dataset])
        .block(chart_block(view))
        .x_axis(
            ChartAxis::default()
                .title(chart.x_axis.label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_bounds.iter().map(|value| format_number(*value))),
        )
        .y_axis(
            ChartAxis::default()
                .title(chart.y_axis.label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_bounds.iter().map(|value| format_number(*value))),
        );
    frame.render_widget(widget, area);
}

pub(crate) fn pie_legend_lines(chart: &PieChart) -> Vec<Line<'static>> {
    chart
        .slices
        .iter()
        .zip(chart.shares())
        .map(|(slice, share)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(hex_color(slice.color))),
                Span::raw(format!("{} ({:.1}%)", slice.label, share * 100.0)),
            ])
        })
        .collect()
}

pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn render_sortable_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    table: &SortableTable,
    i18n: &Localizer,
    focused_column: Option<usize>,
) {
    let border_style = if focused_column.is_some() {
        Style::default().fg(hex_color(PRIMARY_ACCENT))
    } else {
        Style::default()
    };

    let grid = match table.view() {
        TableView::NoData { title } => {
            let empty = Paragraph::new(i18n.translate("no_table_data"))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .title(title.unwrap_or_default())
                        .borders(Borders::ALL)
                        .border_style(border_style),
                );
            frame.render_widget(empty, area);
            return;
        }
        TableView::Grid(grid) => grid,
    };

    let header = Row::new(grid.headers.iter().enumerate().map(|(index, header)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if focused_column == Some(index) {
            style = Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        Cell::from(header.display()).style(style)
    }));
    let rows = grid
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().cloned().map(Cell::from)));
    let widths = vec![Constraint::Min(8); grid.headers.len().max(1)];

    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(grid.title.unwrap_or_default())
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(widget, area);
}

fn render_admin(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    admin: &AdminWorkspace,
    i18n: &Localizer,
    view_data: &ViewData,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3), Constraint::Length(6)])
        .split(columns[0]);

    let upload = Paragraph::new(upload_panel_text(admin, i18n))
        .alignment(alignment(i18n))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(i18n.translate("data_upload"))
                .borders(Borders::ALL),
        );
    frame.render_widget(upload, left[0]);

    let files = Paragraph::new(file_list_text(admin, i18n))
        .alignment(alignment(i18n))
        .block(
            Block::default()
                .title(i18n.translate("uploaded_files"))
                .borders(Borders::ALL),
        );
    frame.render_widget(files, left[1]);

    let users = admin
        .users()
        .iter()
        .map(|user| format!("{} ({})", user.username, user.role.as_str()))
        .collect::<Vec<_>>();
    let users = Paragraph::new(if users.is_empty() {
        i18n.translate("none").to_owned()
    } else {
        users.join("\n")
    })
    .alignment(alignment(i18n))
    .block(
        Block::default()
            .title(i18n.translate("active_users"))
            .borders(Borders::ALL),
    );
    frame.render_widget(users, left[2]);

    let title = match admin.selected_file() {
        Some(file) => format!("{}: {file}", i18n.translate("preview")),
        None => i18n.translate("preview").to_owned(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    match admin.preview() {
        Some(preview) => {
            let inner = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(block.inner(columns[1]));
            frame.render_widget(block, columns[1]);
            frame.render_widget(preview_table(preview), inner[0]);
            let footer = Paragraph::new(admin.preview_footer().unwrap_or_default())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(alignment(i18n));
            frame.render_widget(footer, inner[1]);
        }
        None => {
            let hint = if admin.files().is_empty() && view_data.admin_loaded {
                i18n.translate("no_files")
            } else {
                i18n.translate("select_file")
            };
            let empty = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, columns[1]);
        }
    }
}

pub(crate) fn upload_panel_text(admin: &AdminWorkspace, i18n: &Localizer) -> Text<'static> {
    let mut lines = vec![Line::raw(format!(
        "u {} | {}",
        i18n.translate("upload_data"),
        i18n.translate("supported_files")
    ))];
    if admin.is_uploading() {
        lines.push(Line::styled(
            i18n.translate("uploading").to_owned(),
            Style::default().fg(Color::Yellow),
        ));
    }
    match admin.upload_status() {
        Some(UploadStatus::Success(info)) => lines.push(Line::styled(
            format!("{}: {info}", i18n.translate("success")),
            Style::default().fg(Color::Green),
        )),
        Some(UploadStatus::Error(error)) => lines.push(Line::styled(
            format!("{}: {error}", i18n.translate("error")),
            Style::default().fg(Color::Red),
        )),
        None => {}
    }
    Text::from(lines)
}

pub(crate) fn file_list_text(admin: &AdminWorkspace, i18n: &Localizer) -> String {
    if admin.files().is_empty() {
        return i18n.translate("no_files").to_owned();
    }
    let selected = admin.selected_index();
    admin
        .files()
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let marker = if Some(index) == selected { ">" } else { " " };
            format!("{marker} {file}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview_table(preview: &DataPreview) -> Table<'static> {
    let header = Row::new(preview.columns.iter().map(|column| {
        Cell::from(column.clone()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = preview
        .data
        .iter()
        .map(|row| {
            Row::new(
                preview
                    .columns
                    .iter()
                    .map(|column| {
                        row.get(column)
                            .and_then(display_value)
                            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned())
                    })
                    .map(Cell::from)
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<Vec<_>>();
    let widths = vec![Constraint::Min(8); preview.columns.len().max(1)];
    Table::new(rows, widths).header(header).column_spacing(1)
}

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
