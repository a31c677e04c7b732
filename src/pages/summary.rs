use crate::app::App;
use crate::common::constants::group_label;
use crate::common::utils::format_percentage;
use crate::state::matrix::{MatrixCell, MatrixDisplay, MatrixRow, MatrixView};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

pub fn render_summary(app: &mut App, frame: &mut Frame, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_query_bar(app, frame, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(layout[1]);

    render_matrix(app, frame, body[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(body[1]);
    render_group_stats(app, frame, side[0]);
    render_top_disconnected(app, frame, side[1]);
}

fn render_query_bar(app: &App, frame: &mut Frame, area: Rect) {
    let query = &app.matrix_query;
    let date = |d: Option<chrono::NaiveDate>| {
        d.map_or("(last 7 days)".to_string(), |d| d.format("%Y-%m-%d").to_string())
    };
    let group = query
        .group_id
        .map_or("Todos".to_string(), |id| {
            group_label(id).map_or(id.to_string(), str::to_string)
        });

    let line = Line::from(vec![
        Span::styled("Desde: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(date(query.start_date)),
        Span::raw("  "),
        Span::styled("Hasta: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(date(query.end_date)),
        Span::raw("  "),
        Span::styled("Grupo: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(group),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Filtros")),
        area,
    );
}

fn render_matrix(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Conectividad por contrato");

    let paragraph = match app.matrix.display() {
        MatrixDisplay::Loading => {
            Paragraph::new("Loading summary...").style(Style::default().fg(Color::Yellow))
        }
        MatrixDisplay::Error(err) => {
            Paragraph::new(format!("Error: {err}")).style(Style::default().fg(Color::Red))
        }
        MatrixDisplay::Empty => Paragraph::new("No data for this range"),
        MatrixDisplay::Table(view) => {
            let contracts = view.rows().filter(MatrixRow::is_selectable).count();
            let block = block.title_bottom(format!(" {contracts} contratos "));
            frame.render_widget(matrix_table(view).block(block), area);
            return;
        }
    };
    frame.render_widget(paragraph.block(block), area);
}

fn matrix_table(view: MatrixView<'_>) -> Table<'_> {
    let mut widths = vec![Constraint::Length(24)];
    widths.extend(view.dates().iter().map(|_| Constraint::Length(16)));

    let mut header = None;
    let mut rows = Vec::new();
    for row in view.rows() {
        match row {
            MatrixRow::Header { dates } => {
                let mut cells = vec![Cell::from("Contrato")];
                cells.extend(dates.iter().map(|d| Cell::from(d.as_str())));
                header = Some(Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD)));
            }
            MatrixRow::Section { group } => {
                rows.push(
                    Row::new(vec![Cell::from(group)]).style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
            MatrixRow::Contract { name, cells } => {
                let mut row = vec![Cell::from(format!("  {name}"))];
                row.extend(cells.iter().map(matrix_cell));
                rows.push(Row::new(row));
            }
        }
    }

    let table = Table::new(rows, widths);
    match header {
        Some(header) => table.header(header),
        None => table,
    }
}

fn matrix_cell(cell: &MatrixCell<'_>) -> Cell<'static> {
    let color = match cell.percentage {
        None => Color::DarkGray,
        Some(p) if p >= 90.0 => Color::Green,
        Some(p) if p >= 70.0 => Color::Yellow,
        Some(_) => Color::Red,
    };
    Cell::from(format!(
        "{} ({}/{})",
        format_percentage(cell.percentage),
        cell.connected,
        cell.disconnected
    ))
    .style(Style::default().fg(color))
}

fn render_group_stats(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Grupo");

    let text = match (&app.matrix_query.group_id, &app.group_stats) {
        (None, _) => vec![Line::from("Select a group with 'g'")],
        (Some(_), None) => vec![Line::from("Loading...")],
        (Some(_), Some(Err(err))) => vec![Line::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )],
        (Some(_), Some(Ok(stats))) => {
            let field = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(value),
                ])
            };
            let mut lines = vec![
                field("Grupo: ", stats.group_name.clone()),
                field("Vehículos: ", stats.total_vehicles.to_string()),
                field("Desconexiones: ", stats.total_disconnections.to_string()),
                field("En ruta: ", stats.disconnected_route.to_string()),
                field("En base: ", stats.disconnected_base.to_string()),
                field(
                    "Resolución prom.: ",
                    format!("{:.1} h", stats.avg_resolution_hours),
                ),
            ];
            lines.extend(
                stats
                    .status_breakdown
                    .iter()
                    .map(|(status, count)| Line::from(format!("  {status}: {count}"))),
            );
            lines
        }
    };

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_top_disconnected(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Más desconectados");

    match &app.top_disconnected {
        None => frame.render_widget(Paragraph::new("Loading...").block(block), area),
        Some(Err(err)) => frame.render_widget(
            Paragraph::new(format!("Error: {err}"))
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        ),
        Some(Ok(top)) if top.vehicles.is_empty() => {
            frame.render_widget(Paragraph::new("No disconnections").block(block), area)
        }
        Some(Ok(top)) => {
            let rows: Vec<Row> = top
                .vehicles
                .iter()
                .map(|v| {
                    Row::new(vec![
                        Cell::from(v.vin.as_str()),
                        Cell::from(v.disconnection_count.to_string()),
                    ])
                })
                .collect();
            let table = Table::new(rows, [Constraint::Min(17), Constraint::Length(5)])
                .header(
                    Row::new(vec!["VIN", "#"]).style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .block(block);
            frame.render_widget(table, area);
        }
    }
}
