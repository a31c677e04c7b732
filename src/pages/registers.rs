use crate::api::types::Register;
use crate::app::App;
use crate::common::utils::{format_timestamp, format_vin};
use crate::ui::{pagination_title, render_list_status};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

pub fn render_registers(app: &mut App, frame: &mut Frame, area: Rect) {
    let view = &mut app.registers;
    let title = pagination_title(
        "Registros",
        view.list.pagination(),
        view.filters.filters().to_query().len(),
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    let display = view.list.display();
    if render_list_status(&display, "registers", frame, area, block.clone()) {
        return;
    }

    let rows: Vec<Row> = view.list.items().iter().map(register_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12), // VIN
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(8),
            Constraint::Percentage(16),
            Constraint::Length(16), // Last connection
            Constraint::Percentage(10),
            Constraint::Percentage(10),
            Constraint::Percentage(12),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec![
            "VIN",
            "Cliente",
            "Distribuidor",
            "Contrato",
            "Problema",
            "Última conexión",
            "Tipo",
            "Estatus final",
            "Responsable",
            "Comentario",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn register_row(register: &Register) -> Row<'_> {
    let status_style = match register.estatus_final {
        None => Style::default().fg(Color::Yellow),
        Some(_) => Style::default(),
    };

    Row::new(vec![
        Cell::from(format_vin(register.vin.as_deref(), 8)),
        Cell::from(register.client_description.as_deref().unwrap_or("-")),
        Cell::from(
            register
                .distribuidor
                .as_ref()
                .map_or("-".to_string(), |d| d.to_string()),
        ),
        Cell::from(
            register
                .contract
                .as_ref()
                .map_or("-".to_string(), |c| c.to_string()),
        ),
        Cell::from(register.problem.as_deref().unwrap_or("-")),
        Cell::from(format_timestamp(register.last_connection.as_deref())),
        Cell::from(register.tipo.label()),
        Cell::from(Span::styled(
            register.estatus_final.map_or("Sin estatus", |s| s.label()),
            status_style,
        )),
        Cell::from(register.responsable.label()),
        Cell::from(register.comentario.as_str()),
    ])
}
