use crate::api::types::Vehicle;
use crate::app::App;
use crate::common::utils::format_timestamp;
use crate::ui::{pagination_title, render_list_status};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

pub fn render_vehicles(app: &mut App, frame: &mut Frame, area: Rect) {
    let view = &mut app.vehicles;
    let title = pagination_title(
        "Vehículos",
        view.list.pagination(),
        view.filters.filters().to_query().len(),
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    let display = view.list.display();
    if render_list_status(&display, "vehicles", frame, area, block.clone()) {
        return;
    }

    let rows: Vec<Row> = view.list.items().iter().map(vehicle_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(19),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Length(22), // Position
            Constraint::Min(16),
        ],
    )
    .header(
        Row::new(vec![
            "VIN",
            "Grupo",
            "Distribuidor",
            "Geocerca",
            "Posición",
            "Última conexión",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn vehicle_row(vehicle: &Vehicle) -> Row<'_> {
    let position = match (vehicle.last_latitude, vehicle.last_longitude) {
        (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
        _ => "-".to_string(),
    };

    Row::new(vec![
        Cell::from(vehicle.vin.as_str()),
        Cell::from(vehicle.group_name.as_deref().unwrap_or("-")),
        Cell::from(vehicle.distribuidor_name.as_deref().unwrap_or("-")),
        Cell::from(vehicle.geofence_name.as_deref().unwrap_or("-")),
        Cell::from(position),
        Cell::from(format_timestamp(vehicle.last_connection.as_deref())),
    ])
}
