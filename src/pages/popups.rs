use crate::app::{App, CurrentView, InputMode};
use crate::common::utils::{centered_rect, format_timestamp};
use crate::state::edit::{EditField, RegisterEditor};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub fn render_edit_modal(app: &App, frame: &mut Frame) {
    let Some(editor) = &app.editor else {
        return;
    };
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let register = editor.register();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "Editar registro #{} | {}",
            register.id,
            register.vin.as_deref().unwrap_or("-")
        ))
        .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Context
            Constraint::Min(6),    // Fields
            Constraint::Length(1), // Status
            Constraint::Length(1), // Instructions
        ])
        .split(area);

    let context = vec![
        Line::from(vec![
            Span::styled("Problema: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(register.problem.as_deref().unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Última conexión: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_timestamp(register.last_connection.as_deref())),
        ]),
    ];
    frame.render_widget(Paragraph::new(context).wrap(Wrap { trim: true }), layout[0]);

    let rows: Vec<Row> = EditField::ALL
        .iter()
        .map(|field| {
            let style = if *field == editor.focus() {
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(field.label()),
                Cell::from(staged_value(editor, *field)),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)]);
    frame.render_widget(table, layout[1]);

    let status = if editor.is_saving() {
        Paragraph::new("Saving...").style(Style::default().fg(Color::Yellow))
    } else if let Some(err) = editor.error() {
        Paragraph::new(err).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(status, layout[2]);

    frame.render_widget(
        Paragraph::new("Up/Down: field | Left/Right: change | Enter: save | Esc: cancel")
            .alignment(Alignment::Center),
        layout[3],
    );
}

fn staged_value(editor: &RegisterEditor, field: EditField) -> String {
    let staged = editor.staged();
    match field {
        EditField::Tipo => format!("< {} >", staged.tipo.label()),
        EditField::EstatusFinal => format!(
            "< {} >",
            staged.estatus_final.map_or("Sin estatus", |s| s.label())
        ),
        EditField::Responsable => format!("< {} >", staged.responsable.label()),
        EditField::Comentario => {
            if editor.focus() == EditField::Comentario {
                format!("{}_", staged.comentario)
            } else {
                staged.comentario.clone()
            }
        }
    }
}

pub fn render_input_modal(app: &App, frame: &mut Frame) {
    let Some(mode) = app.input.mode else {
        return;
    };
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let title = match (mode, app.current_view) {
        (InputMode::Search, CurrentView::Vehicles) => "Buscar vehículo (VIN)",
        (InputMode::Search, _) => "Buscar registro",
        (InputMode::StartDate, _) => "Fecha inicial (YYYY-MM-DD)",
        (InputMode::EndDate, _) => "Fecha final (YYYY-MM-DD)",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title("Value")
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(
        Paragraph::new(app.input.buffer.as_str()).block(input_block),
        layout[0],
    );

    let footer = match &app.input.error {
        Some(err) => Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new("Enter: apply (empty clears) | Esc: cancel"),
    };
    frame.render_widget(footer.alignment(Alignment::Center), layout[1]);
}

pub fn render_alert(app: &App, frame: &mut Frame) {
    let Some(message) = &app.alert else {
        return;
    };
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Error")
        .style(Style::default().fg(Color::Red));
    let text = vec![
        Line::from(message.as_str()),
        Line::from(""),
        Line::from("Press any key to continue").alignment(Alignment::Center),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
