use crate::app::{App, LoginField};
use crate::common::utils::centered_rect;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn render_login(app: &App, frame: &mut Frame) {
    let area = centered_rect(40, 40, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Iniciar sesión");
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Status
            Constraint::Min(0),
        ])
        .split(area);

    let form = &app.login;
    let field_style = |field: LoginField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    frame.render_widget(
        Paragraph::new(form.username.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Usuario")
                .style(field_style(LoginField::Username)),
        ),
        layout[0],
    );

    let masked = "*".repeat(form.password.chars().count());
    frame.render_widget(
        Paragraph::new(masked).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Contraseña")
                .style(field_style(LoginField::Password)),
        ),
        layout[1],
    );

    let status = if form.submitting {
        Paragraph::new("Signing in...").style(Style::default().fg(Color::Yellow))
    } else if let Some(err) = &form.error {
        Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(status.alignment(Alignment::Center), layout[2]);

    frame.render_widget(
        Paragraph::new("Tab: switch field | Enter: submit | Esc: quit")
            .alignment(Alignment::Center),
        layout[3],
    );
}
