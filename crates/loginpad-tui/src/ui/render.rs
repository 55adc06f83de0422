use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use loginpad_core::Route;

use crate::app::{App, AppState, LoginFocus};

use super::styles;

/// Visible width of the email/password fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Address bar
            Constraint::Min(10),   // Current view
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_address_bar(frame, app, chunks[0]);
    match app.current_view() {
        Some(Route::Login) => render_login(frame, app, chunks[1]),
        Some(Route::Home) => render_home(frame, chunks[1]),
        // Unmatched paths render nothing
        None => {}
    }
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::EnteringPath) {
        render_path_prompt(frame, app);
    }
}

fn render_address_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  loginpad";
    let path = app.router.current().path.as_str();
    let user = app.session.read().user;
    let right = if user.is_empty() {
        "not signed in".to_string()
    } else {
        user
    };

    let used = title.len() + path.len() + right.len() + 6;
    let line = Line::from(vec![
        Span::styled(title, styles::heading()),
        Span::raw("  "),
        Span::styled(path, styles::address()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(right, styles::faded()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::faded());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let extra = [
        form.field_errors.email.is_some(),
        form.field_errors.password.is_some(),
        form.error().is_some(),
    ]
    .iter()
    .filter(|shown| **shown)
    .count() as u16;
    let dialog = centered_rect_fixed(46, 11 + extra, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(Span::styled("Login", styles::heading())),
        Line::from(""),
    ];

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    lines.push(field_line("Email:    ", &form.email, email_focused));
    if let Some(ref message) = form.field_errors.email {
        lines.push(Line::from(Span::styled(message.clone(), styles::alert())));
    }

    // Password field (masked)
    let password_focused = app.login_focus == LoginFocus::Password;
    let masked = "*".repeat(form.password.chars().count());
    lines.push(field_line("Password: ", &masked, password_focused));
    if let Some(ref message) = form.field_errors.password {
        lines.push(Line::from(Span::styled(message.clone(), styles::alert())));
    }

    // Sign-in button
    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let label = if form.is_submitting() {
        " Signing in... "
    } else if button_focused {
        "  ▶ Sign in ◀  "
    } else {
        "    Sign in    "
    };
    lines.push(Line::from(vec![
        Span::raw("["),
        Span::styled(label, styles::button(button_focused)),
        Span::raw("]"),
    ]));

    // Request error
    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.to_string(), styles::alert())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Forgot password?", styles::faded())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::frame(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(paragraph, dialog);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let cursor = if focused { "▌" } else { " " };
    let visible = tail(value, FIELD_WIDTH);
    Line::from(vec![
        Span::styled(label, styles::faded()),
        Span::styled("[", styles::faded()),
        Span::styled(
            format!("{:<width$}{}", visible, cursor, width = FIELD_WIDTH),
            styles::input(focused),
        ),
        Span::styled("]", styles::faded()),
    ])
}

/// Last `width` characters, so the cursor end stays visible while typing
fn tail(value: &str, width: usize) -> String {
    let len = value.chars().count();
    value.chars().skip(len.saturating_sub(width)).collect()
}

fn render_home(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Home", styles::heading())),
        Line::from(""),
        Line::from(Span::styled("You are logged in!", styles::welcome())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::frame(false));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(paragraph, centered_rect_fixed(40, 5, area));
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    let hints: &[(&str, &str)] = match app.current_view() {
        Some(Route::Login) => &[
            ("Tab", "next field"),
            ("Enter", "sign in"),
            ("^G", "go to"),
            ("^B", "back"),
            ("Esc", "quit"),
        ],
        _ => &[("g", "go to"), ("b", "back"), ("q", "quit")],
    };
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", styles::faded()));
        }
        spans.push(Span::styled(*key, styles::key()));
        spans.push(Span::styled(format!(" {}", desc), styles::faded()));
    }

    if let Some(ref message) = app.status_message {
        spans.push(Span::styled("   ", styles::faded()));
        spans.push(Span::styled(message.clone(), styles::notice()));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::faded());

    let paragraph = Paragraph::new(Line::from(spans))
        .style(styles::bar())
        .block(block);

    frame.render_widget(paragraph, area);
}

fn render_path_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 5, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("Go to: ", styles::faded()),
            Span::styled(format!("{}▌", app.path_input), styles::input(true)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter]", styles::key()),
            Span::styled(" go  ", styles::faded()),
            Span::styled("[Esc]", styles::key()),
            Span::styled(" cancel", styles::faded()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::frame(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
