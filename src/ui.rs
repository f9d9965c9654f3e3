use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::state::{Message, Role, AGENT_AUTHOR};

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Agent => Color::Yellow,
    }
}

fn role_alignment(role: Role) -> Alignment {
    match role {
        Role::User => Alignment::Right,
        Role::Agent => Alignment::Left,
    }
}

/// One bubble: author line, the text line by line, then a blank separator.
///
/// Text goes in as plain spans. Nothing in it is interpreted, so whatever
/// the server sends is shown exactly as sent.
fn bubble_lines(msg: &Message) -> Vec<Line<'static>> {
    let alignment = role_alignment(msg.role);
    let mut lines = Vec::with_capacity(msg.text.lines().count() + 2);

    lines.push(
        Line::from(Span::styled(
            msg.author.clone(),
            Style::default().fg(role_color(msg.role)).add_modifier(Modifier::BOLD),
        ))
        .alignment(alignment),
    );
    for line in msg.text.lines() {
        lines.push(Line::from(line.to_string()).alignment(alignment));
    }
    lines.push(Line::default());

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, transcript_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", AGENT_AUTHOR),
            Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.client.endpoint()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(header), area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store pane geometry for scroll math and mouse hit-testing
    app.transcript_area = Some(area);
    app.transcript_height = area.height.saturating_sub(2);
    app.transcript_width = area.width.saturating_sub(2);
    app.sync_scroll();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversación ");

    let transcript = transcript_paragraph(app)
        .block(block)
        .scroll((app.scroll, 0));

    frame.render_widget(transcript, area);
}

/// The wrapped transcript without its border.
///
/// `App` measures scroll bounds from this same paragraph, so the row count
/// always matches what gets drawn.
pub fn transcript_paragraph(app: &App) -> Paragraph<'static> {
    let text = if app.transcript.is_empty() && !app.is_waiting() {
        Text::from(Span::styled(
            "Escribe un mensaje y pulsa Enter...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line<'static>> = app.transcript.iter().flat_map(bubble_lines).collect();

        if app.is_waiting() {
            lines.push(Line::from(Span::styled(
                AGENT_AUTHOR,
                Style::default().fg(role_color(Role::Agent)).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("escribiendo{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    Paragraph::new(text).wrap(Wrap { trim: false })
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Mensaje ");

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(role_color(Role::User)))
        .block(input_block);

    frame.render_widget(input, area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::Gray);

    let mut spans = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" enviar ", label_style),
        Span::styled(" ↑/↓ PgUp/PgDn ", key_style),
        Span::styled(" desplazar ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" salir ", label_style),
    ];

    if let Some(failure) = &app.last_failure {
        spans.push(Span::styled(
            format!(" Sin respuesta: {} ", failure),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if app.in_flight > 1 {
        spans.push(Span::styled(
            format!(" {} pendientes ", app.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
