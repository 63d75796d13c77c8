use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use trivia::session::{QuizSession, Score, SessionState};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Results(score) => render_results(self, score, area, buf),
            AppState::Quiz => match self.session.state() {
                SessionState::Empty | SessionState::Loading => {
                    render_loading(self.spinner_frame, area, buf)
                }
                SessionState::Failed => render_failed(&self.session, area, buf),
                SessionState::Ready => render_question(&self.session, area, buf),
            },
        }
    }
}

/// Split `area` so that `height` rows sit in the vertical middle
fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

fn render_loading(frame: usize, area: Rect, buf: &mut Buffer) {
    let spinner = SPINNER[frame % SPINNER.len()];
    Paragraph::new(Span::styled(
        format!("{spinner} Loading questions"),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(centered(area, 1), buf);
}

fn render_failed(session: &QuizSession, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled(
        "Unable to load questions. Please try again later.",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))];
    if let Some(err) = session.failure() {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(r)etry / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    let height = lines.len() as u16 + 2;
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered(area, height), buf);
}

fn render_question(session: &QuizSession, area: Rect, buf: &mut Buffer) {
    let Some(question) = session.current_question() else {
        return;
    };

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let marked = session.is_current_marked();

    // borders take two columns on top of the margins
    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2 + 2).max(1);
    let question_lines = ((question.text.width() as f64 / text_width as f64).ceil() as u16).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                                 // progress
            Constraint::Length(1),                                 // counter + metadata
            Constraint::Length(1),                                 // padding
            Constraint::Length(question_lines + 2),                // question card
            Constraint::Length(question.options.len() as u16 + 2), // options
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(session.progress().clamp(0.0, 1.0))
        .label(format!("{:.0}%", session.progress() * 100.0))
        .render(chunks[0], buf);

    let mut header = vec![Span::styled(
        format!(
            "Question {} of {}",
            session.current_index() + 1,
            session.len()
        ),
        bold_style,
    )];
    if let Some(category) = &question.category {
        header.push(Span::styled(format!("  {category}"), dim_style));
    }
    if let Some(difficulty) = &question.difficulty {
        header.push(Span::styled(format!("  [{difficulty}]"), dim_style));
    }
    Paragraph::new(Line::from(header)).render(chunks[1], buf);

    let mut card = Block::default().borders(Borders::ALL);
    if marked {
        card = card
            .title(" marked for review ")
            .border_style(Style::default().fg(Color::Yellow));
    }
    Paragraph::new(Span::styled(question.text.as_str(), bold_style))
        .block(card)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            if question.selected_option.as_deref() == Some(option.as_str()) {
                Line::from(Span::styled(
                    format!("● {}) {}", idx + 1, option),
                    Style::default().patch(bold_style).fg(Color::Green),
                ))
            } else {
                Line::from(Span::raw(format!("○ {}) {}", idx + 1, option)))
            }
        })
        .collect::<Vec<Line>>();
    Paragraph::new(options)
        .block(Block::default().borders(Borders::ALL).title(" answers "))
        .render(chunks[4], buf);

    let enabled = |on: bool| if on { italic_style } else { dim_style };
    let legend = Line::from(vec![
        Span::styled("(←) previous", enabled(session.has_previous())),
        Span::styled(" / ", italic_style),
        Span::styled("(→) next", enabled(session.has_next())),
        Span::styled(" / (m)ark / (s)ubmit / (r)estart / (esc)ape", italic_style),
    ]);
    Paragraph::new(legend).render(chunks[6], buf);
}

fn render_results(app: &App, score: Score, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let lines = vec![
        Line::from(Span::styled(
            "Quiz Submitted!",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Your score is {} out of {}.", score.score, score.total),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} answered, {} marked for review",
                session.answered_count(),
                session.marked_count()
            ),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            format!(
                "difficulty: {}",
                app.config
                    .difficulty
                    .map_or_else(|| "any".to_string(), |d| d.to_string())
            ),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::default(),
        Line::from(Span::styled(
            "(r)estart / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let height = lines.len() as u16 + 2;
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(centered(area, height), buf);
}
