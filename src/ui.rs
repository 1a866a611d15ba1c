pub mod screen;

use std::time::SystemTime;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use vedaquiz::{
    scorer::{format_points, Status},
    session::SubmitReason,
    timer::{allotted, format_remaining},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Lines a piece of text occupies when wrapped at `width` columns
fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    ((text.width() as f64 / width as f64).ceil() as u16).max(1)
}

pub fn render_name_entry(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Percentage(30),
                Constraint::Length(2), // title
                Constraint::Length(2), // quiz details
                Constraint::Length(2), // name field
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(
        app.title.as_str(),
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let mut details = format!("{} questions", session.questions.len());
    if session.config.timed {
        details.push_str(&format!(
            "   {} on the clock",
            format_remaining(allotted(session.questions.len()))
        ));
    }
    Paragraph::new(Span::styled(details, italic()))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("Enter your name: ", bold()),
        Span::styled(session.name_input().to_string(), bold().fg(Color::Green)),
        Span::styled("_", dim().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled("(enter) start / (esc)ape", italic())).render(chunks[5], buf);
}

pub fn render_questions(app: &App, area: Rect, buf: &mut Buffer, now: SystemTime) {
    let session = &app.session;
    let total = session.questions.len();

    let mut header = vec![Span::styled(
        session.player().unwrap_or_default().to_string(),
        bold().fg(Color::Cyan),
    )];
    if total > 0 {
        header.push(Span::styled(
            format!(
                "   question {}/{}   answered {}/{}",
                session.cursor() + 1,
                total,
                session.responses().answered(),
                total
            ),
            bold(),
        ));
    }
    if let Some(remaining) = session.remaining(now) {
        let secs = remaining.as_secs();
        let style = if secs < 10 {
            bold().fg(Color::Red)
        } else if secs < 30 {
            bold().fg(Color::Yellow)
        } else {
            dim()
        };
        header.push(Span::styled(
            format!("   {} left", format_remaining(remaining)),
            style,
        ));
    }

    let Some(question) = session.questions.get(session.cursor()) else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)].as_ref())
            .split(area);
        Paragraph::new(Line::from(header)).render(chunks[0], buf);
        Paragraph::new(Span::styled(
            "No questions loaded. Submit to record an empty score.",
            italic().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
        Paragraph::new(Span::styled("(enter) submit / (esc)ape", italic())).render(chunks[2], buf);
        return;
    };

    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let question_text = format!("Question {}: {}", session.cursor() + 1, question.text);
    let question_lines = wrapped_height(&question_text, text_width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),                  // header
                Constraint::Length(question_lines + 1), // question text
                Constraint::Length(4),                  // options
                Constraint::Min(1),                     // padding
                Constraint::Length(2),                  // progress strip
                Constraint::Length(1),                  // legend
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Line::from(header)).render(chunks[0], buf);

    Paragraph::new(Span::styled(question_text, bold()))
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    let selected = session.responses().get(session.cursor() + 1);
    let options: Vec<Line> = question
        .labelled_options()
        .map(|(letter, label)| {
            if selected == Some(letter) {
                Line::from(vec![
                    Span::styled("(•) ", bold().fg(Color::Green)),
                    Span::styled(label, bold().fg(Color::Green)),
                ])
            } else {
                Line::from(vec![Span::styled("( ) ", dim()), Span::raw(label)])
            }
        })
        .collect();
    Paragraph::new(options).render(chunks[2], buf);

    let strip: Vec<Span> = (1..=total)
        .map(|number| {
            let mut style = if session.responses().get(number).is_some() {
                Style::default().fg(Color::Green)
            } else {
                dim()
            };
            if number == session.cursor() + 1 {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            Span::styled(format!("{} ", number), style)
        })
        .collect();
    Paragraph::new(Line::from(strip))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(a-d) answer / (↑↓) question / (←→) cycle / (x) clear / (enter) submit / (esc)ape",
        italic(),
    ))
    .render(chunks[5], buf);
}

pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(outcome) = app.session.outcome() else {
        return;
    };

    let question_rows = outcome.result.per_question.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),                 // score
                Constraint::Length(question_rows + 1), // per-question outcome
                Constraint::Min(1),                    // leaderboard
                Constraint::Length(1),                 // legend
            ]
            .as_ref(),
        )
        .split(area);

    let mut headline = vec![Span::styled(
        format!(
            "{}, your final score is: {}",
            outcome.player,
            outcome.result.display()
        ),
        bold().fg(Color::Cyan),
    )];
    if outcome.reason == SubmitReason::TimeUp {
        headline.push(Span::styled(
            format!("   ({})", outcome.reason),
            bold().fg(Color::Red),
        ));
    }
    Paragraph::new(Line::from(headline))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let rows: Vec<Line> = outcome
        .result
        .per_question
        .iter()
        .map(|r| {
            let answer = app
                .session
                .questions
                .get(r.number - 1)
                .map(|q| format!("{}. {}", r.correct, q.option(r.correct)))
                .unwrap_or_else(|| r.correct.to_string());
            match r.status {
                Status::Correct => Line::from(vec![
                    Span::styled(format!("Q{} ✓ ", r.number), bold().fg(Color::Green)),
                    Span::raw(format!("correct (+{})", format_points(r.points()))),
                ]),
                Status::Wrong => Line::from(vec![
                    Span::styled(format!("Q{} ✗ ", r.number), bold().fg(Color::Red)),
                    Span::raw(format!(
                        "wrong ({}), correct answer: {}",
                        format_points(r.points()),
                        answer
                    )),
                ]),
                Status::Unanswered => Line::from(vec![
                    Span::styled(format!("Q{} · ", r.number), dim()),
                    Span::styled(format!("unanswered, correct answer: {}", answer), dim()),
                ]),
            }
        })
        .collect();
    Paragraph::new(rows).render(chunks[1], buf);

    let mut board = vec![Line::from(Span::styled("Leaderboard", bold().fg(Color::Yellow)))];
    board.extend(outcome.standings.iter().map(|entry| {
        let style = if entry.name == outcome.player {
            bold().fg(Color::Green)
        } else {
            Style::default()
        };
        Line::from(Span::styled(entry.to_string(), style))
    }));
    Paragraph::new(board).render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "(r)estart / (q)uit        finished {}",
            outcome.finished_at.format("%H:%M:%S")
        ),
        italic(),
    ))
    .render(chunks[3], buf);
}
