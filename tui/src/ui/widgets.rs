use neural_playground::dataset::XOR;
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::state::model::{Inspection, SessionView};

use super::theme::Theme;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

pub fn header(view: &SessionView) -> Paragraph<'_> {
    let snapshot = &view.snapshot;
    let (status, status_style) = if snapshot.running {
        ("RUNNING", Theme::ok())
    } else {
        ("PAUSED", Theme::warn())
    };

    let mut line1 = vec![
        Span::styled(
            "Neural Playground · XOR",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(status, status_style),
    ];
    if snapshot.state.converged {
        line1.push(Span::raw("  |  "));
        line1.push(Span::styled("CONVERGED", Theme::accent_cyan()));
    }

    let line2 = Line::from(vec![Span::styled(
        format!(
            "Hidden units: {}  |  Lessons completed: {} / {}",
            snapshot.params.hidden_units(),
            view.lessons_completed,
            view.lessons_total
        ),
        Theme::dim(),
    )]);

    Paragraph::new(vec![Line::from(line1), line2])
        .style(Theme::text())
        .block(panel("Overview"))
        .wrap(Wrap { trim: true })
}

pub fn stats(view: &SessionView) -> Paragraph<'_> {
    let snapshot = &view.snapshot;
    let state = &snapshot.state;

    let last = match &snapshot.last_pass {
        Some(pass) => format!(
            "[{:.0}, {:.0}] -> {:.4}",
            pass.inputs[0], pass.inputs[1], pass.output
        ),
        None => "-".to_string(),
    };

    let loss_style = if state.total_loss.is_finite() {
        Theme::text()
    } else {
        Theme::error()
    };

    let lines = vec![
        Line::from(format!("epoch:          {}", state.epoch)),
        Line::from(Span::styled(
            format!("total loss:     {:.6}", state.total_loss),
            loss_style,
        )),
        Line::from(format!(
            "correct:        {} / {} ({:.0}%)",
            state.correct_count(),
            XOR.len(),
            state.accuracy()
        )),
        Line::from(format!("learning rate:  {:.2}", snapshot.learning_rate)),
        Line::from(format!(
            "speed:          {} ({} ms/step)",
            snapshot.speed.get(),
            snapshot.speed.interval().as_millis()
        )),
        Line::from(Span::styled(format!("last sample:    {last}"), Theme::dim())),
    ];

    Paragraph::new(lines).style(Theme::text()).block(panel("Training"))
}

pub fn predictions_table(view: &SessionView) -> Table<'_> {
    let header = Row::new(vec!["#", "x1", "x2", "target", "prediction", ""])
        .style(Theme::title());

    let state = &view.snapshot.state;
    let rows = XOR.iter().enumerate().map(|(i, sample)| {
        let (mark, mark_style) = if state.is_correct(i) {
            ("ok", Theme::ok())
        } else {
            ("x", Theme::error())
        };

        let row = Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(format!("{:.0}", sample.inputs[0])),
            Cell::from(format!("{:.0}", sample.inputs[1])),
            Cell::from(format!("{:.0}", sample.target)),
            Cell::from(format!("{:.4}", state.predictions[i])),
            Cell::from(Span::styled(mark, mark_style)),
        ]);

        if i == view.example {
            row.style(Theme::highlight_bg())
        } else {
            row
        }
    });

    Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Min(2),
        ],
    )
    .header(header)
    .style(Theme::text())
    .block(panel("Predictions"))
}

pub fn inspector(view: &SessionView) -> Paragraph<'_> {
    let lines = match view.inspection() {
        Some(Inspection::Node(info)) => {
            let mut lines = vec![
                Line::from(Span::styled(info.title, Theme::accent_cyan())),
                Line::from(format!("activation: {:.4}", info.value)),
            ];
            lines.extend(info.formula.map(Line::from));
            lines.extend(info.activation.map(Line::from));
            lines
        }
        Some(Inspection::Edge(info)) => {
            let weight_style = Style::default().fg(Theme::weight(info.weight));
            vec![
                Line::from(Span::styled(info.title, Theme::accent_cyan())),
                Line::from(Span::styled(format!("weight: {:.4}", info.weight), weight_style)),
                Line::from(format!("signal: {:.4}", info.signal)),
                Line::from(format!("contribution: {:.4}", info.contribution)),
            ]
        }
        None => vec![Line::from(Span::styled("nothing selected", Theme::muted()))],
    };

    Paragraph::new(lines)
        .style(Theme::text())
        .block(panel("Inspector"))
        .wrap(Wrap { trim: true })
}

pub fn logs(view: &SessionView) -> Paragraph<'_> {
    let tail = view.logs.iter().rev().take(6).rev();

    let lines = tail
        .map(|l| {
            let style = match l.level {
                "WARN" => Theme::warn(),
                "ERROR" => Theme::error(),
                _ => Theme::dim(),
            };

            Line::from(vec![
                Span::styled(format!("[{}] ", l.level), style),
                Span::raw(l.message.as_str()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .style(Theme::text())
        .block(panel("Events"))
        .wrap(Wrap { trim: true })
}

pub fn help() -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "space start/pause · s step · r reset · +/- lr · ]/[ speed · 1-4 example · tab inspect · q back",
        Theme::muted(),
    ))
}
