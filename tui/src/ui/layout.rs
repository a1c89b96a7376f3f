use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computes the main layout regions.
///
/// # Returns
/// (header, body, logs_opt, help)
pub fn vertical(area: Rect, show_logs: bool) -> (Rect, Rect, Option<Rect>, Rect) {
    let constraints = if show_logs {
        vec![
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(1),
        ]
    } else {
        vec![Constraint::Length(4), Constraint::Min(10), Constraint::Length(1)]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let header = chunks[0];
    let body = chunks[1];
    let (logs, help) = if show_logs {
        (Some(chunks[2]), chunks[3])
    } else {
        (None, chunks[2])
    };

    (header, body, logs, help)
}

/// Splits body into (diagram, right).
pub fn body(area: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    (cols[0], cols[1])
}

/// Splits right into (stats, predictions, inspector).
pub fn right(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(5),
        ])
        .split(area);

    (rows[0], rows[1], rows[2])
}
