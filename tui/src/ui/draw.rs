use ratatui::{widgets::Block, Frame};

use crate::state::model::SessionView;

use super::{diagram, layout, theme::Theme, widgets};

/// Draws the training screen from a single view.
pub fn draw(f: &mut Frame, view: &SessionView, show_logs: bool) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let (header_area, body_area, logs_area, help_area) = layout::vertical(area, show_logs);
    let (diagram_area, right_area) = layout::body(body_area);
    let (stats_area, predictions_area, inspector_area) = layout::right(right_area);

    f.render_widget(widgets::header(view), header_area);
    diagram::render(f, diagram_area, view);
    f.render_widget(widgets::stats(view), stats_area);
    f.render_widget(widgets::predictions_table(view), predictions_area);
    f.render_widget(widgets::inspector(view), inspector_area);

    if let Some(logs) = logs_area {
        f.render_widget(widgets::logs(view), logs);
    }

    f.render_widget(widgets::help(), help_area);
}
