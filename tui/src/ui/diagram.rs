use neural_playground::{
    inspect::{EdgeId, Element, NodeId},
    network::INPUTS,
};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Context, Line},
        Block, Borders,
    },
    Frame,
};

use crate::state::model::SessionView;

use super::theme::Theme;

/// Below this inner size the diagram isn't drawn at all.
pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 8;

const LAYER_X: [f64; 3] = [12., 50., 88.];
const TOP: f64 = 85.;
const BOTTOM: f64 = 15.;
const NODE_RADIUS: f64 = 4.;
const STROKE_GAP: f64 = 0.8;

/// Vertical positions of `n` nodes stacked in a layer, top to bottom.
pub fn layer_ys(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![(TOP + BOTTOM) / 2.],
        _ => {
            let step = (TOP - BOTTOM) / (n - 1) as f64;
            (0..n).map(|i| TOP - i as f64 * step).collect()
        }
    }
}

/// How many parallel strokes draw an edge of weight `w`.
pub fn stroke_count(w: f64) -> usize {
    let magnitude = w.abs();
    if magnitude >= 2.5 {
        3
    } else if magnitude >= 1. {
        2
    } else {
        1
    }
}

pub fn fits(area: Rect) -> bool {
    area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeMark {
    pub at: (f64, f64),
    pub activation: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: (f64, f64),
    pub text: String,
    pub style: Style,
}

/// Everything the canvas paints for one frame, in canvas coordinates.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub strokes: Vec<Stroke>,
    pub nodes: Vec<NodeMark>,
    pub labels: Vec<Label>,
}

impl Scene {
    pub fn build(view: &SessionView) -> Self {
        let params = &view.snapshot.params;
        let pass = view.pass();
        let h = params.hidden_units();

        let input_ys = layer_ys(INPUTS);
        let hidden_ys = layer_ys(h);
        let output_y = layer_ys(1)[0];

        let input_at = |i: usize| (LAYER_X[0], input_ys[i]);
        let hidden_at = |i: usize| (LAYER_X[1], hidden_ys[i]);
        let output_at = (LAYER_X[2], output_y);

        let mut scene = Scene::default();

        for (j, row) in params.hidden_weights().iter().enumerate() {
            for (i, &w) in row.iter().enumerate() {
                let edge = EdgeId::InputHidden {
                    input: i,
                    hidden: j,
                };
                scene.edge(input_at(i), hidden_at(j), w, view.inspected == Element::Edge(edge));
            }
        }

        for (j, &w) in params.output_weights().iter().enumerate() {
            let edge = EdgeId::HiddenOutput { hidden: j };
            scene.edge(hidden_at(j), output_at, w, view.inspected == Element::Edge(edge));
        }

        let nodes = (0..INPUTS)
            .map(|i| (NodeId::Input(i), input_at(i), pass.inputs[i]))
            .chain((0..h).map(|j| (NodeId::Hidden(j), hidden_at(j), pass.hidden[j])))
            .chain([(NodeId::Output, output_at, pass.output)]);

        for (id, at, activation) in nodes {
            scene.nodes.push(NodeMark {
                at,
                activation,
                selected: view.inspected == Element::Node(id),
            });
            scene.label((at.0 - 3., at.1 - NODE_RADIUS - 3.), format!("{activation:.2}"), Theme::dim());
        }

        for (x, name) in LAYER_X.into_iter().zip(["input", "hidden", "output"]) {
            scene.label((x - 3., 97.), name.to_string(), Theme::title());
        }

        let state = &view.snapshot.state;
        if state.converged {
            scene.label((30., 3.), format!("converged at epoch {}", state.epoch), Theme::ok());
        }

        scene
    }

    fn edge(&mut self, from: (f64, f64), to: (f64, f64), w: f64, selected: bool) {
        let color = if selected {
            Theme::SELECTED
        } else {
            Theme::weight(w)
        };

        let n = stroke_count(w);
        for k in 0..n {
            let dy = (k as f64 - (n - 1) as f64 / 2.) * STROKE_GAP;
            self.strokes.push(Stroke {
                from: (from.0, from.1 + dy),
                to: (to.0, to.1 + dy),
                color,
            });
        }
    }

    fn label(&mut self, at: (f64, f64), text: String, style: Style) {
        self.labels.push(Label { at, text, style });
    }

    fn paint(&self, ctx: &mut Context) {
        for s in &self.strokes {
            ctx.draw(&Line {
                x1: s.from.0,
                y1: s.from.1,
                x2: s.to.0,
                y2: s.to.1,
                color: s.color,
            });
        }
        ctx.layer();

        for n in &self.nodes {
            let color = Theme::activation(n.activation);
            for scale in [1., 0.66, 0.33] {
                ctx.draw(&Circle {
                    x: n.at.0,
                    y: n.at.1,
                    radius: NODE_RADIUS * scale,
                    color,
                });
            }

            if n.selected {
                ctx.draw(&Circle {
                    x: n.at.0,
                    y: n.at.1,
                    radius: NODE_RADIUS + 1.5,
                    color: Theme::SELECTED,
                });
            }
        }
        ctx.layer();

        for l in &self.labels {
            ctx.print(l.at.0, l.at.1, Span::styled(l.text.clone(), l.style));
        }
    }
}

/// Draws the network for the view's displayed example. Skipped when `area` is too small.
pub fn render(f: &mut Frame, area: Rect, view: &SessionView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(
            format!("Network · example {}", view.example + 1),
            Theme::title(),
        ));

    if !fits(block.inner(area)) {
        return;
    }

    let scene = Scene::build(view);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(Theme::BG)
        .x_bounds([0., 100.])
        .y_bounds([0., 100.])
        .paint(move |ctx| scene.paint(ctx));

    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use neural_playground::{
        network::{Network, NetworkParams},
        Speed, Trainer,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn view(params: NetworkParams) -> SessionView {
        let trainer = Trainer::from_network(
            Network::from_params(params),
            0.5,
            StdRng::seed_from_u64(0),
        );

        SessionView {
            snapshot: trainer.snapshot(false, Speed::default()),
            example: 3,
            inspected: Element::Node(NodeId::Output),
            lessons_completed: 0,
            lessons_total: 17,
            logs: Vec::new(),
        }
    }

    fn mixed() -> NetworkParams {
        NetworkParams::new(
            vec![[0.4, -1.5], [3., -0.2], [-0.1, 0.1]],
            vec![0., 0., 0.],
            vec![0.5, -2.7, 1.2],
            0.,
        )
        .unwrap()
    }

    fn text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn thickness_is_monotonic() {
        let counts: Vec<_> = [0., 0.5, 0.99, 1., 2., 2.5, 10.]
            .into_iter()
            .map(stroke_count)
            .collect();

        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(counts.first(), Some(&1));
        assert_eq!(counts.last(), Some(&3));
        assert_eq!(stroke_count(-3.), stroke_count(3.));
    }

    #[test]
    fn layer_positions() {
        assert_eq!(layer_ys(1), vec![50.]);
        let ys = layer_ys(4);
        assert_eq!(ys.len(), 4);
        assert_eq!(ys[0], TOP);
        assert_eq!(ys[3], BOTTOM);
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn scene_colors_and_strokes() {
        let scene = Scene::build(&view(mixed()));

        assert_eq!(scene.nodes.len(), 2 + 3 + 1);

        // |w| per edge: 0.4, 1.5, 3, 0.2, 0.1, 0.1, 0.5, 2.7, 1.2
        assert_eq!(scene.strokes.len(), 1 + 2 + 3 + 1 + 1 + 1 + 1 + 3 + 2);

        let red = scene.strokes.iter().filter(|s| s.color == Theme::NEGATIVE).count();
        // -1.5, -0.2, -0.1 and -2.7
        assert_eq!(red, 2 + 1 + 1 + 3);
    }

    #[test]
    fn selection_is_highlighted() {
        let mut v = view(mixed());
        v.inspected = Element::Edge(EdgeId::HiddenOutput { hidden: 1 });
        let scene = Scene::build(&v);

        let selected = scene.strokes.iter().filter(|s| s.color == Theme::SELECTED).count();
        assert_eq!(selected, 3);
        assert!(scene.nodes.iter().all(|n| !n.selected));
    }

    #[test]
    fn renders_labels() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let v = view(mixed());
        terminal.draw(|f| render(f, f.size(), &v)).unwrap();

        let text = text(&terminal);
        assert!(text.contains("hidden"));
        assert!(text.contains("output"));
        assert!(text.contains("example 4"));
    }

    #[test]
    fn banner_when_converged() {
        let mut v = view(mixed());
        v.snapshot.state.converged = true;
        v.snapshot.state.epoch = 1234;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, f.size(), &v)).unwrap();

        assert!(text(&terminal).contains("converged at epoch 1234"));
    }

    #[test]
    fn too_small_is_skipped() {
        let mut terminal = Terminal::new(TestBackend::new(12, 5)).unwrap();
        let v = view(mixed());
        terminal.draw(|f| render(f, f.size(), &v)).unwrap();

        assert!(text(&terminal).chars().all(|c| c == ' '));
    }

    #[test]
    fn random_networks_render() {
        let mut rng = StdRng::seed_from_u64(5);
        for h in [1, 4, 8] {
            let network = Network::new(NonZeroUsize::new(h).unwrap(), &mut rng);
            let v = view(network.params().clone());

            let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
            terminal.draw(|f| render(f, f.size(), &v)).unwrap();
            assert_eq!(Scene::build(&v).nodes.len(), INPUTS + h + 1);
        }
    }
}
