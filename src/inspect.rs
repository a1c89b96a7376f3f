use std::fmt::Write;

use crate::network::{ForwardResult, NetworkParams, INPUTS};

/// A neuron of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Input(usize),
    Hidden(usize),
    Output,
}

/// A connection between two neurons of adjacent layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeId {
    InputHidden { input: usize, hidden: usize },
    HiddenOutput { hidden: usize },
}

/// Anything the inspector can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

impl Element {
    /// Every element of a network with `hidden_units` hidden neurons, nodes
    /// first, layer by layer, then edges in the same order.
    pub fn all(hidden_units: usize) -> Vec<Element> {
        let nodes = (0..INPUTS)
            .map(NodeId::Input)
            .chain((0..hidden_units).map(NodeId::Hidden))
            .chain([NodeId::Output])
            .map(Element::Node);

        let edges = (0..hidden_units)
            .flat_map(|hidden| (0..INPUTS).map(move |input| EdgeId::InputHidden { input, hidden }))
            .chain((0..hidden_units).map(|hidden| EdgeId::HiddenOutput { hidden }))
            .map(Element::Edge);

        nodes.chain(edges).collect()
    }
}

impl NodeId {
    pub fn title(self) -> String {
        match self {
            NodeId::Input(i) => format!("Input x{}", i + 1),
            NodeId::Hidden(i) => format!("Hidden neuron {}", i + 1),
            NodeId::Output => "Output neuron".to_string(),
        }
    }
}

impl EdgeId {
    pub fn title(self) -> String {
        match self {
            EdgeId::InputHidden { input, hidden } => {
                format!("x{} → hidden {}", input + 1, hidden + 1)
            }
            EdgeId::HiddenOutput { hidden } => format!("hidden {} → output", hidden + 1),
        }
    }
}

/// What the inspector shows for a neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub title: String,
    /// The neuron's output for the inspected pass.
    pub value: f64,
    /// The weighted sum, e.g. `z = (0.50 × 0.40) + (0.80 × 0.60) + 0.10 = 0.780`.
    pub formula: Option<String>,
    /// The squashing step, e.g. `σ(0.780) = 0.6857`.
    pub activation: Option<String>,
}

/// What the inspector shows for a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInfo {
    pub title: String,
    pub weight: f64,
    /// The activation travelling along the connection.
    pub signal: f64,
    /// `signal × weight`.
    pub contribution: f64,
}

/// Describes `node` for the forward pass `pass` computed on `params`.
///
/// Returns `None` if `node` doesn't exist in this network.
pub fn describe_node(node: NodeId, params: &NetworkParams, pass: &ForwardResult) -> Option<NodeInfo> {
    let info = match node {
        NodeId::Input(i) => NodeInfo {
            title: node.title(),
            value: *pass.inputs.get(i)?,
            formula: None,
            activation: None,
        },
        NodeId::Hidden(i) => {
            let weights = params.hidden_weights().get(i)?;
            let z = *pass.hidden_pre.get(i)?;
            let a = *pass.hidden.get(i)?;

            NodeInfo {
                title: node.title(),
                value: a,
                formula: Some(weighted_sum(
                    pass.inputs.iter().copied().zip(weights.iter().copied()),
                    params.hidden_biases()[i],
                    z,
                )),
                activation: Some(squash(z, a)),
            }
        }
        NodeId::Output => NodeInfo {
            title: node.title(),
            value: pass.output,
            formula: Some(weighted_sum(
                pass.hidden
                    .iter()
                    .copied()
                    .zip(params.output_weights().iter().copied()),
                params.output_bias(),
                pass.output_pre,
            )),
            activation: Some(squash(pass.output_pre, pass.output)),
        },
    };

    Some(info)
}

/// Describes `edge` for the forward pass `pass` computed on `params`.
///
/// Returns `None` if `edge` doesn't exist in this network.
pub fn describe_edge(edge: EdgeId, params: &NetworkParams, pass: &ForwardResult) -> Option<EdgeInfo> {
    let (weight, signal) = match edge {
        EdgeId::InputHidden { input, hidden } => (
            *params.hidden_weights().get(hidden)?.get(input)?,
            pass.inputs[input],
        ),
        EdgeId::HiddenOutput { hidden } => {
            (*params.output_weights().get(hidden)?, *pass.hidden.get(hidden)?)
        }
    };

    Some(EdgeInfo {
        title: edge.title(),
        weight,
        signal,
        contribution: signal * weight,
    })
}

fn weighted_sum(terms: impl Iterator<Item = (f64, f64)>, bias: f64, z: f64) -> String {
    let mut formula = String::from("z = ");
    for (signal, weight) in terms {
        let _ = write!(formula, "({signal:.2} × {weight:.2}) + ");
    }

    if bias < 0. {
        let _ = write!(formula, "({bias:.2}) = {z:.3}");
    } else {
        let _ = write!(formula, "{bias:.2} = {z:.3}");
    }

    formula
}

fn squash(z: f64, a: f64) -> String {
    format!("σ({z:.3}) = {a:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_example() -> NetworkParams {
        NetworkParams::new(
            vec![[0.4, 0.6], [0.2, -0.5], [-0.3, 0.8]],
            vec![0.1, -0.2, 0.3],
            vec![0.4, 0.3, 0.5],
            0.1,
        )
        .unwrap()
    }

    #[test]
    fn element_order() {
        let all = Element::all(2);

        assert_eq!(all.len(), 2 + 2 + 1 + 2 * 2 + 2);
        assert_eq!(all[0], Element::Node(NodeId::Input(0)));
        assert_eq!(all[4], Element::Node(NodeId::Output));
        assert_eq!(
            all[5],
            Element::Edge(EdgeId::InputHidden {
                input: 0,
                hidden: 0
            })
        );
        assert_eq!(all[10], Element::Edge(EdgeId::HiddenOutput { hidden: 1 }));
    }

    #[test]
    fn hidden_node_formula() {
        let params = worked_example();
        let pass = params.forward([0.5, 0.8]);
        let info = describe_node(NodeId::Hidden(0), &params, &pass).unwrap();

        assert_eq!(info.title, "Hidden neuron 1");
        assert_eq!(
            info.formula.as_deref(),
            Some("z = (0.50 × 0.40) + (0.80 × 0.60) + 0.10 = 0.780")
        );
        assert_eq!(info.activation.as_deref(), Some("σ(0.780) = 0.6857"));
    }

    #[test]
    fn negative_bias_in_parens() {
        let params = worked_example();
        let pass = params.forward([0.5, 0.8]);
        let info = describe_node(NodeId::Hidden(1), &params, &pass).unwrap();

        let formula = info.formula.unwrap();
        assert!(formula.starts_with("z = (0.50 × 0.20) + (0.80 × -0.50) + (-0.20) = "));
    }

    #[test]
    fn input_node_has_no_formula() {
        let params = worked_example();
        let pass = params.forward([0.5, 0.8]);
        let info = describe_node(NodeId::Input(1), &params, &pass).unwrap();

        assert_eq!(info.value, 0.8);
        assert!(info.formula.is_none());
        assert!(describe_node(NodeId::Input(2), &params, &pass).is_none());
        assert!(describe_node(NodeId::Hidden(3), &params, &pass).is_none());
    }

    #[test]
    fn output_node_matches_pass() {
        let params = worked_example();
        let pass = params.forward([0.5, 0.8]);
        let info = describe_node(NodeId::Output, &params, &pass).unwrap();

        assert_eq!(info.value, pass.output);
        assert!(info.formula.unwrap().ends_with(&format!("0.10 = {:.3}", pass.output_pre)));
    }

    #[test]
    fn edge_contribution() {
        let params = worked_example();
        let pass = params.forward([0.5, 0.8]);

        let edge = EdgeId::InputHidden {
            input: 1,
            hidden: 2,
        };
        let info = describe_edge(edge, &params, &pass).unwrap();
        assert_eq!(info.weight, 0.8);
        assert_eq!(info.signal, 0.8);
        assert_eq!(info.contribution, 0.8 * 0.8);

        let info = describe_edge(EdgeId::HiddenOutput { hidden: 0 }, &params, &pass).unwrap();
        assert_eq!(info.signal, pass.hidden[0]);
        assert_eq!(info.contribution, pass.hidden[0] * 0.4);

        assert!(describe_edge(EdgeId::HiddenOutput { hidden: 3 }, &params, &pass).is_none());
    }
}
