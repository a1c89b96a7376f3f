use neural_playground::{
    inspect::{self, EdgeInfo, Element, NodeInfo},
    ForwardResult, Snapshot,
};

/// A single log entry shown in the event panel.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// What the inspector panel points at, resolved against a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection {
    Node(NodeInfo),
    Edge(EdgeInfo),
}

/// Everything a single frame renders.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub snapshot: Snapshot,
    /// Which XOR example's forward pass the diagram shows.
    pub example: usize,
    /// The element under the inspector.
    pub inspected: Element,
    pub lessons_completed: usize,
    pub lessons_total: usize,
    pub logs: Vec<LogLine>,
}

impl SessionView {
    /// The displayed example's forward pass on the snapshot's parameters.
    pub fn pass(&self) -> ForwardResult {
        self.snapshot.pass_for(self.example)
    }

    /// Resolves the inspected element, `None` if it no longer exists.
    pub fn inspection(&self) -> Option<Inspection> {
        let pass = self.pass();
        let params = &self.snapshot.params;

        match self.inspected {
            Element::Node(node) => inspect::describe_node(node, params, &pass).map(Inspection::Node),
            Element::Edge(edge) => inspect::describe_edge(edge, params, &pass).map(Inspection::Edge),
        }
    }
}
