//! Text rendering of a network as indented trees.
//!
//! ```text
//! [S]Source +-> [X]Split +-> [A]Sink
//!                        +-> [B]Sink
//! ```

use std::collections::HashSet;
use std::fmt;

use hn_core::ElementId;

use crate::element::ElementKind;
use crate::network::Network;

impl Network {
    /// Render one tree per root (element nothing feeds), in insertion order.
    ///
    /// Elements no root reaches, such as a loop nothing feeds, start trees of
    /// their own afterwards. Empty slots are drawn as `+-> *`, sinks show no
    /// outputs and a branch that loops back ends in `...`.
    pub fn layout(&self) -> String {
        let mut trees = TreeWriter {
            network: self,
            on_path: HashSet::new(),
            drawn: HashSet::new(),
        };
        let mut out: Vec<String> = self
            .iter()
            .filter(|e| self.predecessors(e.id()).is_empty())
            .map(|e| trees.render(e.id()))
            .collect();
        for element in self.iter() {
            if !trees.drawn.contains(&element.id()) {
                out.push(trees.render(element.id()));
            }
        }
        out.join("\n")
    }
}

struct TreeWriter<'a> {
    network: &'a Network,
    on_path: HashSet<ElementId>,
    drawn: HashSet<ElementId>,
}

impl TreeWriter<'_> {
    fn render(&mut self, id: ElementId) -> String {
        let network = self.network;
        let Some(element) = network.element(id) else {
            return format!("[{}]?", id);
        };
        self.drawn.insert(id);
        let head = format!("[{}]{} ", element.name(), element.kind());
        if element.kind() == ElementKind::Sink {
            return head.trim_end().to_string();
        }
        if !self.on_path.insert(id) {
            return format!("{}...", head);
        }

        let branches: Vec<String> = element
            .outputs()
            .iter()
            .map(|slot| match slot {
                Some(next) => pad("+-> ", &self.render(*next)),
                None => "+-> *".to_string(),
            })
            .collect();

        self.on_path.remove(&id);
        pad(&head, &branches.join("\n"))
    }
}

/// Append `down` to `current`, indenting every continuation line of `down`
/// to the width of `current`.
fn pad(current: &str, down: &str) -> String {
    let indent = format!("\n{}", " ".repeat(current.chars().count()));
    format!("{}{}", current, down.replace('\n', &indent))
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.layout())
    }
}
