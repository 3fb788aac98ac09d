//! Invocation frames: identity and calling chain of one unit invocation.
//!
//! A frame is built from its parent's frame when a unit composes another, so
//! nesting depth and the calling chain come from explicit threading rather
//! than stack inspection. Frames feed diagnostics only.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Frame {
    name: &'static str,
    id: Uuid,
    chain: Vec<&'static str>,
}

impl Frame {
    /// Frame for a top-level invocation.
    pub fn root(name: &'static str) -> Self {
        Self {
            name,
            id: Uuid::new_v4(),
            chain: Vec::new(),
        }
    }

    /// Frame for a unit invoked from within `self`.
    pub fn child(&self, name: &'static str) -> Self {
        let mut chain = self.chain.clone();
        chain.push(self.name);
        Self {
            name,
            id: Uuid::new_v4(),
            chain,
        }
    }

    pub(crate) fn enter(parent: Option<&Frame>, name: &'static str) -> Self {
        match parent {
            Some(parent) => parent.child(name),
            None => Frame::root(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of enclosing invocations.
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Enclosing unit names, outermost first.
    pub fn chain(&self) -> &[&'static str] {
        &self.chain
    }

    /// The immediately calling unit.
    pub fn caller(&self) -> Option<&'static str> {
        self.chain.last().copied()
    }

    /// Short marker for telling interleaved log lines apart, e.g. `(id#1f2e3d4c)`.
    pub fn id_marker(&self) -> String {
        let simple = self.id.simple().to_string();
        format!("(id#{})", &simple[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_extends_chain() {
        let root = Frame::root("Checkout");
        let payment = root.child("ChargeCard");
        let receipt = payment.child("SendReceipt");

        assert_eq!(root.depth(), 0);
        assert_eq!(root.caller(), None);
        assert_eq!(receipt.depth(), 2);
        assert_eq!(receipt.chain(), &["Checkout", "ChargeCard"]);
        assert_eq!(receipt.caller(), Some("ChargeCard"));
        assert_ne!(payment.id(), receipt.id());
    }

    #[test]
    fn test_id_marker_shape() {
        let marker = Frame::root("A").id_marker();
        assert!(marker.starts_with("(id#"));
        assert!(marker.ends_with(')'));
        assert_eq!(marker.len(), "(id#".len() + 8 + 1);
    }
}
