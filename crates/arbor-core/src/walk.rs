use crate::{NodeRef, Value};

impl Value {
    /// Iterative depth-first pre-order traversal, the node itself included.
    ///
    /// The callback receives each node and its depth (0 for `self`) and
    /// steers the walk through its return value: positive continues, zero
    /// stops with an "incomplete" result, negative stops and is passed
    /// through. Returns 1 when every node was visited, otherwise the value
    /// that stopped the walk.
    pub fn walk<F>(&self, mut callback: F) -> i32
    where
        F: FnMut(NodeRef<'_>, usize) -> i32,
    {
        let rc = callback(
            NodeRef {
                key: None,
                value: self,
            },
            0,
        );
        if rc <= 0 {
            return rc;
        }
        let mut stack = vec![self.children()];
        while let Some(top) = stack.last_mut() {
            match top.next() {
                Some(child) => {
                    let rc = callback(child, stack.len());
                    if rc <= 0 {
                        return rc;
                    }
                    stack.push(child.value.children());
                }
                None => {
                    stack.pop();
                }
            }
        }
        1
    }

    /// Number of edges from this node down to its deepest leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        self.walk(|_, depth| {
            if depth > height {
                height = depth;
            }
            1
        });
        height
    }

    /// Number of edges from this node down to `target`, which must be a
    /// node borrowed from this tree (identity, not equality).
    pub fn depth_of(&self, target: &Value) -> Option<usize> {
        let mut found = None;
        self.walk(|node, depth| {
            if std::ptr::eq(node.value, target) {
                found = Some(depth);
                0
            } else {
                1
            }
        });
        found
    }
}
