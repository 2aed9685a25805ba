use crate::Value;

/// Byte-for-byte comparison of a member key against an escaped path
/// segment: a literal `~` in the key matches only `~0`, a literal `/`
/// only `~1`.
fn key_matches(key: &str, segment: &str) -> bool {
    let segment = segment.as_bytes();
    let mut at = 0;
    for &byte in key.as_bytes() {
        let escape = match byte {
            b'~' => Some(b'0'),
            b'/' => Some(b'1'),
            _ => None,
        };
        match escape {
            Some(second) => {
                if segment.get(at) != Some(&b'~') || segment.get(at + 1) != Some(&second) {
                    return false;
                }
                at += 2;
            }
            None => {
                if segment.get(at) != Some(&byte) {
                    return false;
                }
                at += 1;
            }
        }
    }
    at == segment.len()
}

fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl Value {
    /// Locate a node by RFC 6901 pointer, relative to this node.
    ///
    /// The empty path returns the node itself; `"/"` selects the object
    /// member whose key is empty. Object segments match keys with `~0`/`~1`
    /// escaping; array segments are non-negative decimal indices. Returns
    /// `None` on any miss.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.strip_prefix('/')?.split('/') {
            node = match node {
                Value::Object(members) => {
                    let (_, value) = members.iter().find(|(key, _)| key_matches(key, segment))?;
                    value
                }
                Value::Array(elements) => elements.get(array_index(segment)?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Mutable twin of [`pointer`][Self::pointer].
    pub fn pointer_mut(&mut self, path: &str) -> Option<&mut Value> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.strip_prefix('/')?.split('/') {
            node = match node {
                Value::Object(members) => {
                    let (_, value) = members
                        .iter_mut()
                        .find(|(key, _)| key_matches(key, segment))?;
                    value
                }
                Value::Array(elements) => elements.get_mut(array_index(segment)?)?,
                _ => return None,
            };
        }
        Some(node)
    }
}
