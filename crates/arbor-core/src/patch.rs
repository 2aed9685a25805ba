use crate::Value;

/// Returned when either side of a patch is not an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("patch requires two objects")]
pub struct PatchError;

fn position(members: &[(String, Value)], key: &str) -> Option<usize> {
    members.iter().position(|(k, _)| k == key)
}

/// Merge `source` into `target`, object into object.
///
/// Walking the source members in order: a key absent from the target is
/// moved and appended to it; a key present in the target swaps payloads, so
/// the target takes the source's value and the source keeps the target's
/// previous one for a later [`unpatch`]. Keys duplicated inside the source
/// collapse — the later occurrence wins and the earlier entry is dropped.
///
/// Returns the number of members moved into the target, the count
/// [`unpatch`] needs to undo exactly those.
pub fn patch(target: &mut Value, source: &mut Value) -> Result<usize, PatchError> {
    let (Value::Object(target), Value::Object(source)) = (target, source) else {
        return Err(PatchError);
    };
    let mut inserts = 0;
    let mut count = 0;
    while count < source.len() {
        match position(target, &source[count].0) {
            None => {
                target.push(source.remove(count));
                inserts += 1;
            }
            Some(found) => {
                let (left, right) = (&mut target[found].1, &mut source[count].1);
                std::mem::swap(left, right);
                match position(source, &target[found].0) {
                    Some(first) if first != count => {
                        // An earlier duplicate of this key already ran; keep
                        // the later value and drop the stale entry.
                        source.swap(first, count);
                        source.remove(first);
                    }
                    _ => count += 1,
                }
            }
        }
    }
    Ok(inserts)
}

/// Undo a [`patch`]: swap the surviving source payloads back into the
/// target, draining the source, then detach the last `inserts` members the
/// patch appended.
pub fn unpatch(target: &mut Value, source: &mut Value, inserts: usize) -> Result<(), PatchError> {
    let (Value::Object(target), Value::Object(source)) = (target, source) else {
        return Err(PatchError);
    };
    while let Some(last) = source.last_mut() {
        if let Some(found) = target.iter().position(|(k, _)| *k == last.0) {
            std::mem::swap(&mut target[found].1, &mut last.1);
        }
        source.pop();
    }
    for _ in 0..inserts {
        if target.pop().is_none() {
            break;
        }
    }
    Ok(())
}
