use crate::event::{render, Event, EventKind, Segment};
use crate::keyword::{check, find_sibling, Composite, Outcome};
use crate::Registry;
use arbor_core::Value;
use regex::Regex;

/// Depth cap over schema nesting and `$ref` hops, guarding reference
/// cycles that slip past the skip sentinel.
const MAX_DEPTH: usize = 1024;

struct Aborted;

fn rules_of(schema: &Value) -> &[(String, Value)] {
    schema.members().map(Vec::as_slice).unwrap_or(&[])
}

/// Validate `node` against `schema`, reporting every event to `callback`.
///
/// The callback returns `false` to abort evaluation. Returns `true` only if
/// no [`Invalid`][EventKind::Invalid] or [`Error`][EventKind::Error] event
/// was reported and the callback never aborted.
pub fn validate<'a, F>(node: &'a Value, schema: &'a Value, registry: &'a Registry, callback: F) -> bool
where
    F: FnMut(&Event<'a>) -> bool,
{
    let mut validator = Validator {
        registry,
        callback,
        path: Vec::new(),
        skip: None,
        depth: 0,
    };
    if !schema.is_object() {
        let _ = validator.emit(EventKind::Error, Some(node), "", schema);
        return false;
    }
    match validator.eval(Some(node), rules_of(schema), schema, true) {
        Ok(valid) => valid,
        Err(Aborted) => false,
    }
}

/// [`validate`] with a callback that never aborts, for callers that only
/// want the verdict.
pub fn is_valid(node: &Value, schema: &Value, registry: &Registry) -> bool {
    validate(node, schema, registry, |_| true)
}

struct Validator<'a, F> {
    registry: &'a Registry,
    callback: F,
    path: Vec<Segment<'a>>,
    /// One-slot sentinel breaking `$ref` cycles during dry evaluation.
    skip: Option<*const Value>,
    depth: usize,
}

impl<'a, F> Validator<'a, F>
where
    F: FnMut(&Event<'a>) -> bool,
{
    fn emit(
        &mut self,
        kind: EventKind,
        node: Option<&'a Value>,
        keyword: &'a str,
        rule: &'a Value,
    ) -> Result<(), Aborted> {
        let event = Event {
            kind,
            node,
            keyword,
            rule,
            path: render(&self.path),
        };
        let keep_going = (self.callback)(&event);
        if !keep_going || kind == EventKind::Error {
            Err(Aborted)
        } else {
            Ok(())
        }
    }

    fn eval_schema(
        &mut self,
        node: Option<&'a Value>,
        schema: &'a Value,
        root: &'a Value,
        assertive: bool,
    ) -> Result<bool, Aborted> {
        self.eval(node, rules_of(schema), root, assertive)
    }

    /// Shape-check a sub-schema with no node attached.
    fn dry(&mut self, schema: &'a Value, root: &'a Value) -> Result<(), Aborted> {
        self.eval_schema(None, schema, root, false).map(|_| ())
    }

    fn eval(
        &mut self,
        node: Option<&'a Value>,
        rules: &'a [(String, Value)],
        root: &'a Value,
        assertive: bool,
    ) -> Result<bool, Aborted> {
        self.depth += 1;
        let result = self.eval_rules(node, rules, root, assertive);
        self.depth -= 1;
        result
    }

    fn eval_rules(
        &mut self,
        node: Option<&'a Value>,
        rules: &'a [(String, Value)],
        root: &'a Value,
        assertive: bool,
    ) -> Result<bool, Aborted> {
        if self.depth > MAX_DEPTH {
            self.emit(EventKind::Error, node, "", root)?;
            return Ok(false); // not reached: an error event always aborts
        }
        let mut valid = true;
        let mut index = 0;
        while index < rules.len() {
            let (name, rule) = &rules[index];
            index += 1;
            match check(name, node, rule, rules) {
                None => self.emit(EventKind::Warning, node, name, rule)?,
                Some(Outcome::Valid) => {}
                Some(Outcome::Invalid) => {
                    if assertive {
                        self.emit(EventKind::Invalid, node, name, rule)?;
                    }
                    valid = false;
                }
                Some(Outcome::Error) => self.emit(EventKind::Error, node, name, rule)?,
                Some(Outcome::Composite(composite)) => {
                    valid &= self.composite(
                        composite, node, name, rule, rules, &mut index, root, assertive,
                    )?;
                }
            }
        }
        Ok(valid)
    }

    #[allow(clippy::too_many_arguments)]
    fn composite(
        &mut self,
        composite: Composite,
        node: Option<&'a Value>,
        name: &'a str,
        rule: &'a Value,
        rules: &'a [(String, Value)],
        index: &mut usize,
        root: &'a Value,
        assertive: bool,
    ) -> Result<bool, Aborted> {
        match composite {
            Composite::Ref => self.follow_ref(node, name, rule, root, assertive),
            Composite::DependentSchemas => {
                let mut valid = true;
                for (key, sub) in rules_of(rule) {
                    let applies = node
                        .filter(|node| node.is_object())
                        .map_or(false, |node| node.has(key));
                    if applies {
                        valid &= self.eval_schema(node, sub, root, assertive)?;
                    } else {
                        self.dry(sub, root)?;
                    }
                }
                Ok(valid)
            }
            Composite::Properties => {
                let object = node.filter(|node| node.is_object());
                let mut valid = true;
                for (property, sub) in rules_of(rule) {
                    let mut present = false;
                    for (key, child) in object.and_then(Value::members).into_iter().flatten() {
                        if key == property {
                            present = true;
                            self.path.push(Segment::Key(key.as_str()));
                            let child_valid = self.eval_schema(Some(child), sub, root, assertive);
                            self.path.pop();
                            valid &= child_valid?;
                        }
                    }
                    if !present {
                        self.dry(sub, root)?;
                    }
                }
                Ok(valid)
            }
            Composite::PatternProperties => {
                let mut valid = true;
                for (pattern, sub) in rules_of(rule) {
                    let Ok(regex) = Regex::new(pattern) else {
                        self.emit(EventKind::Error, node, name, rule)?;
                        return Ok(false); // not reached
                    };
                    let mut matched = false;
                    for (key, child) in node.and_then(Value::members).into_iter().flatten() {
                        if regex.is_match(key) {
                            matched = true;
                            self.path.push(Segment::Key(key.as_str()));
                            let child_valid = self.eval_schema(Some(child), sub, root, assertive);
                            self.path.pop();
                            valid &= child_valid?;
                        }
                    }
                    if !matched {
                        self.dry(sub, root)?;
                    }
                }
                Ok(valid)
            }
            Composite::AdditionalProperties => {
                let properties = find_sibling(rules, "properties")
                    .filter(|properties| properties.is("object of optional objects"));
                let mut valid = true;
                let mut extras = 0;
                if let Some(properties) = properties {
                    for (key, child) in node.and_then(Value::members).into_iter().flatten() {
                        if !properties.has(key) {
                            extras += 1;
                            self.path.push(Segment::Key(key.as_str()));
                            let child_valid = self.eval_schema(Some(child), rule, root, assertive);
                            self.path.pop();
                            valid &= child_valid?;
                        }
                    }
                }
                if extras == 0 {
                    self.dry(rule, root)?;
                }
                Ok(valid)
            }
            Composite::Items => match node.and_then(Value::elements).filter(|e| !e.is_empty()) {
                Some(elements) => {
                    let mut valid = true;
                    for (at, element) in elements.iter().enumerate() {
                        self.path.push(Segment::Index(at));
                        let element_valid = self.eval_schema(Some(element), rule, root, assertive);
                        self.path.pop();
                        valid &= element_valid?;
                    }
                    Ok(valid)
                }
                None => {
                    self.dry(rule, root)?;
                    Ok(true)
                }
            },
            Composite::Tuples => {
                let subs = rule.elements().map(Vec::as_slice).unwrap_or(&[]);
                let elements = node.and_then(Value::elements).filter(|e| !e.is_empty());
                match elements {
                    None => {
                        for sub in subs {
                            self.dry(sub, root)?;
                        }
                        Ok(true)
                    }
                    Some(elements) => {
                        let mut valid = true;
                        for (at, sub) in subs.iter().enumerate() {
                            match elements.get(at) {
                                Some(element) => {
                                    self.path.push(Segment::Index(at));
                                    let element_valid =
                                        self.eval_schema(Some(element), sub, root, assertive);
                                    self.path.pop();
                                    valid &= element_valid?;
                                }
                                None => self.dry(sub, root)?,
                            }
                        }
                        Ok(valid)
                    }
                }
            }
            Composite::AdditionalItems => {
                let tuple = find_sibling(rules, "items")
                    .filter(|items| items.is("array of optional objects"));
                let elements = node.and_then(Value::elements);
                match (elements, tuple) {
                    (Some(elements), Some(tuple)) if tuple.size() < elements.len() => {
                        let mut valid = true;
                        for (at, element) in elements.iter().enumerate().skip(tuple.size()) {
                            self.path.push(Segment::Index(at));
                            let element_valid =
                                self.eval_schema(Some(element), rule, root, assertive);
                            self.path.pop();
                            valid &= element_valid?;
                        }
                        Ok(valid)
                    }
                    _ => {
                        self.dry(rule, root)?;
                        Ok(true)
                    }
                }
            }
            Composite::Not => {
                let passed = !self.eval_schema(node, rule, root, false)?;
                if passed {
                    Ok(true)
                } else {
                    if assertive {
                        self.emit(EventKind::Invalid, node, name, rule)?;
                    }
                    Ok(false)
                }
            }
            Composite::AllOf | Composite::AnyOf | Composite::OneOf => {
                let branches = rule.elements().map(Vec::as_slice).unwrap_or(&[]);
                let mut passing = 0usize;
                for branch in branches {
                    if self.eval_schema(node, branch, root, false)? {
                        passing += 1;
                    }
                }
                let passed = branches.is_empty()
                    || match composite {
                        Composite::AllOf => passing == branches.len(),
                        Composite::AnyOf => passing > 0,
                        _ => passing == 1,
                    };
                if passed {
                    Ok(true)
                } else {
                    if assertive {
                        self.emit(EventKind::Invalid, node, name, rule)?;
                    }
                    Ok(false)
                }
            }
            Composite::If => {
                let condition = self.eval_schema(node, rule, root, false)?;
                let mut valid = true;
                // Every then/else directly following the if binds to it.
                while *index < rules.len() {
                    let (next_name, next_rule) = &rules[*index];
                    let applies = match next_name.as_str() {
                        "then" if next_rule.is_object() => condition,
                        "else" if next_rule.is_object() => !condition,
                        _ => break,
                    };
                    *index += 1;
                    if applies {
                        valid &= self.eval_schema(node, next_rule, root, assertive)?;
                    } else {
                        self.dry(next_rule, root)?;
                    }
                }
                Ok(valid)
            }
            // A then/else with no preceding if is only shape-checked.
            Composite::ThenOrElse => {
                self.dry(rule, root)?;
                Ok(true)
            }
        }
    }

    fn follow_ref(
        &mut self,
        node: Option<&'a Value>,
        name: &'a str,
        rule: &'a Value,
        root: &'a Value,
        assertive: bool,
    ) -> Result<bool, Aborted> {
        let reference = rule.as_str().unwrap_or_default();
        let (next_root, target) = if let Some(pointer) = reference.strip_prefix('#') {
            let target = if pointer.is_empty() {
                Some(root)
            } else {
                root.pointer(pointer)
            };
            (root, target)
        } else {
            let (id, pointer) = match reference.split_once('#') {
                Some((id, pointer)) => (id, Some(pointer)),
                None => (reference, None),
            };
            match self.registry.get(id) {
                None => (root, None),
                Some(document) => {
                    let target = match pointer {
                        None | Some("") => Some(document),
                        Some(pointer) => document.pointer(pointer),
                    };
                    (document, target)
                }
            }
        };
        let Some(target) = target.filter(|target| target.is_object()) else {
            self.emit(EventKind::Error, node, name, rule)?;
            return Ok(false); // not reached
        };
        if node.is_none() {
            let marker = rule as *const Value;
            if self.skip == Some(marker) {
                // Second dry visit of the same reference; cut the cycle.
                self.skip = None;
                return Ok(true);
            }
            if self.skip.is_none() {
                self.skip = Some(marker);
            }
        } else {
            self.skip = None;
        }
        self.eval_schema(node, target, next_root, assertive)
    }
}
