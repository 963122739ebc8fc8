//! Run-scoped variable environment that templates resolve against.

use serde_json::{json, Map, Value};

/// Root namespaces: `trigger`, plus one `<stepId>` per succeeded step holding
/// `{ "output": ... }`. Failed steps never get a binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    roots: Map<String, Value>,
}

impl ExecutionContext {
    pub fn new(trigger: Map<String, Value>) -> Self {
        let mut roots = Map::new();
        roots.insert("trigger".to_owned(), Value::Object(trigger));
        Self { roots }
    }

    pub fn bind_step_output(&mut self, step_id: &str, output: Map<String, Value>) {
        self.roots
            .insert(step_id.to_owned(), json!({ "output": output }));
    }

    /// Walk a dot-separated path from the roots. Numeric segments index
    /// into arrays. Any miss yields `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let root = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.roots.get(root)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExecutionContext {
        let trigger = json!({ "phone": "0912", "items": [{ "sku": "A1" }], "gone": null });
        ExecutionContext::new(trigger.as_object().cloned().unwrap())
    }

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let ctx = ctx();
        assert_eq!(ctx.lookup("trigger.phone"), Some(&json!("0912")));
        assert_eq!(ctx.lookup("trigger.items.0.sku"), Some(&json!("A1")));
        assert_eq!(ctx.lookup("trigger.gone"), Some(&Value::Null));
    }

    #[test]
    fn lookup_misses_are_none() {
        let ctx = ctx();
        assert_eq!(ctx.lookup("trigger.nope"), None);
        assert_eq!(ctx.lookup("trigger.items.7"), None);
        assert_eq!(ctx.lookup("trigger.items.x"), None);
        assert_eq!(ctx.lookup("trigger.phone.length"), None);
        assert_eq!(ctx.lookup("s1.output.id"), None);
        assert_eq!(ctx.lookup(""), None);
    }

    #[test]
    fn step_outputs_live_under_output() {
        let mut ctx = ctx();
        ctx.bind_step_output("s1", json!({ "id": "c1" }).as_object().cloned().unwrap());
        assert_eq!(ctx.lookup("s1"), Some(&json!({ "output": { "id": "c1" } })));
        assert_eq!(ctx.lookup("s1.output.id"), Some(&json!("c1")));
        assert_eq!(ctx.lookup("s1.id"), None);
    }
}
