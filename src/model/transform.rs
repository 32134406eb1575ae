use crate::config::Configuration;
use crate::ids::{Namespace, local_name};

/// One invocable transform bound to exactly one input entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub id: String,
    /// Configuration key this transform was expanded from.
    pub key: String,
    pub command: String,
    pub parameters: String,
    pub display: String,
    pub desc: String,
    pub set: String,
    pub author: String,
    pub input: String,
    pub call: String,
}

/// Expand every `TransformSpec` into one `Transform` per accepted input type.
///
/// Order is configuration key order, then input declaration order.
pub fn expand_transforms(cfg: &Configuration, ns: &Namespace) -> Vec<Transform> {
    let mut out = Vec::new();
    for (key, spec) in &cfg.transforms {
        for entity in &spec.input {
            out.push(Transform {
                id: ns.transform_id(key, entity),
                key: key.clone(),
                command: cfg.command.clone(),
                parameters: parameters(&cfg.script, key, entity),
                display: spec.display.clone(),
                desc: spec.desc.clone(),
                set: spec.set.clone(),
                author: cfg.author.clone(),
                input: entity.clone(),
                call: spec.call.clone(),
            });
        }
    }
    out
}

/// Arguments the transform host appends to `command`.
fn parameters(script: &str, key: &str, entity: &str) -> String {
    let args = format!("-t {key} -i {entity}");
    if script.is_empty() {
        args
    } else {
        format!("{script} {args}")
    }
}

impl Transform {
    /// Local name of the accepted entity type.
    pub fn entity_name(&self) -> &str {
        local_name(&self.input)
    }
}
