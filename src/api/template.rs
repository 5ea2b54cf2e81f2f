//! Purpose: Interpret declarative message templates against an execution context.
//! Exports: `RequestTemplate`, `ResponseTemplate`, `FieldCopy`.
//! Role: The one generic builder/parser replacing per-message procedural scripts.
//! Invariants: A template is pure data; all behavior lives in `build`/`parse`.
//! Invariants: Request bodies start from the template seed, so constant fields
//! and empty container skeletons survive even with an empty context.

use serde_json::Value;
use tracing::debug;

use crate::api::context::{ExecutionContext, Outputs};
use crate::core::error::{Error, ErrorKind};
use crate::core::flatten::flatten_property_map;
use crate::core::tree::{add_property, set_property_if_not_null};

/// Guarded copy of one context property into a top-level message field,
/// optionally under a different name (`scaleType` → `type`).
#[derive(Clone, Copy, Debug)]
pub struct FieldCopy {
    pub from: &'static str,
    pub to: &'static str,
}

impl FieldCopy {
    pub const fn named(name: &'static str) -> Self {
        Self {
            from: name,
            to: name,
        }
    }

    pub const fn renamed(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

/// One outbound message type: a JSON seed skeleton, the top-level fields
/// copied from the context, and the dotted-property prefixes collected
/// through the path codec.
#[derive(Clone, Copy, Debug)]
pub struct RequestTemplate {
    pub name: &'static str,
    pub spec: &'static str,
    pub seed: &'static str,
    pub copy_fields: &'static [FieldCopy],
    pub collect_prefixes: &'static [&'static str],
}

impl RequestTemplate {
    /// Assemble the outbound body and serialize it to JSON text.
    pub fn build(&self, context: &ExecutionContext) -> Result<String, Error> {
        debug!(template = self.name, spec = self.spec, "generating request message");

        let mut message: Value = serde_json::from_str(self.seed).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("seed for template {} is not a valid JSON object", self.name))
                .with_source(err)
        })?;

        let properties = context.to_json_object();
        {
            let Some(body) = message.as_object_mut() else {
                return Err(Error::new(ErrorKind::Internal)
                    .with_message(format!("seed for template {} is not a JSON object", self.name)));
            };
            for copy in self.copy_fields {
                if copy.from == copy.to {
                    set_property_if_not_null(&properties, body, copy.from);
                } else if let Some(value) = properties.get(copy.from) {
                    if !value.is_null() {
                        body.insert(copy.to.to_string(), value.clone());
                    }
                }
            }
        }

        for (key, value) in context.properties() {
            if self
                .collect_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix))
            {
                add_property(&mut message, key, value)?;
            }
        }

        let text = serde_json::to_string(&message)?;
        debug!(template = self.name, "request message generated");
        Ok(text)
    }
}

/// One inbound message type: the output key that receives the resource `id`,
/// with every other leaf flattened into the sink under its dotted path.
#[derive(Clone, Copy, Debug)]
pub struct ResponseTemplate {
    pub name: &'static str,
    pub spec: &'static str,
    pub id_output: &'static str,
}

impl ResponseTemplate {
    /// Parse the response body and emit `(name, value)` pairs into `outputs`.
    pub fn parse(&self, body: &str, outputs: &mut Outputs) -> Result<(), Error> {
        debug!(template = self.name, spec = self.spec, "parsing response message");

        let tree: Value = serde_json::from_str(body).map_err(|err| {
            Error::new(ErrorKind::Json)
                .with_message(format!("{} response body is not valid JSON", self.name))
                .with_source(err)
        })?;

        if let Some(id) = tree.get("id") {
            if !id.is_null() {
                outputs.put(self.id_output, id.clone());
            }
        }

        // Exclusion of id/name/index/_links lives in the flattener.
        for (name, value) in flatten_property_map(&tree) {
            outputs.put(name, value);
        }

        debug!(template = self.name, "response message parsed");
        Ok(())
    }
}
