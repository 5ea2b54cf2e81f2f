//! Purpose: Define the stable public Rust API boundary for solmsg.
//! Exports: Codec operations, context/sink types, and the template catalog.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path embedders should rely on.
//! Invariants: Codec semantics here match the CLI's JSON contract exactly.

mod catalog;
mod context;
mod template;

pub use crate::core::coerce::coerce_scalar;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::flatten::{EXCLUDED_TOP_LEVEL, flatten_property_map};
pub use crate::core::path::{PropertyPath, Segment};
pub use crate::core::tree::{add_property, set_property_if_not_null};
pub use catalog::{REQUEST_TEMPLATES, RESPONSE_TEMPLATES, request_template, response_template};
pub use context::{ExecutionContext, Outputs};
pub use template::{FieldCopy, RequestTemplate, ResponseTemplate};
