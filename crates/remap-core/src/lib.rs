//! Remap Core - Rule-driven reshaping of JSON documents
//!
//! This crate maps fields of an input JSON document to an output document
//! according to a list of mapping rules. Each rule reads a value at a source
//! path, converts it with a named catalog transform or a small expression, and
//! writes it at a destination path.
//!
//! # Main Components
//!
//! - **Rules**: [`MappingRule`] and its builder
//! - **Path Accessor**: nested reads and writes on documents ([`path`])
//! - **Transform Catalog**: named value conversions ([`transformer`])
//! - **Expression Evaluator**: per-rule custom logic ([`expression`])
//! - **Mapping Engine**: rule application and batch detection ([`mapper`])
//! - **Streaming**: bounded-memory rewriting of one large object ([`stream`])
//!
//! # Example
//!
//! ```
//! use remap_core::{transform, Document, MappingRuleBuilder};
//! use serde_json::json;
//!
//! fn example() -> remap_core::Result<()> {
//!     let rules = vec![MappingRuleBuilder::new("firstName")
//!         .destination("user.first_name")
//!         .build()?];
//!
//!     let input: Document = serde_json::from_value(json!({
//!         "applicantDetails": [{"firstName": "A"}, {"firstName": "B"}]
//!     }))?;
//!
//!     let output = transform(&input, &rules);
//!     assert_eq!(
//!         serde_json::Value::Object(output),
//!         json!({"applicants": [
//!             {"user": {"first_name": "A"}},
//!             {"user": {"first_name": "B"}}
//!         ]})
//!     );
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod mapper;
pub mod path;
pub mod rule;
pub mod stream;
pub mod transformer;
pub mod types;

// Re-export main types for convenience
pub use config::{BatchConfig, EngineConfig, StreamConfig};
pub use error::{Error, Result};
pub use expression::{evaluate_expression, EvalContext, Evaluator, ExprEvaluator, ExpressionError};
pub use mapper::{apply_rules, prepopulate_defaults, transform, MappingEngine, RuleOutcome};
pub use path::{get_nested, nest_value, set_nested};
pub use rule::{parse_path, validate_rules, MappingRule, MappingRuleBuilder};
pub use stream::{
    stream_transform, stream_transform_with_config, stream_transform_with_rules, EntryTransform,
    FormatError, RuleDrivenTransform, StreamError, StreamState, StreamTransformer,
};
pub use transformer::{apply_transform, TransformKind, TransformationError};
pub use types::{Document, TransformRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
