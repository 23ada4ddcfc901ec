//! Actions: trigger/execute pairs run over a plot's messages.
//!
//! # Module Structure
//!
//! - `registry` - `Action`, its builder, and `ActionRegistry`
//! - `template` - compiled `__PLACEHOLDER__` templates and their loaders
//! - `pipeline` - dispatch (first match) and accumulate (all matches)
//! - `error`    - registration, template, and pipeline errors
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ActionRegistry::new();
//! registry.add(Action::builder("status").on_title("STATUS").template("status.txt"))?;
//! let text = accumulate(&registry, &plot, &TemplateStore::new(DirLoader::new("templates")))?;
//! ```

mod error;
mod pipeline;
mod registry;
mod template;

pub use error::{PipelineError, RegistrationError, TemplateError};
pub use pipeline::{Pipeline, accumulate, dispatch};
pub use registry::{Action, ActionBuilder, ActionRegistry};
pub use template::{DirLoader, EmbeddedLoader, Template, TemplateLoader, TemplateStore};
