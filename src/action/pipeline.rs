//! Running registered actions over a plot.
//!
//! Both modes walk messages in order and evaluate triggers in registration
//! order. Referenced templates are compiled before the first message.

use super::{ActionRegistry, PipelineError, TemplateStore};
use crate::debug;
use crate::plot::Plot;

/// Registry plus the templates its actions render.
pub struct Pipeline<'a> {
    registry: &'a ActionRegistry,
    templates: &'a TemplateStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a ActionRegistry, templates: &'a TemplateStore) -> Self {
        Self {
            registry,
            templates,
        }
    }

    fn prepare(&self) -> Result<(), PipelineError> {
        self.templates.prepare(self.registry.template_ids())?;
        Ok(())
    }

    /// Run the first matching action per message, discarding its output.
    ///
    /// Returns how many messages fired an action.
    pub fn dispatch(&self, plot: &Plot) -> Result<usize, PipelineError> {
        self.prepare()?;
        let mut fired = 0;
        for message in plot.messages() {
            let Some(action) = self.registry.iter().find(|a| a.matches(plot, message)) else {
                continue;
            };
            debug!("action"; "#{} -> {}", message.order, action.name());
            action.run(plot, message, self.templates)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Run every matching action per message and concatenate the outputs.
    pub fn accumulate(&self, plot: &Plot) -> Result<String, PipelineError> {
        self.prepare()?;
        let mut out = String::new();
        for message in plot.messages() {
            for action in self.registry.iter().filter(|a| a.matches(plot, message)) {
                debug!("action"; "#{} -> {}", message.order, action.name());
                if let Some(text) = action.run(plot, message, self.templates)? {
                    out.push_str(&text);
                }
            }
        }
        Ok(out)
    }
}

/// Dispatch with a one-off pipeline.
pub fn dispatch(
    registry: &ActionRegistry,
    plot: &Plot,
    templates: &TemplateStore,
) -> Result<usize, PipelineError> {
    Pipeline::new(registry, templates).dispatch(plot)
}

/// Accumulate with a one-off pipeline.
pub fn accumulate(
    registry: &ActionRegistry,
    plot: &Plot,
    templates: &TemplateStore,
) -> Result<String, PipelineError> {
    Pipeline::new(registry, templates).accumulate(plot)
}
