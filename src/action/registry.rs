//! Action definitions and the registry that holds them.

use std::fmt;

use super::{RegistrationError, TemplateError, TemplateStore};
use crate::plot::{Message, Plot};

/// Custom trigger predicate.
pub type TriggerFn = Box<dyn Fn(&Plot, &Message) -> bool>;

/// Custom execute function. `None` contributes nothing when accumulating.
pub type ExecuteFn = Box<dyn Fn(&Plot, &Message) -> Option<String>>;

/// When an action fires.
pub enum Trigger {
    /// Message title equals this literal, ignoring case. Stored uppercased.
    Title(String),
    Custom(TriggerFn),
}

/// What an action does once triggered.
pub enum Execute {
    /// Render the named template; output gets a trailing newline.
    Template(String),
    Custom(ExecuteFn),
}

/// A named trigger/execute pair.
pub struct Action {
    name: String,
    trigger: Trigger,
    execute: Execute,
}

impl Action {
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(name)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template identifier for template-backed actions.
    pub fn template_id(&self) -> Option<&str> {
        match &self.execute {
            Execute::Template(id) => Some(id.as_str()),
            Execute::Custom(_) => None,
        }
    }

    /// Whether this action applies to `message`.
    pub fn matches(&self, plot: &Plot, message: &Message) -> bool {
        match &self.trigger {
            Trigger::Title(title) => message.title().to_uppercase() == *title,
            Trigger::Custom(f) => f(plot, message),
        }
    }

    /// Run the execute function against one message.
    pub fn run(
        &self,
        plot: &Plot,
        message: &Message,
        templates: &TemplateStore,
    ) -> Result<Option<String>, TemplateError> {
        match &self.execute {
            Execute::Custom(f) => Ok(f(plot, message)),
            Execute::Template(id) => {
                let template = templates.resolve(id)?;
                let mut out = template.render(&plot.view(message));
                out.push('\n');
                Ok(Some(out))
            }
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trigger = match &self.trigger {
            Trigger::Title(title) => format!("title {title}"),
            Trigger::Custom(_) => "custom".to_string(),
        };
        let execute = match &self.execute {
            Execute::Template(id) => format!("template {id}"),
            Execute::Custom(_) => "custom".to_string(),
        };
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("trigger", &trigger)
            .field("execute", &execute)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds an [`Action`].
///
/// An explicit `trigger` wins over `on_title`, and an explicit `execute`
/// wins over `template`. Missing both halves of either pair fails `build`.
pub struct ActionBuilder {
    name: String,
    trigger: Option<TriggerFn>,
    execute: Option<ExecuteFn>,
    title: Option<String>,
    template: Option<String>,
}

impl ActionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: None,
            execute: None,
            title: None,
            template: None,
        }
    }

    pub fn trigger(mut self, f: impl Fn(&Plot, &Message) -> bool + 'static) -> Self {
        self.trigger = Some(Box::new(f));
        self
    }

    pub fn execute(mut self, f: impl Fn(&Plot, &Message) -> Option<String> + 'static) -> Self {
        self.execute = Some(Box::new(f));
        self
    }

    /// Fire on messages with this title.
    pub fn on_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render this template when fired.
    pub fn template(mut self, id: impl Into<String>) -> Self {
        self.template = Some(id.into());
        self
    }

    pub fn build(self) -> Result<Action, RegistrationError> {
        let trigger = match (self.trigger, self.title) {
            (Some(f), _) => Trigger::Custom(f),
            (None, Some(title)) => Trigger::Title(title.to_uppercase()),
            (None, None) => return Err(RegistrationError::MissingTrigger(self.name)),
        };
        let execute = match (self.execute, self.template) {
            (Some(f), _) => Execute::Custom(f),
            (None, Some(id)) => Execute::Template(id),
            (None, None) => return Err(RegistrationError::MissingExecute(self.name)),
        };
        Ok(Action {
            name: self.name,
            trigger,
            execute,
        })
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of actions. Registration order is evaluation order.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action. Names are unique.
    pub fn register(&mut self, action: Action) -> Result<(), RegistrationError> {
        if self.get(action.name()).is_some() {
            return Err(RegistrationError::Duplicate(action.name));
        }
        self.actions.push(action);
        Ok(())
    }

    /// Build and register in one step.
    pub fn add(&mut self, builder: ActionBuilder) -> Result<(), RegistrationError> {
        self.register(builder.build()?)
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Templates referenced by registered actions, deduplicated.
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.actions.iter().filter_map(Action::template_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
