//! `seqplot show`: print every message through the `show.txt` template.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;

use super::common::read_plot;
use crate::action::{Action, ActionBuilder, ActionRegistry, Template, TemplateStore, dispatch};
use crate::config::PlotConfig;
use crate::debug;
use crate::plot::Plot;

/// Template printed per message.
pub const SHOW_TEMPLATE: &str = "show.txt";

pub fn run_show(file: &Path, config: &PlotConfig) -> Result<()> {
    let plot = read_plot(file, config)?;
    let text = show(&plot, &config.template_store())?;
    print!("{text}");
    Ok(())
}

/// Dispatch the print action over every message, collecting what it prints.
pub fn show(plot: &Plot, store: &TemplateStore) -> Result<String> {
    let template = store.resolve(SHOW_TEMPLATE)?;
    let out = Rc::new(RefCell::new(String::new()));

    let mut registry = ActionRegistry::new();
    registry.add(print_action(template, Rc::clone(&out)))?;
    let fired = dispatch(&registry, plot, store)?;
    debug!("show"; "printed {} messages", fired);

    Ok(out.take())
}

/// Fires on every message and appends its rendering plus a blank line.
fn print_action(template: Arc<Template>, out: Rc<RefCell<String>>) -> ActionBuilder {
    Action::builder("print")
        .trigger(|_, _| true)
        .execute(move |plot, message| {
            let mut out = out.borrow_mut();
            out.push_str(&template.render(&plot.view(message)));
            out.push_str("\n\n");
            None
        })
}
