use super::{log_api_error, WorkflowContext};
use crate::model::Organization;
use crate::prompt::{select_number, Prompter};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Sweep,
    Import,
}

/// Numbered function menu.
pub fn select_function(prompter: &mut dyn Prompter) -> Result<MenuChoice> {
    prompter.say("1. Delete guest accounts older than specified days")?;
    prompter.say("2. Custom - Delete Unscoped users via CSV Upload")?;
    let index = select_number(prompter, "Select a function to run: ", 2)?;
    Ok(if index == 0 {
        MenuChoice::Sweep
    } else {
        MenuChoice::Import
    })
}

/// List organizations by name and let the operator pick one.
///
/// Returns `None` when the key can see no organizations.
pub fn select_organization(ctx: &mut WorkflowContext<'_>) -> Result<Option<Organization>> {
    let mut organizations = ctx
        .repo
        .list_organizations()
        .inspect_err(|err| log_api_error("list organizations", err))
        .context("list organizations")?;
    if organizations.is_empty() {
        ctx.say("No organizations found.")?;
        return Ok(None);
    }

    organizations.sort_by(|a, b| a.name.cmp(&b.name));
    ctx.say("Organizations:")?;
    for (position, organization) in organizations.iter().enumerate() {
        ctx.say(format!(
            "{}. {} (ID: {})",
            position + 1,
            organization.name,
            organization.id
        ))?;
    }

    let index = select_number(
        &mut *ctx.prompter,
        "Enter the number corresponding to the organization you want to select: ",
        organizations.len(),
    )?;
    let selected = organizations.swap_remove(index);
    ctx.say("")?;
    ctx.say(format!(
        "Selected Organization: {} - {}",
        selected.name, selected.id
    ))?;
    tracing::info!(organization_id = %selected.id, "organization selected");
    Ok(Some(selected))
}
