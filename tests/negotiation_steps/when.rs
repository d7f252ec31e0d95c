//! When steps for negotiation BDD scenarios.

use super::world::{NegotiationWorld, run_async};
use concord::negotiation::domain::Resolver;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the respondent counters with "{position}""#)]
fn respondent_counters(
    world: &mut NegotiationWorld,
    position: String,
) -> Result<(), eyre::Report> {
    let id = world.session_id()?;
    let negotiations = world.context.negotiations();
    let outcome = run_async(negotiations.respond_to_negotiation(id, position));
    world.last_result = Some(outcome);
    Ok(())
}

#[when(r#"the negotiation is resolved as "{resolution}" by "{resolver}""#)]
fn negotiation_resolved(
    world: &mut NegotiationWorld,
    resolution: String,
    resolver: String,
) -> Result<(), eyre::Report> {
    let id = world.session_id()?;
    let resolved_by = Resolver::try_from(resolver).wrap_err("parse resolver")?;
    let negotiations = world.context.negotiations();
    let outcome = run_async(negotiations.resolve(id, resolution, resolved_by));
    world.last_result = Some(outcome);
    Ok(())
}

#[when(r#"the negotiation is escalated because "{reason}""#)]
fn negotiation_escalated(
    world: &mut NegotiationWorld,
    reason: String,
) -> Result<(), eyre::Report> {
    let id = world.session_id()?;
    world.last_result = Some(run_async(world.context.negotiations().escalate(id, reason)));
    Ok(())
}
