//! Given steps for negotiation BDD scenarios.

use super::world::{NegotiationWorld, run_async};
use concord::agent::{AgentName, TaskId};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(
    r#"a negotiation on "{task}" from "{initiator}" to "{respondent}" about "{topic}" proposing "{position}""#
)]
fn negotiation_is_open(
    world: &mut NegotiationWorld,
    task: String,
    initiator: String,
    respondent: String,
    topic: String,
    position: String,
) -> Result<(), eyre::Report> {
    let session = run_async(world.context.negotiations().open_negotiation(
        TaskId::new(task).wrap_err("parse task id")?,
        AgentName::new(initiator).wrap_err("parse initiator")?,
        AgentName::new(respondent).wrap_err("parse respondent")?,
        topic,
        position,
    ))
    .wrap_err("open negotiation")?;
    world.session_id = Some(session.id());
    Ok(())
}
