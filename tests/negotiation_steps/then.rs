//! Then steps for negotiation BDD scenarios.

use super::world::NegotiationWorld;
use concord::{
    agent::{AgentName, TaskId},
    bus::domain::MessageType,
    negotiation::{domain::NegotiationStatus, services::NegotiationError},
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"the negotiation status is "{status}""#)]
fn negotiation_status(world: &NegotiationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = NegotiationStatus::try_from(status.as_str()).wrap_err("parse status")?;
    let actual = world.session()?.status();
    if actual != expected {
        return Err(eyre::eyre!("expected status {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the session message count is {count:usize}")]
fn session_message_count(world: &NegotiationWorld, count: usize) -> Result<(), eyre::Report> {
    let recorded = world.session()?.message_ids().len();
    if recorded != count {
        return Err(eyre::eyre!("expected {count} session messages, found {recorded}"));
    }
    Ok(())
}

#[then(r#"the respondent position is "{position}""#)]
fn respondent_position(world: &NegotiationWorld, position: String) -> Result<(), eyre::Report> {
    let session = world.session()?;
    let expected = Some(position);
    let actual = session.respondent_position().map(str::to_owned);
    if actual != expected {
        return Err(eyre::eyre!("expected position {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#""{agent}" has received the escalation"#)]
fn arbitrator_received_escalation(
    world: &NegotiationWorld,
    agent: String,
) -> Result<(), eyre::Report> {
    let arbitrator = AgentName::new(agent).wrap_err("parse arbitrator")?;
    let inbox = world
        .context
        .bus()
        .get_inbox(&arbitrator, None)
        .wrap_err("load arbitrator inbox")?;
    if !inbox
        .iter()
        .any(|message| message.kind() == MessageType::Escalate)
    {
        return Err(eyre::eyre!("{arbitrator} has no escalation message"));
    }
    Ok(())
}

#[then(r#"there are no open negotiations on "{task}""#)]
fn no_open_negotiations(world: &NegotiationWorld, task: String) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let open = world
        .context
        .negotiations()
        .get_open_negotiations(&task_id)
        .wrap_err("list open negotiations")?;
    let count = open.len();
    if count > 0 {
        return Err(eyre::eyre!("expected no open negotiations, found {count}"));
    }
    Ok(())
}

#[then("the last call was rejected as already terminal")]
fn last_call_rejected(world: &NegotiationWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(NegotiationError::AlreadyTerminal { .. })) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected an already-terminal rejection, got {err}")),
        Some(Ok(session)) => Err(eyre::eyre!(
            "expected a rejection, but the call returned status {}",
            session.status()
        )),
        None => Err(eyre::eyre!("no negotiation call was made")),
    }
}
