//! When steps for message bus BDD scenarios.

use super::world::{BusWorld, run_async};
use concord::{
    agent::{AgentName, Recipient, TaskId},
    bus::domain::{MessageDraft, MessageType},
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

const TASK: &str = "task-001";

fn send(world: &mut BusWorld, draft: MessageDraft) {
    world.last_send = Some(run_async(world.context.bus().send_with_report(draft)));
}

#[when(r#""{from}" sends "{body}" to "{to}""#)]
fn agent_sends_direct(
    world: &mut BusWorld,
    from: String,
    body: String,
    to: String,
) -> Result<(), eyre::Report> {
    let draft = MessageDraft::new(
        MessageType::FindingShare,
        AgentName::new(from).wrap_err("parse sender")?,
        AgentName::new(to).wrap_err("parse recipient")?,
        TaskId::new(TASK).wrap_err("parse task id")?,
    )
    .with_subject("finding")
    .with_body(body);
    send(world, draft);
    Ok(())
}

#[when(r#""{from}" broadcasts "{body}""#)]
fn agent_broadcasts(world: &mut BusWorld, from: String, body: String) -> Result<(), eyre::Report> {
    let draft = MessageDraft::new(
        MessageType::Discovery,
        AgentName::new(from).wrap_err("parse sender")?,
        Recipient::Broadcast,
        TaskId::new(TASK).wrap_err("parse task id")?,
    )
    .with_subject("announcement")
    .with_body(body);
    send(world, draft);
    Ok(())
}
