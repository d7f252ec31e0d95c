//! Then steps for message bus BDD scenarios.

use super::world::BusWorld;
use concord::{agent::AgentName, bus::services::Delivery};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn delivery(world: &BusWorld) -> Result<&Delivery, eyre::Report> {
    world
        .last_send
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no message was sent in this scenario"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("send failed: {err}"))
}

fn bodies_seen_by(world: &BusWorld, agent: String) -> Result<Vec<String>, eyre::Report> {
    let name = AgentName::new(agent).wrap_err("parse subscriber name")?;
    let seen = world
        .seen
        .get(&name)
        .ok_or_else(|| eyre::eyre!("{name} has no recording handler"))?
        .lock()
        .map_err(|err| eyre::eyre!("recording lock poisoned: {err}"))?;
    Ok(seen
        .iter()
        .map(|message| message.body().to_owned())
        .collect())
}

#[then("the send succeeded")]
fn send_succeeded(world: &BusWorld) -> Result<(), eyre::Report> {
    delivery(world).map(|_| ())
}

#[then(r#"the handler count for "{agent}" is {count:usize}"#)]
fn handler_count(world: &BusWorld, agent: String, count: usize) -> Result<(), eyre::Report> {
    let seen = bodies_seen_by(world, agent)?.len();
    if seen != count {
        return Err(eyre::eyre!("expected {count} deliveries, found {seen}"));
    }
    Ok(())
}

#[then(r#"the last body seen by "{agent}" is "{body}""#)]
fn last_body_seen(world: &BusWorld, agent: String, body: String) -> Result<(), eyre::Report> {
    let last = bodies_seen_by(world, agent)?.pop();
    let expected = Some(body);
    if last != expected {
        return Err(eyre::eyre!("expected last body {expected:?}, found {last:?}"));
    }
    Ok(())
}

#[then("{count:usize} handler reported a failure")]
fn handler_failures(world: &BusWorld, count: usize) -> Result<(), eyre::Report> {
    let failures = delivery(world)?.failures().count();
    if failures != count {
        return Err(eyre::eyre!("expected {count} failed handlers, found {failures}"));
    }
    Ok(())
}
