//! Then steps for blackboard BDD scenarios.

use super::world::BoardWorld;
use concord::{agent::TaskId, blackboard::services::TRUNCATION_MARKER};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use serde_json::Value;

fn rendered(world: &BoardWorld) -> Result<&str, eyre::Report> {
    world
        .rendered
        .as_deref()
        .ok_or_else(|| eyre::eyre!("nothing was rendered in this scenario"))
}

#[then(r#"reading "{key}" on "{task}" yields "{value}""#)]
fn reading_yields(
    world: &BoardWorld,
    key: String,
    task: String,
    value: String,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let entry = world
        .context
        .blackboard()
        .read(&key, &task_id)
        .wrap_err("read entry")?
        .ok_or_else(|| eyre::eyre!("no entry for {key}"))?;
    let expected = Value::from(value);
    if entry.value() != &expected {
        return Err(eyre::eyre!("expected {expected}, found {}", entry.value()));
    }
    Ok(())
}

#[then(r#"listing "{task}" yields confidences {first:f64}, {second:f64} and {third:f64}"#)]
fn listing_yields_confidences(
    world: &BoardWorld,
    task: String,
    first: f64,
    second: f64,
    third: f64,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let listed: Vec<f64> = world
        .context
        .blackboard()
        .read_all(&task_id, None)
        .wrap_err("list entries")?
        .iter()
        .map(|entry| entry.confidence().value())
        .collect();
    let expected = [first, second, third];
    let matches = listed.len() == expected.len()
        && listed
            .iter()
            .zip(expected)
            .all(|(actual, wanted)| (actual - wanted).abs() < f64::EPSILON);
    if !matches {
        return Err(eyre::eyre!("expected {expected:?}, found {listed:?}"));
    }
    Ok(())
}

#[then("the rendered block is shorter than {limit:usize} characters")]
fn rendered_block_is_short(world: &BoardWorld, limit: usize) -> Result<(), eyre::Report> {
    let length = rendered(world)?.chars().count();
    if length >= limit {
        return Err(eyre::eyre!("rendered block has {length} characters"));
    }
    Ok(())
}

#[then("the rendered block is marked as truncated")]
fn rendered_block_is_truncated(world: &BoardWorld) -> Result<(), eyre::Report> {
    if !rendered(world)?.contains(TRUNCATION_MARKER) {
        return Err(eyre::eyre!("rendered block carries no truncation marker"));
    }
    Ok(())
}
