//! Given steps for blackboard BDD scenarios.

use super::world::BoardWorld;
use concord::{
    agent::{AgentName, TaskId},
    blackboard::domain::WriteOptions,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#""{agent}" wrote "{value}" to "{key}" on "{task}""#)]
fn agent_wrote(
    world: &mut BoardWorld,
    agent: String,
    value: String,
    key: String,
    task: String,
) -> Result<(), eyre::Report> {
    world
        .context
        .blackboard()
        .write(
            key,
            value,
            AgentName::new(agent).wrap_err("parse agent")?,
            TaskId::new(task).wrap_err("parse task id")?,
            WriteOptions::new(),
        )
        .wrap_err("write entry")?;
    Ok(())
}

#[given(r#"entries on "{task}" with confidences {first:f64}, {second:f64} and {third:f64}"#)]
fn entries_with_confidences(
    world: &mut BoardWorld,
    task: String,
    first: f64,
    second: f64,
    third: f64,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let writer = AgentName::new("MARS").wrap_err("parse agent")?;
    for (index, confidence) in [first, second, third].into_iter().enumerate() {
        world
            .context
            .blackboard()
            .write(
                format!("finding-{index}"),
                confidence,
                writer.clone(),
                task_id.clone(),
                WriteOptions::new().with_confidence(confidence),
            )
            .wrap_err("write entry")?;
    }
    Ok(())
}

#[given(r#"{count:usize} long findings with confidence {confidence:f64} on "{task}""#)]
fn long_findings(
    world: &mut BoardWorld,
    count: usize,
    confidence: f64,
    task: String,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let writer = AgentName::new("SATURN").wrap_err("parse agent")?;
    for index in 0..count {
        world
            .context
            .blackboard()
            .write(
                format!("finding-{index}"),
                "observed behaviour worth sharing ".repeat(4),
                writer.clone(),
                task_id.clone(),
                WriteOptions::new().with_confidence(confidence),
            )
            .wrap_err("write entry")?;
    }
    Ok(())
}
