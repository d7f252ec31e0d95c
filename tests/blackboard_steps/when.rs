//! When steps for blackboard BDD scenarios.

use super::world::BoardWorld;
use concord::agent::TaskId;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#""{task}" is rendered with a budget of {tokens:usize} tokens"#)]
fn task_rendered(world: &mut BoardWorld, task: String, tokens: usize) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task).wrap_err("parse task id")?;
    let rendered = world
        .context
        .blackboard()
        .format_for_prompt(&task_id, tokens)
        .wrap_err("render blackboard")?;
    world.rendered = Some(rendered);
    Ok(())
}
