// src/engine/mod.rs

//! Sequential execution of a plan.
//!
//! Each command runs to completion before the next one starts; the loop is a
//! plain `await` per command.

use tracing::{info, warn};

use crate::config::PlanFile;
use crate::exec::{RunResult, SessionEnv};

/// Result of one plan command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub name: String,
    pub result: RunResult,
}

/// Run every command of `plan` in order.
///
/// With `keep_going = false` the loop stops after the first command that
/// does not exit with code 0; commands after it are not run and have no
/// outcome.
pub async fn run_plan(plan: &PlanFile, env: &SessionEnv) -> Vec<PlanOutcome> {
    let mut outcomes = Vec::with_capacity(plan.commands.len());

    for entry in plan.commands.iter() {
        info!(command = %entry.name, line = %entry.spec.command_line(), "running plan command");
        let result = entry.to_command(env).run().await;
        let failed = !result.success();

        outcomes.push(PlanOutcome {
            name: entry.name.clone(),
            result,
        });

        if failed && !plan.keep_going {
            warn!(command = %entry.name, "command failed and keep_going = false; stopping plan");
            break;
        }
    }

    outcomes
}
