//=========================================================================
// state-tree-dump
//
// Loads a tree descriptor, validates its structure and prints the state
// hierarchy with each state's systems.
//
// Usage:
//   state-tree-dump <descriptor.json>
//
// Log level follows RUST_LOG (default: info).
//
//=========================================================================

use std::env;
use std::process::ExitCode;

use log::error;
use state_tree::prelude::*;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: state-tree-dump <descriptor.json>");
        return ExitCode::from(2);
    };

    match dump(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}: {}", path, err);
            ExitCode::FAILURE
        }
    }
}

fn dump(path: &str) -> Result<(), DescriptorError> {
    let desc = StateTreeDesc::from_path(path)?;
    let order = desc.registration_order()?;

    println!("tree: {}", desc.name);
    println!("main: {}", desc.main);

    for state in order {
        let depth = depth_of(&desc, &state.name);
        let indent = "  ".repeat(depth);
        println!("{}- {}", indent, state.name);

        for system in &state.systems {
            println!("{}    [{}: {}]", indent, system.name, system.system_type);
        }
    }

    Ok(())
}

/// Distance from the root.
fn depth_of(desc: &StateTreeDesc, name: &str) -> usize {
    let mut depth = 0;
    let mut current = name;

    // Cycles were rejected by registration_order()
    while let Some(parent) = desc.parent_of(current) {
        depth += 1;
        current = parent;
    }
    depth
}
