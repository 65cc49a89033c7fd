//=========================================================================
// Descriptor Types
//=========================================================================
//
// Serde model of a tree descriptor plus the structural checks that do
// not need a system factory (names, parents, children, cycles, main).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::DescriptorError;
use crate::core::system::SystemParams;

//=== Descriptor Types ====================================================

/// Top-level descriptor: a named tree with an entry state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTreeDesc {
    pub name: String,

    /// State activated on the first tick.
    pub main: String,

    #[serde(default)]
    pub states: Vec<StateDesc>,
}

/// One state with its parent link, child list and systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDesc {
    pub name: String,

    /// Parent state; absent or empty for roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default)]
    pub children: Vec<String>,

    #[serde(default)]
    pub systems: Vec<SystemDesc>,
}

/// One system instance: its name on the state and its factory type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDesc {
    pub name: String,

    #[serde(rename = "type")]
    pub system_type: String,

    #[serde(default)]
    pub params: SystemParams,
}

//=== Loading =============================================================

impl StateTreeDesc {
    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn state(&self, name: &str) -> Option<&StateDesc> {
        self.states.iter().find(|state| state.name == name)
    }

    /// Declared parent of `name`, or the state whose `children` list names it.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let state = self.state(name)?;
        state
            .parent
            .as_deref()
            .filter(|parent| !parent.is_empty())
            .or_else(|| {
                self.states
                    .iter()
                    .find(|other| other.children.iter().any(|child| child == name))
                    .map(|other| other.name.as_str())
            })
    }

    //--- Validation -------------------------------------------------------

    /// Checks the structure and returns states parents-first.
    ///
    /// Roots come in declaration order; each state is followed by its
    /// subtree, children ordered by the parent's `children` list and then
    /// by declaration order. That order becomes the tree's child order.
    pub fn registration_order(&self) -> Result<Vec<&StateDesc>, DescriptorError> {
        let parents = self.resolve_parents()?;

        if !parents.contains_key(self.main.as_str()) {
            return Err(DescriptorError::UnknownMainState {
                main: self.main.clone(),
            });
        }

        let mut order = Vec::with_capacity(self.states.len());
        let mut visited = HashSet::new();
        for state in &self.states {
            if parents[state.name.as_str()].is_none() {
                self.visit(state, &parents, &mut visited, &mut order);
            }
        }

        // Anything unreachable from a root hangs off a cycle
        if let Some(stray) = self.states.iter().find(|state| !visited.contains(state.name.as_str())) {
            return Err(DescriptorError::Cycle {
                state: stray.name.clone(),
            });
        }

        Ok(order)
    }

    /// Maps every state name to its effective parent.
    fn resolve_parents(&self) -> Result<HashMap<&str, Option<&str>>, DescriptorError> {
        let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(self.states.len());

        for state in &self.states {
            let parent = state.parent.as_deref().filter(|parent| !parent.is_empty());
            if parents.insert(state.name.as_str(), parent).is_some() {
                return Err(DescriptorError::DuplicateState {
                    name: state.name.clone(),
                });
            }
        }

        for state in &self.states {
            for child in &state.children {
                let mismatch = || DescriptorError::ChildMismatch {
                    parent: state.name.clone(),
                    child: child.clone(),
                };

                let declared = parents.get_mut(child.as_str()).ok_or_else(mismatch)?;
                match *declared {
                    None => *declared = Some(state.name.as_str()),
                    Some(parent) if parent == state.name => {}
                    Some(_) => return Err(mismatch()),
                }
            }
        }

        for state in &self.states {
            if let Some(parent) = parents[state.name.as_str()] {
                if !parents.contains_key(parent) {
                    return Err(DescriptorError::UnknownParent {
                        state: state.name.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        Ok(parents)
    }

    fn visit<'a>(
        &'a self,
        state: &'a StateDesc,
        parents: &HashMap<&str, Option<&str>>,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<&'a StateDesc>,
    ) {
        if !visited.insert(state.name.as_str()) {
            return;
        }
        order.push(state);

        let listed = state.children.iter().filter_map(|child| self.state(child));
        let unlisted = self.states.iter().filter(|other| {
            parents[other.name.as_str()] == Some(state.name.as_str())
                && !state.children.contains(&other.name)
        });

        for child in listed.chain(unlisted) {
            self.visit(child, parents, visited, order);
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Sample",
        "main": "Menu",
        "states": [
            { "name": "root", "children": ["Game", "Menu"],
              "systems": [ { "name": "audio", "type": "Audio", "params": { "volume": 0.5 } } ] },
            { "name": "Menu", "parent": "root" },
            { "name": "Paused", "parent": "Game" },
            { "name": "Game" }
        ]
    }"#;

    fn names<'a>(order: &[&'a StateDesc]) -> Vec<&'a str> {
        order.iter().map(|state| state.name.as_str()).collect()
    }

    //--- Parsing ----------------------------------------------------------

    #[test]
    fn parses_full_descriptor() {
        let desc = StateTreeDesc::from_json_str(SAMPLE).unwrap();

        assert_eq!(desc.name, "Sample");
        assert_eq!(desc.main, "Menu");
        assert_eq!(desc.states.len(), 4);

        let audio = &desc.states[0].systems[0];
        assert_eq!(audio.system_type, "Audio");
        assert_eq!(audio.params["volume"], 0.5);
        assert!(desc.states[1].systems.is_empty());
        assert!(desc.states[3].parent.is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = StateTreeDesc::from_json_str("{ \"name\": ").unwrap_err();
        assert!(matches!(err, DescriptorError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StateTreeDesc::from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, DescriptorError::Io { .. }));
    }

    //--- Ordering ---------------------------------------------------------

    #[test]
    fn registration_order_is_parents_first_following_child_lists() {
        let desc = StateTreeDesc::from_json_str(SAMPLE).unwrap();
        let order = desc.registration_order().unwrap();

        assert_eq!(names(&order), vec!["root", "Game", "Paused", "Menu"]);
    }

    #[test]
    fn parent_of_falls_back_to_child_lists() {
        let desc = StateTreeDesc::from_json_str(SAMPLE).unwrap();

        assert_eq!(desc.parent_of("Menu"), Some("root"));
        assert_eq!(desc.parent_of("Game"), Some("root"));
        assert_eq!(desc.parent_of("Paused"), Some("Game"));
        assert_eq!(desc.parent_of("root"), None);
        assert_eq!(desc.parent_of("ghost"), None);
    }

    #[test]
    fn empty_parent_string_means_root() {
        let desc = StateTreeDesc::from_json_str(
            r#"{ "name": "t", "main": "a", "states": [ { "name": "a", "parent": "" } ] }"#,
        )
        .unwrap();

        assert_eq!(names(&desc.registration_order().unwrap()), vec!["a"]);
    }

    //--- Validation Errors ------------------------------------------------

    fn order_error(json: &str) -> DescriptorError {
        StateTreeDesc::from_json_str(json)
            .unwrap()
            .registration_order()
            .unwrap_err()
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let err = order_error(r#"{ "name": "t", "main": "a", "states": [ { "name": "a" }, { "name": "a" } ] }"#);
        assert!(matches!(err, DescriptorError::DuplicateState { name } if name == "a"));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = order_error(r#"{ "name": "t", "main": "a", "states": [ { "name": "a", "parent": "ghost" } ] }"#);
        assert!(matches!(err, DescriptorError::UnknownParent { parent, .. } if parent == "ghost"));
    }

    #[test]
    fn child_listed_under_wrong_parent_is_rejected() {
        let err = order_error(
            r#"{ "name": "t", "main": "a", "states": [
                { "name": "a" }, { "name": "b", "children": ["c"] }, { "name": "c", "parent": "a" } ] }"#,
        );
        assert!(matches!(err, DescriptorError::ChildMismatch { parent, child } if parent == "b" && child == "c"));
    }

    #[test]
    fn undeclared_child_is_rejected() {
        let err = order_error(r#"{ "name": "t", "main": "a", "states": [ { "name": "a", "children": ["z"] } ] }"#);
        assert!(matches!(err, DescriptorError::ChildMismatch { child, .. } if child == "z"));
    }

    #[test]
    fn parent_cycle_is_rejected() {
        let err = order_error(
            r#"{ "name": "t", "main": "r", "states": [
                { "name": "r" }, { "name": "a", "parent": "b" }, { "name": "b", "parent": "a" } ] }"#,
        );
        assert!(matches!(err, DescriptorError::Cycle { .. }));
    }

    #[test]
    fn unknown_main_is_rejected() {
        let err = order_error(r#"{ "name": "t", "main": "nowhere", "states": [ { "name": "a" } ] }"#);
        assert!(matches!(err, DescriptorError::UnknownMainState { main } if main == "nowhere"));
    }
}
