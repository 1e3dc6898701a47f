//! The value-network JSON export and scope filtering.
//!
//! The export is a single object with five maps, each keyed by a composite
//! node key such as `"Process-12"`:
//!
//! ```json
//! {
//!   "projects":       { "Project-1": { "name": "Herbs" } },
//!   "processes":      { "Process-1": { "name": "Harvest", "start": "2014-03-01", "end": "2014-03-04",
//!                                      "project-id": "Project-1", "next": ["ResourceType-1"] } },
//!   "agents":         { "Agent-1": { "name": "Bob", "processes": ["Process-1"] } },
//!   "resource_types": { "ResourceType-1": { "name": "Dried herbs", "next": [] } },
//!   "orders":         {}
//! }
//! ```
//!
//! Map order is preserved, which keeps graph assembly and layout
//! deterministic for a given export.

use std::{collections::HashSet, fmt, str::FromStr};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use valnet_core::identifier::Id;

/// Errors raised while reading or querying an export.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The text is not a valid export. `line` and `column` are 1-based.
    #[error("invalid value network JSON at line {line}, column {column}: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("process `{process}` has an invalid {field} date `{value}`")]
    InvalidDate {
        process: Id,
        field: &'static str,
        value: String,
    },

    #[error("invalid scope `{0}`, expected all, project:<id>, agent:<id> or order:<id>")]
    InvalidScope(String),

    #[error("{kind} `{id}` does not exist in the value network")]
    UnknownScope { kind: &'static str, id: Id },
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        let message = err.to_string();
        // serde_json appends the location to its own message.
        let location = format!(" at line {line} column {column}");
        let message = message
            .strip_suffix(&location)
            .map(str::to_string)
            .unwrap_or(message);
        SourceError::Json {
            message,
            line,
            column,
        }
    }
}

/// Root of a value-network export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValueNetwork {
    pub projects: IndexMap<Id, Project>,
    pub processes: IndexMap<Id, Process>,
    pub agents: IndexMap<Id, Agent>,
    pub resource_types: IndexMap<Id, ResourceType>,
    pub orders: IndexMap<Id, Order>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Process {
    pub name: String,
    #[serde(rename = "type", default = "process_type")]
    pub kind: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub url: Option<String>,
    #[serde(rename = "project-id", default, deserialize_with = "blank_id_as_none")]
    pub project_id: Option<Id>,
    #[serde(rename = "order-id", default, deserialize_with = "blank_id_as_none")]
    pub order_id: Option<Id>,
    /// `YYYY-MM-DD`
    pub start: String,
    /// `YYYY-MM-DD`
    pub end: String,
    #[serde(default)]
    pub orphan: bool,
    /// Resource types produced by this process.
    #[serde(default)]
    pub next: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceType {
    pub name: String,
    #[serde(rename = "type", default = "resource_type_type")]
    pub kind: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub url: Option<String>,
    #[serde(rename = "photo-url", default, deserialize_with = "blank_as_none")]
    pub photo_url: Option<String>,
    /// Processes consuming this resource type.
    #[serde(default)]
    pub next: Vec<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub name: String,
    pub processes: Vec<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Order {
    pub name: String,
    #[serde(rename = "for")]
    pub receiver: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub due: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub url: Option<String>,
    pub processes: Vec<Id>,
}

fn process_type() -> String {
    "process".to_string()
}

fn resource_type_type() -> String {
    "resourcetype".to_string()
}

/// Reads an optional string, mapping `null` and `""` to `None`.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn blank_id_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Id>, D::Error> {
    Ok(blank_as_none(deserializer)?.map(|key| Id::new(&key)))
}

impl ValueNetwork {
    /// Parses an export.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Json`] with the error location when the text is
    /// not valid JSON or does not match the export shape.
    pub fn from_json(source: &str) -> Result<Self, SourceError> {
        let network: ValueNetwork = serde_json::from_str(source)?;
        debug!(
            projects = network.projects.len(),
            processes = network.processes.len(),
            agents = network.agents.len(),
            resource_types = network.resource_types.len(),
            orders = network.orders.len();
            "Value network loaded"
        );
        Ok(network)
    }

    /// Keys of the processes selected by `scope`, in export order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownScope`] when the scope names a project,
    /// agent or order the export does not contain.
    pub fn scoped_processes(&self, scope: &Scope) -> Result<Vec<Id>, SourceError> {
        match *scope {
            Scope::All => Ok(self.processes.keys().copied().collect()),
            Scope::Project(project) => {
                if !self.projects.contains_key(&project) {
                    return Err(SourceError::UnknownScope {
                        kind: "project",
                        id: project,
                    });
                }
                Ok(self.filter_processes(|_, process| process.project_id == Some(project)))
            }
            Scope::Agent(agent) => {
                let agent = self.agents.get(&agent).ok_or(SourceError::UnknownScope {
                    kind: "agent",
                    id: agent,
                })?;
                let members: HashSet<Id> = agent.processes.iter().copied().collect();
                Ok(self.filter_processes(|id, _| members.contains(id)))
            }
            Scope::Order(order_id) => {
                let order = self.orders.get(&order_id).ok_or(SourceError::UnknownScope {
                    kind: "order",
                    id: order_id,
                })?;
                let members: HashSet<Id> = order.processes.iter().copied().collect();
                Ok(self.filter_processes(|id, process| {
                    members.contains(id) || process.order_id == Some(order_id)
                }))
            }
        }
    }

    fn filter_processes(&self, keep: impl Fn(&Id, &Process) -> bool) -> Vec<Id> {
        self.processes
            .iter()
            .filter(|(id, process)| keep(id, process))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Which part of the value network to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    All,
    Project(Id),
    Agent(Id),
    Order(Id),
}

impl FromStr for Scope {
    type Err = SourceError;

    /// Parses `all`, `project:<key>`, `agent:<key>` or `order:<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Scope::All);
        }
        let invalid = || SourceError::InvalidScope(s.to_string());
        let (kind, key) = s.split_once(':').ok_or_else(invalid)?;
        if key.is_empty() {
            return Err(invalid());
        }
        let id = Id::new(key);
        match kind {
            "project" => Ok(Scope::Project(id)),
            "agent" => Ok(Scope::Agent(id)),
            "order" => Ok(Scope::Order(id)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Project(id) => write!(f, "project:{id}"),
            Scope::Agent(id) => write!(f, "agent:{id}"),
            Scope::Order(id) => write!(f, "order:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "projects": {
            "Project-1": { "name": "Herb garden" },
            "Project-2": { "name": "Bakery" }
        },
        "processes": {
            "Process-1": {
                "name": "Harvest", "type": "process", "url": "http://example.org/process/1/",
                "project-id": "Project-1", "order-id": "Order-1",
                "start": "2014-03-01", "end": "2014-03-04", "orphan": false,
                "next": ["ResourceType-1"]
            },
            "Process-2": {
                "name": "Dry", "project-id": "Project-1", "order-id": "",
                "start": "2014-03-05", "end": "2014-03-05", "next": []
            },
            "Process-3": {
                "name": "Bake", "project-id": "Project-2", "order-id": "",
                "start": "2014-04-01", "end": "2014-04-02", "next": []
            }
        },
        "agents": {
            "Agent-7": { "name": "Bob", "type": "agent", "processes": ["Process-3"] }
        },
        "resource_types": {
            "ResourceType-1": {
                "name": "Fresh herbs", "type": "resourcetype",
                "url": "http://example.org/rt/1/", "photo-url": "",
                "next": ["Process-2"]
            }
        },
        "orders": {
            "Order-1": {
                "name": "Order for market", "type": "order", "for": "Market",
                "due": "2014-03-10", "url": "", "processes": ["Process-2"]
            }
        }
    }"#;

    fn network() -> ValueNetwork {
        ValueNetwork::from_json(EXPORT).unwrap()
    }

    fn keys(ids: &[Id]) -> Vec<String> {
        ids.iter().map(Id::as_string).collect()
    }

    #[test]
    fn test_parse_full_export() {
        let network = network();

        assert_eq!(network.projects.len(), 2);
        assert_eq!(network.processes.len(), 3);
        assert_eq!(network.resource_types.len(), 1);

        let harvest = &network.processes[&Id::new("Process-1")];
        assert_eq!(harvest.name, "Harvest");
        assert_eq!(harvest.kind, "process");
        assert_eq!(harvest.project_id, Some(Id::new("Project-1")));
        assert_eq!(harvest.order_id, Some(Id::new("Order-1")));
        assert_eq!(harvest.next, vec![Id::new("ResourceType-1")]);

        let dry = &network.processes[&Id::new("Process-2")];
        assert_eq!(dry.kind, "process");
        assert_eq!(dry.order_id, None);
        assert_eq!(dry.url, None);

        let herbs = &network.resource_types[&Id::new("ResourceType-1")];
        assert_eq!(herbs.photo_url, None);
        assert_eq!(herbs.next, vec![Id::new("Process-2")]);

        let order = &network.orders[&Id::new("Order-1")];
        assert_eq!(order.receiver, "Market");
        assert_eq!(order.url, None);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let network = network();
        let order: Vec<String> = network.processes.keys().map(Id::as_string).collect();
        assert_eq!(order, vec!["Process-1", "Process-2", "Process-3"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let network = ValueNetwork::from_json("{}").unwrap();
        assert_eq!(network, ValueNetwork::default());
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let err = ValueNetwork::from_json("{\n  \"processes\": {,\n}").unwrap_err();
        match err {
            SourceError::Json { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let err = ValueNetwork::from_json(r#"{"processes": {"Process-1": {"name": "x"}}}"#)
            .unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_scope_all() {
        let network = network();
        let ids = network.scoped_processes(&Scope::All).unwrap();
        assert_eq!(keys(&ids), vec!["Process-1", "Process-2", "Process-3"]);
    }

    #[test]
    fn test_scope_project() {
        let network = network();
        let ids = network
            .scoped_processes(&Scope::Project(Id::new("Project-1")))
            .unwrap();
        assert_eq!(keys(&ids), vec!["Process-1", "Process-2"]);
    }

    #[test]
    fn test_scope_agent() {
        let network = network();
        let ids = network
            .scoped_processes(&Scope::Agent(Id::new("Agent-7")))
            .unwrap();
        assert_eq!(keys(&ids), vec!["Process-3"]);
    }

    #[test]
    fn test_scope_order_uses_list_and_order_id() {
        let network = network();
        let ids = network
            .scoped_processes(&Scope::Order(Id::new("Order-1")))
            .unwrap();
        assert_eq!(keys(&ids), vec!["Process-1", "Process-2"]);
    }

    #[test]
    fn test_scope_unknown_target() {
        let network = network();
        let err = network
            .scoped_processes(&Scope::Agent(Id::new("Agent-99")))
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::UnknownScope {
                kind: "agent",
                id: Id::new("Agent-99"),
            }
        );
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("all".parse::<Scope>().unwrap(), Scope::All);
        assert_eq!(
            "project:Project-1".parse::<Scope>().unwrap(),
            Scope::Project(Id::new("Project-1"))
        );
        assert_eq!(
            "agent:Agent-7".parse::<Scope>().unwrap(),
            Scope::Agent(Id::new("Agent-7"))
        );
        assert_eq!(
            "order:Order-1".parse::<Scope>().unwrap(),
            Scope::Order(Id::new("Order-1"))
        );

        for bad in ["", "everything", "project:", "team:Team-1"] {
            assert_eq!(
                bad.parse::<Scope>().unwrap_err(),
                SourceError::InvalidScope(bad.to_string())
            );
        }
    }

    #[test]
    fn test_scope_display_round_trips() {
        let scope = Scope::Order(Id::new("Order-1"));
        assert_eq!(scope.to_string(), "order:Order-1");
        assert_eq!(scope.to_string().parse::<Scope>().unwrap(), scope);
    }
}
