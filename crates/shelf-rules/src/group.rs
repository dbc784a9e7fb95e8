//! Rule groups: the recursive AND/OR tree behind magic shelves.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::trace;

use crate::book::Book;
use crate::error::Result;
use crate::rule::{Rule, Scope};

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    #[default]
    And,
    Or,
}

/// A child of a group: either a leaf rule or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleNode {
    Group(Group),
    Rule(Rule),
}

/// A boolean tree of rules.
///
/// An `and` group with no children matches everything; an `or` group with
/// no children matches nothing.
///
/// # Example
///
/// ```
/// use shelf_rules::{Group, Rule};
///
/// let shelf = Group::and()
///     .rule(Rule::new("fileType", "equals", "epub"))
///     .group(
///         Group::or()
///             .rule(Rule::new("readStatus", "equals", "UNREAD"))
///             .rule(Rule::new("readStatus", "equals", "PAUSED")),
///     );
/// assert_eq!(shelf.rules.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub join: Join,
    #[serde(default)]
    pub rules: Vec<RuleNode>,
}

impl Group {
    pub fn new(join: Join) -> Self {
        Group {
            join,
            rules: Vec::new(),
        }
    }

    /// An empty `and` group.
    pub fn and() -> Self {
        Group::new(Join::And)
    }

    /// An empty `or` group.
    pub fn or() -> Self {
        Group::new(Join::Or)
    }

    /// Appends a leaf rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(RuleNode::Rule(rule));
        self
    }

    /// Appends a nested group.
    pub fn group(mut self, group: Group) -> Self {
        self.rules.push(RuleNode::Group(group));
        self
    }

    /// Evaluates the tree against a record, depth first.
    pub fn matches(&self, book: &Book, scope: &Scope<'_>) -> bool {
        let mut children = self.rules.iter().map(|node| node.matches(book, scope));
        let result = match self.join {
            Join::And => children.all(|m| m),
            Join::Or => children.any(|m| m),
        };
        trace!(
            join = ?self.join,
            children = self.rules.len(),
            book = book.id,
            result,
            "group evaluated"
        );
        result
    }

    /// Whether any rule in the tree uses a series composite field.
    pub fn has_composite(&self) -> bool {
        self.rules.iter().any(|node| match node {
            RuleNode::Rule(rule) => rule.field.is_composite(),
            RuleNode::Group(group) => group.has_composite(),
        })
    }

    /// Parses a persisted rule group.
    pub fn from_json(json: &str) -> Result<Group> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the group in its persisted shape.
    ///
    /// Null leaves are removed at every depth, and date-typed values under
    /// absolute operators are written as `YYYY-MM-DD`.
    pub fn to_persisted_json(&self) -> Result<Json> {
        let mut json = serde_json::to_value(self.to_persisted())?;
        strip_nulls(&mut json);
        Ok(json)
    }

    fn to_persisted(&self) -> Group {
        Group {
            join: self.join,
            rules: self
                .rules
                .iter()
                .map(|node| match node {
                    RuleNode::Rule(rule) => RuleNode::Rule(rule.to_persisted()),
                    RuleNode::Group(group) => RuleNode::Group(group.to_persisted()),
                })
                .collect(),
        }
    }
}

impl RuleNode {
    pub fn matches(&self, book: &Book, scope: &Scope<'_>) -> bool {
        match self {
            RuleNode::Rule(rule) => rule.matches(book, scope),
            RuleNode::Group(group) => group.matches(book, scope),
        }
    }
}

impl From<Rule> for RuleNode {
    fn from(rule: Rule) -> Self {
        RuleNode::Rule(rule)
    }
}

impl From<Group> for RuleNode {
    fn from(group: Group) -> Self {
        RuleNode::Group(group)
    }
}

fn strip_nulls(json: &mut Json) {
    match json {
        Json::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Json::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}
