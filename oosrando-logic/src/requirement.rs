use std::fmt::{self, Display, Formatter};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use serde_json::Value;

use crate::graph::BuildError;

/// A requirement expression, as written in a logic table.
///
/// `Ref` names either another node of the graph or, if no node of that name
/// is declared, an atom whose truth comes from the queried state. The other
/// variants are the combinators; they may be nested inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    Ref(String),
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
    /// Satisfied only under hard difficulty, and only if the operand is.
    Hard(Box<Requirement>),
    /// Same as `Hard(And(..))`.
    HardAnd(Vec<Requirement>),
    /// Same as `Hard(Or(..))`.
    HardOr(Vec<Requirement>),
}

impl From<&str> for Requirement {
    fn from(name: &str) -> Self {
        Requirement::Ref(name.to_string())
    }
}

impl From<String> for Requirement {
    fn from(name: String) -> Self {
        Requirement::Ref(name)
    }
}

impl From<&String> for Requirement {
    fn from(name: &String) -> Self {
        Requirement::Ref(name.clone())
    }
}

pub fn and<I, R>(reqs: I) -> Requirement
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement>,
{
    Requirement::And(reqs.into_iter().map(Into::into).collect())
}

pub fn or<I, R>(reqs: I) -> Requirement
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement>,
{
    Requirement::Or(reqs.into_iter().map(Into::into).collect())
}

pub fn hard(req: impl Into<Requirement>) -> Requirement {
    Requirement::Hard(Box::new(req.into()))
}

pub fn hard_and<I, R>(reqs: I) -> Requirement
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement>,
{
    Requirement::HardAnd(reqs.into_iter().map(Into::into).collect())
}

pub fn hard_or<I, R>(reqs: I) -> Requirement
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement>,
{
    Requirement::HardOr(reqs.into_iter().map(Into::into).collect())
}

/// `and!("bracelet", or!("ember seeds", "bombs"))`
#[macro_export]
macro_rules! and {
    ($($req:expr),+ $(,)?) => {
        $crate::Requirement::And(vec![$($crate::Requirement::from($req)),+])
    };
}

#[macro_export]
macro_rules! or {
    ($($req:expr),+ $(,)?) => {
        $crate::Requirement::Or(vec![$($crate::Requirement::from($req)),+])
    };
}

#[macro_export]
macro_rules! hard_and {
    ($($req:expr),+ $(,)?) => {
        $crate::Requirement::HardAnd(vec![$($crate::Requirement::from($req)),+])
    };
}

#[macro_export]
macro_rules! hard_or {
    ($($req:expr),+ $(,)?) => {
        $crate::Requirement::HardOr(vec![$($crate::Requirement::from($req)),+])
    };
}

impl Requirement {
    pub(crate) fn combinator_name(&self) -> &'static str {
        match self {
            Requirement::Ref(_) => "ref",
            Requirement::And(_) => "and",
            Requirement::Or(_) => "or",
            Requirement::Hard(_) => "hard",
            Requirement::HardAnd(_) => "hardAnd",
            Requirement::HardOr(_) => "hardOr",
        }
    }

    /// Whether `name` appears anywhere in this expression tree (not following
    /// references into other nodes).
    pub fn references(&self, name: &str) -> bool {
        match self {
            Requirement::Ref(r) => r == name,
            Requirement::Hard(req) => req.references(name),
            Requirement::And(reqs)
            | Requirement::Or(reqs)
            | Requirement::HardAnd(reqs)
            | Requirement::HardOr(reqs) => reqs.iter().any(|r| r.references(name)),
        }
    }

    /// Checks arity of every combinator in the tree.
    pub(crate) fn validate(&self, node: &str) -> Result<(), BuildError> {
        match self {
            Requirement::Ref(_) => Ok(()),
            Requirement::Hard(req) => req.validate(node),
            Requirement::And(reqs)
            | Requirement::Or(reqs)
            | Requirement::HardAnd(reqs)
            | Requirement::HardOr(reqs) => {
                if reqs.is_empty() {
                    return Err(BuildError::EmptyCombinator {
                        node: node.to_string(),
                        combinator: self.combinator_name(),
                    });
                }
                reqs.iter().try_for_each(|r| r.validate(node))
            }
        }
    }

    /// Parses a requirement from its JSON form: a string is a reference, and
    /// a combinator is an object with a single key (`and`, `or`, `hard`,
    /// `hardAnd`, `hardOr`) whose value is the list of operands.
    pub fn from_json(value: &Value, node: &str) -> Result<Requirement, BuildError> {
        let parse_error = |message: String| BuildError::Parse {
            node: node.to_string(),
            message,
        };
        match value {
            Value::String(name) => Ok(Requirement::Ref(name.clone())),
            Value::Object(obj) => {
                let mut entries = obj.iter();
                let (Some((key, operands)), None) = (entries.next(), entries.next()) else {
                    return Err(parse_error(format!(
                        "expected a single combinator key, found {}",
                        obj.len()
                    )));
                };
                match key.as_str() {
                    "and" => Ok(Requirement::And(parse_operands(operands, node)?)),
                    "or" => Ok(Requirement::Or(parse_operands(operands, node)?)),
                    "hardAnd" => Ok(Requirement::HardAnd(parse_operands(operands, node)?)),
                    "hardOr" => Ok(Requirement::HardOr(parse_operands(operands, node)?)),
                    "hard" => {
                        let mut reqs = match operands {
                            Value::Array(_) => parse_operands(operands, node)?,
                            _ => vec![Requirement::from_json(operands, node)?],
                        };
                        if reqs.len() != 1 {
                            return Err(BuildError::Arity {
                                node: node.to_string(),
                                combinator: "hard",
                                expected: 1,
                                found: reqs.len(),
                            });
                        }
                        Ok(hard(reqs.remove(0)))
                    }
                    other => Err(parse_error(format!("unknown combinator {other:?}"))),
                }
            }
            other => Err(parse_error(format!("unexpected requirement value: {other}"))),
        }
    }
}

fn parse_operands(value: &Value, node: &str) -> Result<Vec<Requirement>, BuildError> {
    let Value::Array(items) = value else {
        return Err(BuildError::Parse {
            node: node.to_string(),
            message: format!("expected a list of operands, found {value}"),
        });
    };
    items.iter().map(|v| Requirement::from_json(v, node)).collect()
}

/// Top-level entries of a JSON logic table, in document order. Repeated keys
/// are kept so that the builder can reject them.
struct TableEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for TableEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = TableEntries;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "an object of node definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TableEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    entries.push((name, value));
                }
                Ok(TableEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses a logic table from a JSON object mapping node names to requirements.
///
/// Entries come back in document order, including repeated names.
pub fn parse_table(json: &str) -> Result<Vec<(String, Requirement)>, BuildError> {
    let TableEntries(entries) =
        serde_json::from_str(json).map_err(|e| BuildError::InvalidTable(e.to_string()))?;
    entries
        .into_iter()
        .map(|(name, v)| {
            let req = Requirement::from_json(&v, &name)?;
            Ok((name, req))
        })
        .collect()
}

fn write_list(f: &mut Formatter<'_>, name: &str, reqs: &[Requirement]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, req) in reqs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{req}")?;
    }
    write!(f, ")")
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Ref(name) => write!(f, "{name:?}"),
            Requirement::Hard(req) => write!(f, "hard({req})"),
            Requirement::And(reqs)
            | Requirement::Or(reqs)
            | Requirement::HardAnd(reqs)
            | Requirement::HardOr(reqs) => write_list(f, self.combinator_name(), reqs),
        }
    }
}
