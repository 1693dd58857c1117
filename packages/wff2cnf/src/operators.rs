use derive_more::derive::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::error::WffError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn operand_count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Associativity {
    Associative,
    NonAssociative,
}

/// The truth function an operator stands for. Only evaluation looks at it;
/// parsing and rewriting treat operators as opaque lexemes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Connective {
    Negation,
    Conjunction,
    Disjunction,
    Implication,
    Equivalence,
}

impl Connective {
    pub fn arity(self) -> Arity {
        match self {
            Connective::Negation => Arity::Unary,
            Connective::Conjunction
            | Connective::Disjunction
            | Connective::Implication
            | Connective::Equivalence => Arity::Binary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorProperties {
    pub precedence: i32,
    pub associativity: Associativity,
    pub arity: Arity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<Connective>,
}

impl OperatorProperties {
    pub fn new(precedence: i32, associativity: Associativity, arity: Arity) -> Self {
        Self {
            precedence,
            associativity,
            arity,
            connective: None,
        }
    }

    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = Some(connective);
        self
    }
}

/// A resolved operator: its lexeme together with the properties the table
/// declares for it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{lexeme}")]
pub struct Operator {
    lexeme: String,
    properties: OperatorProperties,
}

impl Operator {
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn arity(&self) -> Arity {
        self.properties.arity
    }

    pub fn precedence(&self) -> i32 {
        self.properties.precedence
    }

    pub fn associativity(&self) -> Associativity {
        self.properties.associativity
    }

    pub fn connective(&self) -> Option<Connective> {
        self.properties.connective
    }

    pub fn is_unary(&self) -> bool {
        self.properties.arity == Arity::Unary
    }

    /// Ties count as "higher", so equal-precedence binary chains group to
    /// the left.
    pub fn has_higher_or_equal_precedence(&self, other: &Operator) -> bool {
        self.precedence() >= other.precedence()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    No,
    /// The text is a strict prefix of at least one operator lexeme.
    Partial,
    Exact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, OperatorProperties>",
    into = "IndexMap<String, OperatorProperties>"
)]
pub struct OperatorTable {
    operators: IndexMap<String, OperatorProperties>,
}

impl TryFrom<IndexMap<String, OperatorProperties>> for OperatorTable {
    type Error = WffError;

    fn try_from(operators: IndexMap<String, OperatorProperties>) -> Result<Self, Self::Error> {
        OperatorTable::new(operators)
    }
}

impl From<OperatorTable> for IndexMap<String, OperatorProperties> {
    fn from(table: OperatorTable) -> Self {
        table.operators
    }
}

impl OperatorTable {
    pub fn new<L: Into<String>>(
        operators: impl IntoIterator<Item = (L, OperatorProperties)>,
    ) -> Result<Self, WffError> {
        let mut table = OperatorTable::default();

        for (lexeme, properties) in operators {
            let lexeme = lexeme.into();

            if lexeme.is_empty() {
                return Err(WffError::invalid_config("operator lexemes cannot be empty"));
            }

            if lexeme
                .chars()
                .any(|c| c.is_whitespace() || c == '(' || c == ')')
            {
                return Err(WffError::invalid_config(format!(
                    "operator '{lexeme}' cannot contain whitespace or parentheses"
                )));
            }

            if let Some(connective) = properties.connective {
                if connective.arity() != properties.arity {
                    return Err(WffError::invalid_config(format!(
                        "operator '{lexeme}' is {} but stands for {connective}",
                        properties.arity
                    )));
                }
            }

            if table.operators.insert(lexeme.clone(), properties).is_some() {
                return Err(WffError::invalid_config(format!(
                    "operator '{lexeme}' is declared twice"
                )));
            }
        }

        Ok(table)
    }

    /// `!` (unary, 3), `*` (2), `+` (1) and `=>` (0).
    pub fn standard() -> Self {
        use Associativity::*;

        OperatorTable {
            operators: IndexMap::from([
                (
                    "!".to_owned(),
                    OperatorProperties::new(3, NonAssociative, Arity::Unary)
                        .with_connective(Connective::Negation),
                ),
                (
                    "*".to_owned(),
                    OperatorProperties::new(2, Associative, Arity::Binary)
                        .with_connective(Connective::Conjunction),
                ),
                (
                    "+".to_owned(),
                    OperatorProperties::new(1, Associative, Arity::Binary)
                        .with_connective(Connective::Disjunction),
                ),
                (
                    "=>".to_owned(),
                    OperatorProperties::new(0, NonAssociative, Arity::Binary)
                        .with_connective(Connective::Implication),
                ),
            ]),
        }
    }

    pub fn matches(&self, text: &str) -> MatchLevel {
        if self.operators.contains_key(text) {
            MatchLevel::Exact
        } else if self
            .operators
            .keys()
            .any(|lexeme| lexeme.len() > text.len() && lexeme.starts_with(text))
        {
            MatchLevel::Partial
        } else {
            MatchLevel::No
        }
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.matches(text) == MatchLevel::Exact
    }

    pub fn get(&self, lexeme: &str) -> Option<Operator> {
        self.operators.get(lexeme).map(|properties| Operator {
            lexeme: lexeme.to_owned(),
            properties: *properties,
        })
    }

    pub fn properties(&self, lexeme: &str) -> Option<&OperatorProperties> {
        self.operators.get(lexeme)
    }

    /// Length in characters of the longest operator lexeme at the start of
    /// `text`.
    ///
    /// The candidate grows one character at a time for as long as it is still
    /// a prefix of some operator, remembering the last exact hit.
    pub fn longest_match(&self, text: &str) -> Option<usize> {
        let mut longest = None;

        for (count, (index, c)) in text.char_indices().enumerate() {
            let end = index + c.len_utf8();

            match self.matches(&text[..end]) {
                MatchLevel::Exact => longest = Some(count + 1),
                MatchLevel::Partial => {}
                MatchLevel::No => break,
            }
        }

        longest
    }

    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        self.operators
            .iter()
            .map(|(lexeme, properties)| Operator {
                lexeme: lexeme.clone(),
                properties: *properties,
            })
    }
}
