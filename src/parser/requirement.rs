//! Tokenizer for comma-separated requirement strings

use crate::domain::{Operator, RequirementPart};
use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

// Operator followed by optional whitespace and the version: >= 1.2.3
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(==|!=|>=|<=|>|<)\s*(.*)$").unwrap());

// Anything starting with an operator-like character that OPERATOR_RE rejected
static OPERATOR_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[=!<>~^]").unwrap());

/// Split a requirement string into `(operator, version)` parts
///
/// Tokens without an operator are read as `>=`. Whitespace around tokens
/// and between operator and version is ignored.
pub fn parse_requirement(text: &str) -> Result<Vec<RequirementPart>, ParseError> {
    text.split(',').map(parse_token).collect()
}

fn parse_token(raw: &str) -> Result<RequirementPart, ParseError> {
    let token = raw.trim();

    if token.is_empty() {
        return Err(ParseError::EmptyConstraint);
    }

    if let Some(caps) = OPERATOR_RE.captures(token) {
        let symbol = caps.get(1).map_or("", |m| m.as_str());
        let version = caps.get(2).map_or("", |m| m.as_str()).trim();

        let op = Operator::from_symbol(symbol).ok_or_else(|| ParseError::UnknownOperator {
            token: token.to_string(),
        })?;

        if version.is_empty() {
            return Err(ParseError::MissingVersion {
                op: symbol.to_string(),
            });
        }

        // `=== 1`, `>== 1`, `<> 1`
        if OPERATOR_LIKE_RE.is_match(version) {
            return Err(ParseError::UnknownOperator {
                token: token.to_string(),
            });
        }

        return Ok(RequirementPart::new(op, version));
    }

    if OPERATOR_LIKE_RE.is_match(token) {
        return Err(ParseError::UnknownOperator {
            token: token.to_string(),
        });
    }

    Ok(RequirementPart::new(Operator::GreaterOrEqual, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<RequirementPart> {
        parse_requirement(text).unwrap()
    }

    #[test]
    fn test_parse_bare_version() {
        assert_eq!(
            parse("1.208"),
            vec![RequirementPart::new(Operator::GreaterOrEqual, "1.208")]
        );
    }

    #[test]
    fn test_parse_every_operator() {
        let parts = parse("== 1, != 2, >= 3, > 4, <= 5, < 6");
        let ops: Vec<_> = parts.iter().map(|p| p.op).collect();
        assert_eq!(
            ops,
            vec![
                Operator::Exact,
                Operator::NotEqual,
                Operator::GreaterOrEqual,
                Operator::Greater,
                Operator::LessOrEqual,
                Operator::Less,
            ]
        );
        let versions: Vec<_> = parts.iter().map(|p| p.version.as_str()).collect();
        assert_eq!(versions, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        assert_eq!(
            parse("  >=1.2 ,!=  1.5,<= 2.0  "),
            vec![
                RequirementPart::new(Operator::GreaterOrEqual, "1.2"),
                RequirementPart::new(Operator::NotEqual, "1.5"),
                RequirementPart::new(Operator::LessOrEqual, "2.0"),
            ]
        );
    }

    #[test]
    fn test_parse_dotted_versions() {
        assert_eq!(
            parse(">= v1.2.3, != v1.2.8"),
            vec![
                RequirementPart::new(Operator::GreaterOrEqual, "v1.2.3"),
                RequirementPart::new(Operator::NotEqual, "v1.2.8"),
            ]
        );
    }

    #[test]
    fn test_parse_single_equals_is_unknown() {
        assert_eq!(
            parse_requirement("= 2"),
            Err(ParseError::UnknownOperator {
                token: "= 2".to_string()
            })
        );
    }

    #[test]
    fn test_parse_unknown_operators() {
        for text in ["~> 1.2", "^1.2", "=== 1", ">== 1", "<> 1", "! 1"] {
            assert!(
                matches!(
                    parse_requirement(text),
                    Err(ParseError::UnknownOperator { .. })
                ),
                "expected unknown operator for {text}"
            );
        }
    }

    #[test]
    fn test_parse_missing_version() {
        assert_eq!(
            parse_requirement(">= 1, <="),
            Err(ParseError::MissingVersion {
                op: "<=".to_string()
            })
        );
    }

    #[test]
    fn test_parse_empty_constraint() {
        assert_eq!(parse_requirement(""), Err(ParseError::EmptyConstraint));
        assert_eq!(parse_requirement(">= 1,"), Err(ParseError::EmptyConstraint));
        assert_eq!(
            parse_requirement(">= 1, , <= 2"),
            Err(ParseError::EmptyConstraint)
        );
    }
}
