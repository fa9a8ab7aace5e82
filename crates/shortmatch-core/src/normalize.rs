//! Raw definition → canonical `ProblemDefinition`.
//!
//! The authoring UI stores the rule list as a map keyed by string ordinals.
//! That map is turned into an ordered `Vec<Rule>` here and never used again.

use crate::error::ValidationError;
use crate::model::{non_blank, ProblemDefinition, RawDefinition, RawRule, Rule};

/// Normalize a raw authored definition.
///
/// - `matches` entries are ordered by the numeric value of their key, so
///   `"2"` sorts before `"10"`.
/// - `centralize` and per-rule `valid` are true when the key is present,
///   whatever its value.
/// - Blank `no_match_feedback` / `feedback` become `None`.
///
/// Patterns are not compiled here; a bad pattern surfaces at evaluation.
pub fn normalize(raw: RawDefinition) -> Result<ProblemDefinition, ValidationError> {
    let rules = match raw.matches {
        Some(matches) => order_matches(matches)?
            .into_iter()
            .map(|(ordinal, rule)| normalize_rule(ordinal, rule))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let definition = ProblemDefinition {
        header: raw.header.unwrap_or_default(),
        centralize: raw.centralize.is_present(),
        default_feedback: non_blank(raw.no_match_feedback),
        rules,
    };

    tracing::debug!(
        rules = definition.rules.len(),
        centralize = definition.centralize,
        "normalized problem definition"
    );

    Ok(definition)
}

/// Sort raw matches by numeric ordinal, rejecting bad or repeated keys.
fn order_matches(
    matches: impl IntoIterator<Item = (String, RawRule)>,
) -> Result<Vec<(i64, RawRule)>, ValidationError> {
    let mut ordered = matches
        .into_iter()
        .map(|(key, rule)| match parse_ordinal(&key) {
            Some(ordinal) => Ok((ordinal, rule)),
            None => Err(ValidationError::InvalidOrdinal { key }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    ordered.sort_by_key(|(ordinal, _)| *ordinal);

    if let Some(pair) = ordered.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ValidationError::DuplicateOrdinal { ordinal: pair[0].0 });
    }

    Ok(ordered)
}

/// Parse an ordinal key: optional sign, decimal digits, single `_`
/// separators between digits, surrounding whitespace ignored. Values outside
/// `i64` are rejected.
fn parse_ordinal(key: &str) -> Option<i64> {
    let key = key.trim();
    let digits = key.strip_prefix(['+', '-']).unwrap_or(key);
    let well_formed = !digits.is_empty()
        && digits.split('_').all(|group| {
            !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit())
        });
    if !well_formed {
        return None;
    }
    key.replace('_', "").parse().ok()
}

fn normalize_rule(ordinal: i64, raw: RawRule) -> Result<Rule, ValidationError> {
    let pattern = raw
        .regex
        .ok_or(ValidationError::MissingPattern { ordinal })?;

    Ok(Rule {
        pattern,
        is_valid: raw.valid.is_present(),
        feedback: non_blank(raw.feedback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Presence;

    fn raw_rule(regex: &str) -> RawRule {
        RawRule {
            regex: Some(regex.into()),
            ..Default::default()
        }
    }

    fn from_json(json: &str) -> Result<ProblemDefinition, ValidationError> {
        normalize(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn orders_matches_numerically() {
        let raw = RawDefinition {
            matches: Some(
                [("10".to_string(), raw_rule("ten")), ("2".to_string(), raw_rule("two"))]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        };
        let def = normalize(raw).unwrap();
        let patterns: Vec<&str> = def.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["two", "ten"]);
    }

    #[test]
    fn orders_beyond_nine_rules() {
        let matches = (0..12)
            .map(|i| (i.to_string(), raw_rule(&format!("r{i}"))))
            .collect();
        let def = normalize(RawDefinition {
            matches: Some(matches),
            ..Default::default()
        })
        .unwrap();
        let expected: Vec<String> = (0..12).map(|i| format!("r{i}")).collect();
        let actual: Vec<String> = def.rules.into_iter().map(|r| r.pattern).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn negative_and_padded_ordinals() {
        let def = from_json(
            r#"{"matches": {" 3 ": {"regex": "c"}, "-1": {"regex": "a"}, "+2": {"regex": "b"}}}"#,
        )
        .unwrap();
        let patterns: Vec<&str> = def.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["a", "b", "c"]);
    }

    #[test]
    fn underscore_separated_ordinals() {
        let def = from_json(r#"{"matches": {"1_0": {"regex": "ten"}, "9": {"regex": "nine"}}}"#)
            .unwrap();
        let patterns: Vec<&str> = def.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["nine", "ten"]);
    }

    #[test]
    fn malformed_ordinals_are_rejected() {
        for key in ["", "_1", "1_", "1__0", "+", "1.5", "0x10", "99999999999999999999"] {
            assert_eq!(parse_ordinal(key), None, "key {key:?}");
        }
        assert_eq!(parse_ordinal(" -1_000 "), Some(-1000));
    }

    #[test]
    fn rejects_non_integer_ordinal() {
        let err = from_json(r#"{"matches": {"first": {"regex": "a"}}}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidOrdinal {
                key: "first".into()
            }
        );
    }

    #[test]
    fn rejects_duplicate_ordinal() {
        let err =
            from_json(r#"{"matches": {"1": {"regex": "a"}, "01": {"regex": "b"}}}"#).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateOrdinal { ordinal: 1 });
    }

    #[test]
    fn rejects_match_without_regex() {
        let err = from_json(r#"{"matches": {"4": {"feedback": "hm"}}}"#).unwrap_err();
        assert_eq!(err, ValidationError::MissingPattern { ordinal: 4 });
    }

    #[test]
    fn blank_feedback_becomes_none() {
        let def = from_json(
            r#"{
                "no_match_feedback": "   ",
                "matches": {
                    "0": {"regex": "a", "feedback": ""},
                    "1": {"regex": "b", "feedback": " \t "},
                    "2": {"regex": "c", "feedback": " keep me "}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(def.default_feedback, None);
        assert_eq!(def.rules[0].feedback, None);
        assert_eq!(def.rules[1].feedback, None);
        assert_eq!(def.rules[2].feedback.as_deref(), Some(" keep me "));
    }

    #[test]
    fn empty_default_feedback_is_none() {
        let def = from_json(r#"{"no_match_feedback": ""}"#).unwrap();
        assert_eq!(def.default_feedback, None);
    }

    // The authoring form emits `centralize` only when the box is checked, so
    // presence is the signal. An explicit `false` still centralizes. This is
    // surprising but intentional and must not be "fixed" silently.
    #[test]
    fn centralize_false_still_centralizes() {
        let def = from_json(r#"{"centralize": false}"#).unwrap();
        assert!(def.centralize);
    }

    #[test]
    fn valid_false_still_marks_rule_valid() {
        let def = from_json(r#"{"matches": {"0": {"regex": "a", "valid": false}}}"#).unwrap();
        assert!(def.rules[0].is_valid);
    }

    #[test]
    fn absent_flags_default_to_false() {
        let def = from_json(r#"{"matches": {"0": {"regex": "a"}}}"#).unwrap();
        assert!(!def.centralize);
        assert!(!def.rules[0].is_valid);
    }

    #[test]
    fn missing_fields_give_empty_definition() {
        let def = normalize(RawDefinition::default()).unwrap();
        assert_eq!(def, ProblemDefinition::default());
        assert_eq!(def.header, "");
    }

    #[test]
    fn header_passes_through() {
        let raw = RawDefinition {
            header: Some("What is *2+2*?".into()),
            centralize: Presence::Absent,
            ..Default::default()
        };
        assert_eq!(normalize(raw).unwrap().header, "What is *2+2*?");
    }
}
