use crate::params::{KindTag, ParamKind, Value};
use crate::{EnumDef, Principal, StaticHost, ValueError};
use chrono::TimeDelta;

fn host() -> StaticHost {
    StaticHost::new().with_principal(Principal::new(7, "Alice")).with_principal(Principal::new(9, "Bob"))
}

fn colors() -> ParamKind {
    ParamKind::Enum(EnumDef::new("color", ["red", "green", "blue"]))
}

#[test]
fn conversion_examples_accepted() {
    let host = host();
    // Array of (kind, input, expected)
    let cases: Vec<(ParamKind, &str, Value)> = vec![
        (ParamKind::Text, "anything at all", Value::Text("anything at all".into())),
        (ParamKind::Text, "42", Value::Text("42".into())),
        (ParamKind::Bool, "yes", Value::Bool(true)),
        (ParamKind::Bool, "ON", Value::Bool(true)),
        (ParamKind::Bool, "0", Value::Bool(false)),
        (ParamKind::Bool, "n", Value::Bool(false)),
        (ParamKind::Int, "42", Value::Int(42)),
        (ParamKind::Int, "-17", Value::Int(-17)),
        (ParamKind::Int, "+5", Value::Int(5)),
        (ParamKind::Float, "2.5", Value::Float(2.5)),
        (ParamKind::Float, "-0.25", Value::Float(-0.25)),
        (ParamKind::Float, "3", Value::Float(3.0)),
        (ParamKind::Float, "1e3", Value::Float(1000.0)),
        (ParamKind::Id, "42", Value::Id(42)),
        (ParamKind::Id, "#42", Value::Id(42)),
        (ParamKind::Id, "18446744073709551615", Value::Id(u64::MAX)),
        (ParamKind::Principal, "alice", Value::Principal(Principal::new(7, "Alice"))),
        (ParamKind::Principal, "#9", Value::Principal(Principal::new(9, "Bob"))),
        (ParamKind::Vector2, "1,2", Value::Vector2([1.0, 2.0])),
        (ParamKind::Vector2, "[0.5 -1]", Value::Vector2([0.5, -1.0])),
        (ParamKind::Vector3, "1,2,3", Value::Vector3([1.0, 2.0, 3.0])),
        (ParamKind::Vector3, "(1, 2.5, -3)", Value::Vector3([1.0, 2.5, -3.0])),
        (ParamKind::Vector3, "10 20 30", Value::Vector3([10.0, 20.0, 30.0])),
        (ParamKind::Duration, "90s", Value::Duration(TimeDelta::seconds(90))),
        (ParamKind::Duration, "5m", Value::Duration(TimeDelta::minutes(5))),
        (ParamKind::Duration, "1h30m", Value::Duration(TimeDelta::minutes(90))),
        (ParamKind::Duration, "1h 30m", Value::Duration(TimeDelta::minutes(90))),
        (ParamKind::Duration, "2D", Value::Duration(TimeDelta::days(2))),
        (ParamKind::Duration, "1w", Value::Duration(TimeDelta::weeks(1))),
        (colors(), "green", Value::Enum { variant: "green".into(), index: 1 }),
        (colors(), "BLUE", Value::Enum { variant: "blue".into(), index: 2 }),
    ];

    for (kind, input, expected) in cases {
        match kind.try_parse(input, &host) {
            Ok(value) => {
                assert_eq!(value, expected, "{} from '{}'", kind.display_name(), input);
                assert!(value.fits(&kind), "{value:?} should fit {kind:?}");
            }
            Err(err) => panic!("{} rejected '{}': {}", kind.display_name(), input, err),
        }
    }
}

#[test]
fn conversion_examples_rejected() {
    let host = host();
    // Array of (kind, input)
    let cases: Vec<(ParamKind, &str)> = vec![
        (ParamKind::Bool, "maybe"),
        (ParamKind::Int, "abc"),
        (ParamKind::Int, "4.5"),
        (ParamKind::Int, "99999999999999999999"),
        (ParamKind::Float, "inf"),
        (ParamKind::Float, "NaN"),
        (ParamKind::Float, "1.2.3"),
        (ParamKind::Id, "-3"),
        (ParamKind::Id, "#"),
        (ParamKind::Id, "4a"),
        (ParamKind::Id, "99999999999999999999"),
        (ParamKind::Principal, "carol"),
        (ParamKind::Principal, "#31"),
        (ParamKind::Vector2, "1,2,3"),
        (ParamKind::Vector2, "12"),
        (ParamKind::Vector3, "1,2"),
        (ParamKind::Vector3, "a,b,c"),
        (ParamKind::Duration, "90"),
        (ParamKind::Duration, "soon"),
        (ParamKind::Duration, "5x"),
        (colors(), "purple"),
    ];

    for (kind, input) in cases {
        if let Ok(value) = kind.try_parse(input, &host) {
            panic!("{} accepted '{}' as {:?}", kind.display_name(), input, value);
        }
    }
}

#[test]
fn shape_gate_reports_kind_mismatch() {
    let err = ParamKind::Int.try_parse("Sword", &host()).unwrap_err();
    assert_eq!(err, ValueError::Mismatch { token: "Sword".into(), kind: "int".into() });

    // Array of (kind, input) rejected before parsing
    let cases: Vec<(ParamKind, &str)> = vec![
        (ParamKind::Id, "-3"),
        (ParamKind::Id, "4.0"),
        (ParamKind::Id, "(7)"),
        (ParamKind::Int, "#5"),
        (ParamKind::Int, "1,000"),
        (ParamKind::Float, "#1.5"),
        (ParamKind::Duration, "-5m"),
        (ParamKind::Duration, "1.5h"),
        (ParamKind::Vector2, "#1,2"),
    ];
    for (kind, input) in cases {
        let err = kind.try_parse(input, &host()).unwrap_err();
        assert_eq!(err, ValueError::Mismatch { token: input.into(), kind: kind.display_name() });
    }

    let err = colors().try_parse("pink", &host()).unwrap_err();
    assert!(matches!(err, ValueError::UnknownVariant { ref expected, .. } if expected == "red|green|blue"));
}

#[test]
fn id_overflow_is_out_of_range() {
    let err = ParamKind::Id.try_parse("99999999999999999999", &host()).unwrap_err();
    assert!(matches!(err, ValueError::OutOfRange { .. }));
}

#[test]
fn text_is_the_lowest_conversion_weight() {
    let all = [
        KindTag::Text,
        KindTag::Bool,
        KindTag::Int,
        KindTag::Float,
        KindTag::Id,
        KindTag::Principal,
        KindTag::Vector2,
        KindTag::Vector3,
        KindTag::Duration,
        KindTag::Enum,
    ];
    for tag in &all[1..] {
        assert!(tag.weight() > KindTag::Text.weight(), "{} must outweigh text", tag.name());
    }
    assert!(KindTag::Text.weight() > crate::DEFAULT_USED_SCORE);
    assert_eq!(all.len(), crate::params::KIND_COUNT);
}

#[test]
fn numeric_token_prefers_specific_kinds() {
    let host = host();
    let text = ParamKind::Text.try_parse("42", &host).map(|v| v.tag().weight());
    let int = ParamKind::Int.try_parse("42", &host).map(|v| v.tag().weight());
    let id = ParamKind::Id.try_parse("42", &host).map(|v| v.tag().weight());
    assert!(id > int && int > text, "id={id:?} int={int:?} text={text:?}");
}

#[test]
fn value_display_and_accessors() {
    assert_eq!(Value::Text("Iron Sword".into()).to_string(), "\"Iron Sword\"");
    assert_eq!(Value::Id(42).to_string(), "#42");
    assert_eq!(Value::Duration(TimeDelta::minutes(2)).to_string(), "120s");
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::Float(3.0).as_i64(), None);
    assert_eq!(Value::Enum { variant: "red".into(), index: 0 }.as_str(), Some("red"));
}

#[test]
fn defaults_must_fit_their_kind() {
    assert!(Value::Int(1).fits(&ParamKind::Int));
    assert!(!Value::Int(1).fits(&ParamKind::Float));
    assert!(!Value::Enum { variant: "pink".into(), index: 0 }.fits(&colors()));
    assert!(Value::Enum { variant: "red".into(), index: 0 }.fits(&colors()));
}
