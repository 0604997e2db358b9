// SPDX-License-Identifier: Apache-2.0

use picojson_codec::{dumps, encode, EncodeConfig, Value};

fn foo_bar() -> Value {
    [("foo", "bar")].into_iter().collect()
}

fn render(value: &Value, config: &EncodeConfig) -> String {
    String::from_utf8(encode(value, config).unwrap()).unwrap()
}

#[test]
fn test_indent_four() {
    assert_eq!(
        render(&foo_bar(), &EncodeConfig::pretty(4)),
        "{\n    \"foo\": \"bar\"\n}\n"
    );
}

#[test]
fn test_indent_zero() {
    assert_eq!(
        render(&foo_bar(), &EncodeConfig::pretty(0)),
        "{\n\"foo\": \"bar\"\n}\n"
    );
}

#[test]
fn test_negative_indent_is_compact() {
    assert_eq!(
        render(&foo_bar(), &EncodeConfig::default().with_indent(-1)),
        r#"{"foo":"bar"}"#
    );
}

#[test]
fn test_nested_layout() {
    let inner: Value = [
        ("list", Value::Array(vec![Value::from(1), Value::from(2)])),
        ("empty", Value::Array(vec![])),
    ]
    .into_iter()
    .collect();
    let value: Value = [("outer", inner), ("last", Value::Null)]
        .into_iter()
        .collect();
    let expected = "\
{
  \"outer\": {
    \"list\": [
      1,
      2
    ],
    \"empty\": []
  },
  \"last\": null
}
";
    assert_eq!(render(&value, &EncodeConfig::pretty(2)), expected);
}

#[test]
fn test_empty_containers_stay_inline() {
    let config = EncodeConfig::pretty(4);
    assert_eq!(render(&Value::Array(vec![]), &config), "[]\n");
    assert_eq!(render(&Value::Object(Default::default()), &config), "{}\n");
}

#[test]
fn test_top_level_scalar_gets_newline() {
    assert_eq!(render(&Value::from(7), &EncodeConfig::pretty(2)), "7\n");
    assert_eq!(render(&Value::from(7), &EncodeConfig::compact()), "7");
}

#[test]
fn test_dumps_matches_encode() {
    let indent = Value::from(3);
    assert_eq!(
        dumps(&foo_bar(), Some(&indent)).unwrap(),
        encode(&foo_bar(), &EncodeConfig::pretty(3)).unwrap()
    );
}
