// SPDX-License-Identifier: Apache-2.0

// Re-encodes a document compactly and at a few indent widths

use picojson_codec::{dumps, loads, Error, Value};

fn main() -> Result<(), Error> {
    let input = Value::from(
        r#"{"id": 7, "tags": ["a", "b"], "meta": {"ratio": 0.25, "empty": {}}, "ok": null}"#,
    );
    let value = loads(&input)?;

    for indent in [None, Some(Value::from(0)), Some(Value::from(2)), Some(Value::from(4))] {
        let encoded = dumps(&value, indent.as_ref())?;
        match &indent {
            None => println!("compact:"),
            Some(width) => println!("indent {:?}:", width.as_integer()),
        }
        println!("{}", String::from_utf8_lossy(&encoded));
    }
    Ok(())
}
