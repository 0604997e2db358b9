// SPDX-License-Identifier: Apache-2.0

// Feeds a document through the push parser and the value decoder in small chunks

use picojson_codec::{
    Decoder, Error, ParseEvent, PushParseError, PushParser, PushParserHandler, Value,
};

/// Prints each event indented by nesting level
struct EventPrinter {
    indent: usize,
    event_count: usize,
}

impl EventPrinter {
    fn new() -> Self {
        Self {
            indent: 0,
            event_count: 0,
        }
    }

    fn pad(&self) -> String {
        "  ".repeat(self.indent)
    }
}

impl PushParserHandler<()> for EventPrinter {
    fn handle_event(&mut self, event: ParseEvent<'_>) -> Result<(), ()> {
        self.event_count += 1;
        match event {
            ParseEvent::MapStart => {
                println!("{}MapStart", self.pad());
                self.indent += 1;
            }
            ParseEvent::MapEnd => {
                self.indent = self.indent.saturating_sub(1);
                println!("{}MapEnd", self.pad());
            }
            ParseEvent::ArrayStart => {
                println!("{}ArrayStart", self.pad());
                self.indent += 1;
            }
            ParseEvent::ArrayEnd => {
                self.indent = self.indent.saturating_sub(1);
                println!("{}ArrayEnd", self.pad());
            }
            ParseEvent::MapKey(key) => println!("{}Key: {:?}", self.pad(), key),
            ParseEvent::String(s) => println!("{}String: {:?}", self.pad(), s),
            ParseEvent::Number(n) => {
                let kind = if n.is_integer() { "integer" } else { "float" };
                println!("{}Number ({}): {}", self.pad(), kind, n);
            }
            ParseEvent::Bool(b) => println!("{}Bool: {}", self.pad(), b),
            ParseEvent::Null => println!("{}Null", self.pad()),
            ParseEvent::EndDocument => println!("{}EndDocument", self.pad()),
        }
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    let chunks: [&[u8]; 5] = [
        br#"{"name": "sen"#,
        br#"sor-7", "readings": [1"#,
        br#"2.5, -3, 98765432109876"#,
        br#"543210], "calibrated": tr"#,
        br#"ue, "note": "\u00b0C"}"#,
    ];

    println!("Push parser events");
    println!("==================");
    let mut parser = PushParser::new(EventPrinter::new());
    for chunk in chunks {
        if let Err(PushParseError::Parse(e)) = parser.write::<()>(chunk) {
            return Err(e.into());
        }
    }
    if let Err(PushParseError::Parse(e)) = parser.finish::<()>() {
        return Err(e.into());
    }
    println!("{} events", parser.handler().event_count);
    println!();

    println!("Decoded value");
    println!("=============");
    let mut decoder = Decoder::new();
    for chunk in chunks {
        decoder.feed(chunk)?;
    }
    let value = decoder.finish()?;
    if let Some(Value::Array(readings)) = value.get("readings") {
        for reading in readings {
            println!("reading: {:?}", reading);
        }
    }
    println!("calibrated: {:?}", value.get("calibrated"));
    Ok(())
}
