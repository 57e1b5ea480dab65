//! Autocomplete plist decoding
//!
//! The hints endpoint answers with an XML property list. It is first turned
//! into a generic tree where an element that occurs once under its parent is
//! a bare value and a repeated element is an array, then the terms are read
//! out of `plist > dict > array > dict*`, taking the first `<string>` of each
//! dict.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Suggestion;
use crate::validate::sequence;

/// Element under construction while walking the document.
struct OpenElement {
    name: String,
    text: String,
    children: Vec<(String, Value)>,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: vec![],
        }
    }

    /// Text-only elements become strings; elements with children become
    /// objects keyed by child name.
    fn into_value(self) -> Value {
        if self.children.is_empty() {
            return Value::String(self.text);
        }

        let mut map: Map<String, Value> = Map::new();
        for (name, value) in self.children {
            match map.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(name, value);
                }
            }
        }
        Value::Object(map)
    }
}

/// Decode an XML document into a `{root_name: tree}` value.
///
/// Attributes are dropped. Malformed XML is a validation failure.
pub fn xml_to_value(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    let xml_err = |e: &dyn std::fmt::Display| Error::validation(format!("XML parse error: {}", e));

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push(OpenElement::new(name));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                close_element(OpenElement::new(name), &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(Error::validation("unbalanced closing tag"));
                };
                close_element(element, &mut stack, &mut root);
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| xml_err(&e))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(&e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::validation("XML document ended inside an element"));
    }

    match root {
        Some((name, value)) => {
            let mut map = Map::new();
            map.insert(name, value);
            Ok(Value::Object(map))
        }
        None => Err(Error::validation("XML document has no root element")),
    }
}

fn close_element(
    element: OpenElement,
    stack: &mut [OpenElement],
    root: &mut Option<(String, Value)>,
) {
    let name = element.name.clone();
    let value = element.into_value();
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None => *root = Some((name, value)),
    }
}

/// Check the document is a plist and return its body.
pub fn validate_plist(document: Value) -> Result<Value> {
    match document {
        Value::Object(mut map) => map
            .remove("plist")
            .ok_or_else(|| Error::validation("expected a plist document")),
        _ => Err(Error::validation("expected a plist document")),
    }
}

/// Flatten a validated plist body into suggestion terms.
///
/// Missing or oddly shaped nesting at any level yields no suggestions, and
/// entries with an empty term are dropped.
pub fn decode_suggestions(plist: &Value) -> Vec<Suggestion> {
    let mut terms = Vec::new();

    let Some(root_dict) = plist.get("dict") else {
        return terms;
    };
    for dict in sequence(root_dict) {
        let Some(array) = dict.get("array") else {
            continue;
        };
        for array in sequence(array) {
            let Some(entries) = array.get("dict") else {
                continue;
            };
            for entry in sequence(entries) {
                let term = entry
                    .get("string")
                    .and_then(|s| sequence(s).into_iter().next())
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|term| !term.is_empty());
                if let Some(term) = term {
                    terms.push(Suggestion {
                        term: term.to_string(),
                    });
                }
            }
        }
    }
    terms
}

/// Parse, validate and decode a hints response body.
pub fn parse_suggestions(xml: &str) -> Result<Vec<Suggestion>> {
    let plist = validate_plist(xml_to_value(xml)?)?;
    Ok(decode_suggestions(&plist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suggestion(term: &str) -> Suggestion {
        Suggestion {
            term: term.to_string(),
        }
    }

    #[test]
    fn test_parse_hints_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
        <plist version="1.0">
        <dict>
            <key>title</key><string>Suggestions</string>
            <key>hints</key>
            <array>
                <dict>
                    <key>term</key><string>minecraft</string>
                    <key>url</key><string>https://search.itunes.apple.com/hint?q=minecraft</string>
                </dict>
                <dict>
                    <key>term</key><string>mine &amp; craft</string>
                    <key>priority</key><integer>0</integer>
                </dict>
            </array>
        </dict>
        </plist>"#;

        let suggestions = parse_suggestions(xml).unwrap();
        assert_eq!(
            suggestions,
            vec![
                suggestion("minecraft"),
                suggestion("mine & craft"),
            ]
        );
    }

    #[test]
    fn test_single_dict_is_treated_as_sequence() {
        let xml = "<plist><dict><array><dict><string>minecraft</string></dict></array></dict></plist>";
        let suggestions = parse_suggestions(xml).unwrap();
        assert_eq!(suggestions, vec![suggestion("minecraft")]);
    }

    #[test]
    fn test_decode_from_tree() {
        let plist = json!({"dict": {"array": {"dict": [{"string": ["minecraft"]}]}}});
        assert_eq!(decode_suggestions(&plist), vec![suggestion("minecraft")]);
    }

    #[test]
    fn test_empty_terms_are_dropped() {
        let xml = "<plist><dict><array>\
            <dict><key>term</key><string/></dict>\
            <dict><key>term</key><string>  </string></dict>\
            <dict><key>term</key><string>ok</string></dict>\
            </array></dict></plist>";
        assert_eq!(parse_suggestions(xml).unwrap(), vec![suggestion("ok")]);
    }

    #[test]
    fn test_bare_string_array_yields_nothing() {
        let plist = json!({"dict": {"array": "minecraft"}});
        assert!(decode_suggestions(&plist).is_empty());

        let xml = "<plist><dict><array>minecraft</array></dict></plist>";
        assert!(parse_suggestions(xml).unwrap().is_empty());
    }

    #[test]
    fn test_missing_levels_yield_nothing() {
        assert!(parse_suggestions("<plist></plist>").unwrap().is_empty());
        assert!(parse_suggestions("<plist><dict><key>x</key></dict></plist>").unwrap().is_empty());
        assert!(parse_suggestions("<plist><dict><array/></dict></plist>").unwrap().is_empty());
    }

    #[test]
    fn test_non_plist_document_is_rejected() {
        let err = parse_suggestions("<html><body>error</body></html>").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(matches!(parse_suggestions("<plist><dict></plist>"), Err(Error::Validation(_))));
        assert!(matches!(parse_suggestions("<plist><dict>"), Err(Error::Validation(_))));
        assert!(matches!(parse_suggestions(""), Err(Error::Validation(_))));
    }

    #[test]
    fn test_xml_to_value_groups_repeated_children() {
        let value = xml_to_value("<a><b>1</b><c>x</c><b>2</b></a>").unwrap();
        assert_eq!(value, json!({"a": {"b": ["1", "2"], "c": "x"}}));
    }
}
