//! JSON body rendering

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize `value`, tab-indented when `pretty`
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<Vec<u8>> {
    if !pretty {
        return serde_json::to_vec(value);
    }
    let mut out = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pretty_uses_tabs() {
        let out = to_json_bytes(&json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n\t\"a\": 1\n}");
    }

    #[test]
    fn compact_has_no_whitespace() {
        let out = to_json_bytes(&json!({"a": [1, 2]}), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"a":[1,2]}"#);
    }
}
