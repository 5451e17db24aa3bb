//! Training phrase placeholders.
//!
//! Canonical phrases mark inputs as `{name}`. Actions SDK training phrases
//! annotate them as `($name 'name' auto=true)`.

/// Convert `{name}` placeholders to Actions SDK annotations.
pub fn to_native_phrase(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut rest = phrase;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        out.push_str(&rest[..start]);
        out.push_str(&format!("(${} '{}' auto=true)", name, name));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Convert Actions SDK annotations back to `{name}` placeholders.
pub fn from_native_phrase(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut rest = phrase;
    while let Some(start) = rest.find("($") {
        let Some(len) = rest[start..].find(')') else {
            break;
        };
        let annotation = &rest[start + 2..start + len];
        let name = annotation.split_whitespace().next().unwrap_or_default();
        out.push_str(&rest[..start]);
        out.push('{');
        out.push_str(name);
        out.push('}');
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_native() {
        assert_eq!(
            to_native_phrase("my name is {name}"),
            "my name is ($name 'name' auto=true)"
        );
        assert_eq!(
            to_native_phrase("from {from} to {to}"),
            "from ($from 'from' auto=true) to ($to 'to' auto=true)"
        );
        assert_eq!(to_native_phrase("hello"), "hello");
        assert_eq!(to_native_phrase("broken {name"), "broken {name");
    }

    #[test]
    fn test_from_native() {
        assert_eq!(
            from_native_phrase("my name is ($name 'Joe' auto=true)"),
            "my name is {name}"
        );
        assert_eq!(from_native_phrase("($city 'Berlin')"), "{city}");
        assert_eq!(from_native_phrase("say ($x"), "say ($x");
    }

    #[test]
    fn test_placeholders_survive_both_directions() {
        let phrase = "book {count} tickets to {city} please";
        assert_eq!(from_native_phrase(&to_native_phrase(phrase)), phrase);
    }
}
