/// Iterate over the `{placeholder}` names in a phrase, in order.
///
/// Unterminated braces are ignored.
pub fn placeholders(phrase: &str) -> impl Iterator<Item = &str> {
    let mut rest = phrase;
    std::iter::from_fn(move || {
        loop {
            let open = rest.find('{')?;
            let after = &rest[open + 1..];
            let close = after.find('}')?;
            let name = &after[..close];
            rest = &after[close + 1..];
            if !name.is_empty() && !name.contains('{') {
                return Some(name);
            }
        }
    })
}
