//! Attribute blocks: the run of tagged comments right after a definition
//! or a section declaration.

use super::lookahead::Lookahead;
use crate::error::ParseError;
use crate::model::{AttributeMap, Token, Warning};
use log::warn;

/// Consume consecutive tagged blocks whose tag is not in `stop` and merge
/// them into one map. Stops at the first other token, leaving it unread.
pub fn assemble<I>(
    tokens: &mut Lookahead<I>,
    stop: &[&str],
    known_tags: &[String],
    warnings: &mut Vec<Warning>,
) -> AttributeMap
where
    I: Iterator<Item = Result<Token, ParseError>>,
{
    let mut attrs = AttributeMap::new();

    while let Some(Ok(Token::TaggedBlock {
        tag,
        lines,
        location,
    })) = tokens.next_if(|item| match item {
        Ok(Token::TaggedBlock { tag, .. }) => !stop.contains(&tag.as_str()),
        _ => false,
    }) {
        if !known_tags.iter().any(|k| *k == tag) {
            record(
                warnings,
                Warning::UnknownTag {
                    tag: tag.clone(),
                    location: location.clone(),
                },
            );
        }
        let value = lines.join(" ").trim().to_string();
        if attrs.insert(tag.clone(), value).is_some() {
            record(warnings, Warning::TagOverwritten { tag, location });
        }
    }

    attrs
}

/// Log a warning and keep it for the caller.
pub fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{warning}");
    warnings.push(warning);
}
