//! Post-lexical splitting of compound arguments such as `image:tag`
//!
//! Only unquoted literals are scanned. Quoted strings and variable
//! references are never split, so `'alpine:3.18'` stays one image.

use crate::tree::{Argument, ArgumentContent, Literal};

/// Split `argument` at the first `separator` found in an unquoted literal
///
/// Returns `None` when no plain literal contains the separator. The left
/// part keeps the argument's own prefix; the right part starts empty. An
/// empty side is returned as an empty argument so the separator can still
/// be printed.
pub fn split_argument(argument: &Argument, separator: char) -> Option<(Argument, Argument)> {
    let (content_index, byte_index) =
        argument
            .contents
            .iter()
            .enumerate()
            .find_map(|(index, content)| match content {
                ArgumentContent::Literal(literal) if literal.quote.is_none() => {
                    literal.text.find(separator).map(|offset| (index, offset))
                }
                _ => None,
            })?;

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (index, content) in argument.contents.iter().enumerate() {
        if index < content_index {
            left.push(content.clone());
            continue;
        }
        if index > content_index {
            right.push(content.clone());
            continue;
        }

        let ArgumentContent::Literal(literal) = content else {
            continue;
        };
        let head = &literal.text[..byte_index];
        let tail = &literal.text[byte_index + separator.len_utf8()..];

        if !head.is_empty() || !literal.prefix.is_empty() {
            left.push(
                Literal {
                    text: head.to_string(),
                    ..literal.clone()
                }
                .into(),
            );
        }
        if !tail.is_empty() {
            right.push(Literal::plain(tail).into());
        }
    }

    let left = Argument {
        contents: left,
        ..argument.clone()
    };
    Some((left, Argument::new(right)))
}

/// Image reference parts of a FROM
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReference {
    pub image: Argument,
    pub tag: Option<Argument>,
    pub digest: Option<Argument>,
}

/// `name[:tag|@digest]`; a digest separator takes precedence over a tag
pub fn split_image_reference(argument: &Argument) -> ImageReference {
    if let Some((image, digest)) = split_argument(argument, '@') {
        return ImageReference {
            image,
            tag: None,
            digest: Some(digest),
        };
    }
    if let Some((image, tag)) = split_argument(argument, ':') {
        return ImageReference {
            image,
            tag: Some(tag),
            digest: None,
        };
    }
    ImageReference {
        image: argument.clone(),
        tag: None,
        digest: None,
    }
}

/// `user[:group]`
pub fn split_user(argument: &Argument) -> (Argument, Option<Argument>) {
    match split_argument(argument, ':') {
        Some((user, group)) => (user, Some(group)),
        None => (argument.clone(), None),
    }
}
