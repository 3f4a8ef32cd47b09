use crate::error::{Result, TextError};

/// Decides whether a character contributes to the measured width of a line.
///
/// Characters that are not rendered still get a glyph slot in the layout so
/// callers can place cursors on them.
pub trait IsCharacterRendered {
    fn is_character_rendered(&self, character: char) -> bool;
}

impl<F> IsCharacterRendered for F
where
    F: Fn(char) -> bool,
{
    fn is_character_rendered(&self, character: char) -> bool {
        self(character)
    }
}

/// Default classifier, see [`is_normally_rendered`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormallyRendered;

impl IsCharacterRendered for NormallyRendered {
    fn is_character_rendered(&self, character: char) -> bool {
        is_normally_rendered(character)
    }
}

/// Returns `false` for control characters (tabs, line feeds, carriage
/// returns, ...) and for the line/paragraph separators U+2028 and U+2029.
/// Everything else, space included, is rendered.
pub fn is_normally_rendered(character: char) -> bool {
    !(character.is_control() || matches!(character, '\u{2028}' | '\u{2029}'))
}

/// String form of [`is_normally_rendered`] for callers holding text slices.
pub fn character_is_normally_rendered(character: &str) -> Result<bool> {
    single_character(character).map(is_normally_rendered)
}

/// Extracts the only character of `text`.
pub(crate) fn single_character(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(character), None) => Ok(character),
        _ => Err(TextError::InvalidInput {
            count: text.chars().count(),
        }),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_characters() {
        let cases = [
            (" ", true),
            ("\n", false),
            ("\t", false),
            ("\r", false),
            ("\u{2028}", false),
            ("\u{2029}", false),
            ("\u{0085}", false),
            ("a", true),
            ("A", true),
            ("食", true),
        ];
        for (character, expected) in cases {
            assert_eq!(
                character_is_normally_rendered(character).unwrap(),
                expected,
                "{character:?}"
            );
        }
    }

    #[test]
    fn rejects_wrong_character_count() {
        assert!(matches!(
            character_is_normally_rendered("ab"),
            Err(TextError::InvalidInput { count: 2 })
        ));
        assert!(matches!(
            character_is_normally_rendered(""),
            Err(TextError::InvalidInput { count: 0 })
        ));
    }

    #[test]
    fn closures_are_classifiers() {
        let only_letters = |c: char| c.is_alphabetic();
        assert!(only_letters.is_character_rendered('x'));
        assert!(!only_letters.is_character_rendered(' '));
        assert!(NormallyRendered.is_character_rendered(' '));
    }
}
