//! Splitting a dialogue command line into typed arguments.

use crate::{
    error::CommandError,
    value::{VariableKind, VariableValue},
    variable::PREFIX,
};

/// Single word of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// Text without the surrounding quotes.
    pub(crate) text: String,
    /// Whether any part of the word was quoted.
    pub(crate) quoted: bool,
}

impl Token {
    /// Whether the word names a variable, quoted words never do.
    pub(crate) fn is_variable(&self) -> bool {
        !self.quoted && self.text.starts_with(PREFIX)
    }
}

/// Split a `<<name arg "quoted arg">>` line into its words.
///
/// The surrounding angle brackets are optional.
/// Double quotes group words, `\"` inside quotes is a literal quote.
pub(crate) fn tokenize(line: &str) -> Result<Vec<Token>, CommandError> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix("<<").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(">>").unwrap_or(trimmed);

    let mut tokens = Vec::new();
    let mut current = String::new();
    // Whether the current token was quoted, so `""` yields an empty argument
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = trimmed.chars();
    while let Some(char) = chars.next() {
        match char {
            '\\' if in_quotes => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            char if char.is_whitespace() && !in_quotes => {
                if quoted || !current.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                }
                quoted = false;
            }
            char => current.push(char),
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote(line.to_owned()));
    }

    if quoted || !current.is_empty() {
        tokens.push(Token {
            text: current,
            quoted,
        });
    }

    if tokens.is_empty() {
        return Err(CommandError::Empty);
    }

    Ok(tokens)
}

/// Convert a single word into the declared parameter kind.
///
/// Returns `None` when the word can't be parsed.
pub(crate) fn parse_argument(token: &str, kind: VariableKind) -> Option<VariableValue> {
    match kind {
        VariableKind::String => Some(VariableValue::from(token)),
        VariableKind::Float => token.parse::<f32>().ok().map(VariableValue::Float),
        VariableKind::Bool => {
            if token.eq_ignore_ascii_case("true") {
                Some(VariableValue::Bool(true))
            } else if token.eq_ignore_ascii_case("false") {
                Some(VariableValue::Bool(false))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_argument, tokenize};
    use crate::{
        error::CommandError,
        value::{VariableKind, VariableValue},
    };

    /// Text of every word.
    fn words(line: &str) -> Vec<String> {
        tokenize(line)
            .unwrap()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn split_on_whitespace() {
        assert_eq!(words("<<give  sword   2>>"), ["give", "sword", "2"]);
        assert_eq!(words("wave"), ["wave"]);
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            words(r#"<<say "Hello there" "" "a \"b\"">>"#),
            ["say", "Hello there", "", "a \"b\""]
        );
    }

    #[test]
    fn quoted_words_are_not_variables() {
        let tokens = tokenize(r#"<<give $gold "$100 prize">>"#).unwrap();

        assert!(!tokens[0].is_variable());
        assert!(tokens[1].is_variable());
        assert!(tokens[2].quoted);
        assert!(!tokens[2].is_variable());
        assert_eq!(tokens[2].text, "$100 prize");
    }

    #[test]
    fn unterminated_quote() {
        assert_eq!(
            tokenize(r#"<<say "Hello>>"#),
            Err(CommandError::UnterminatedQuote(r#"<<say "Hello>>"#.to_owned()))
        );
    }

    #[test]
    fn empty_line() {
        assert_eq!(tokenize("<< >>"), Err(CommandError::Empty));
        assert_eq!(tokenize(""), Err(CommandError::Empty));
    }

    #[test]
    fn arguments_by_kind() {
        assert_eq!(
            parse_argument("1.5", VariableKind::Float),
            Some(VariableValue::from(1.5))
        );
        assert_eq!(
            parse_argument("TRUE", VariableKind::Bool),
            Some(VariableValue::from(true))
        );
        assert_eq!(
            parse_argument("2", VariableKind::String),
            Some(VariableValue::from("2"))
        );
        assert_eq!(parse_argument("yes", VariableKind::Bool), None);
        assert_eq!(parse_argument("many", VariableKind::Float), None);
    }
}
