//! Tokenizer for one logical line of the translation file format: the
//! decoding front-end for component F.

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Quoted(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(s) | Token::Quoted(s) => s,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, Token::Quoted(_))
    }
}

/// Decode a whole file's bytes as UTF-16 (BOM optional, either endianness,
/// per §6 "Encoding"). Defaults to little-endian when no BOM is present.
pub fn decode_utf16(bytes: &[u8]) -> String {
    let (text, _, _had_errors) = encoding_rs::UTF_16LE.decode(bytes);
    text.into_owned()
}

/// Split one line into whitespace-delimited words and double-quoted
/// strings. Quoted strings support `\"` and `\\` escapes and are stored
/// verbatim apart from dequoting (§4.F).
pub fn tokenize_line(line: &str, line_no: usize) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut tokens = Vec::new();

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '"' {
            let mut s = String::new();
            i += 1;
            let mut terminated = false;
            while i < chars.len() {
                let ch = chars[i];
                if ch == '\\' && i + 1 < chars.len() && (chars[i + 1] == '"' || chars[i + 1] == '\\')
                {
                    s.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                if ch == '"' {
                    terminated = true;
                    i += 1;
                    break;
                }
                s.push(ch);
                i += 1;
            }
            if !terminated {
                return Err(ParseError::UnterminatedString { line: line_no });
            }
            tokens.push(Token::Quoted(s));
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '"' {
                i += 1;
            }
            tokens.push(Token::Word(chars[start..i].iter().collect()));
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_on_whitespace() {
        let tokens = tokenize_line("3 a b c", 1).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("3".into()),
                Token::Word("a".into()),
                Token::Word("b".into()),
                Token::Word("c".into()),
            ]
        );
    }

    #[test]
    fn parses_quoted_string_with_spaces() {
        let tokens = tokenize_line(r#"# "hello world" negate 1"#, 1).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("#".into()),
                Token::Quoted("hello world".into()),
                Token::Word("negate".into()),
                Token::Word("1".into()),
            ]
        );
    }

    #[test]
    fn handles_escaped_quote_and_backslash() {
        let tokens = tokenize_line(r#""say \"hi\" \\now""#, 1).unwrap();
        assert_eq!(tokens, vec![Token::Quoted(r#"say "hi" \now"#.into())]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize_line(r#""unterminated"#, 1).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { line: 1 }));
    }

    #[test]
    fn decodes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for c in "hi".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        assert_eq!(decode_utf16(&bytes), "hi");
    }

    #[test]
    fn decodes_utf16be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for c in "hi".encode_utf16() {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
        assert_eq!(decode_utf16(&bytes), "hi");
    }

    #[test]
    fn decodes_utf16le_without_bom() {
        let mut bytes = Vec::new();
        for c in "hi".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        assert_eq!(decode_utf16(&bytes), "hi");
    }
}
