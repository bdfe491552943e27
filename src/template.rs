use crate::error::{Error, ErrorType, Result, SourceRange};
use logos::Logos;

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenType {
    #[regex("[ \t]+")]
    Whitespace,
    #[token(",")]
    Comma,

    #[regex(r"\$[a-zA-Z0-9]+")]
    Placeholder,
    #[regex(r"\[[^\] \t,]*\]?")]
    Memory,
    #[regex(r"[a-zA-Z0-9_.]+")]
    Word,
}

/// The closed set of operand placeholders a template may contain, each with
/// the byte width its encoded form occupies at the end of the instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaceholderKind {
    I8,
    U8,
    I32,
    U32,
    U64,
    Label,
    Addr,
}

impl PlaceholderKind {
    pub fn parse(name: &str) -> Option<Self> {
        use PlaceholderKind::*;

        match name {
            "i8" => Some(I8),
            "u8" => Some(U8),
            "i32" => Some(I32),
            "u32" => Some(U32),
            "u64" => Some(U64),
            "label" => Some(Label),
            "addr" => Some(Addr),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        use PlaceholderKind::*;

        match self {
            I8 | U8 => 1,
            I32 | U32 | Label => 4,
            U64 | Addr => 8,
        }
    }

    pub fn name(self) -> &'static str {
        use PlaceholderKind::*;

        match self {
            I8 => "i8",
            U8 => "u8",
            I32 => "i32",
            U32 => "u32",
            U64 => "u64",
            Label => "label",
            Addr => "addr",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Placeholder(PlaceholderKind),
    Memory,
}

#[derive(Debug, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    pub range: SourceRange,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: &'a str, range: SourceRange) -> Self {
        Self { kind, value, range }
    }
}

#[derive(Debug)]
pub struct Template<'a> {
    pub text: &'a str,
    pub range: SourceRange,
    pub tokens: Vec<Token<'a>>,
}

impl<'a> Template<'a> {
    pub fn placeholder(&self) -> Option<(&Token<'a>, PlaceholderKind)> {
        self.tokens.iter().find_map(|token| match token.kind {
            TokenKind::Placeholder(kind) => Some((token, kind)),
            _ => None,
        })
    }

    /// The raw first whitespace-delimited token of the original template
    /// text, before any identifier derivation.
    pub fn mnemonic(&self) -> Option<&'a str> {
        self.text.split_whitespace().next()
    }
}

pub fn parse_template(text: &str, offset: usize) -> Result<Template> {
    let mut lex = TokenType::lexer(text);

    let mut tokens = vec![];

    while let Some(token_type) = lex.next() {
        let range = lex.span().start + offset..lex.span().end + offset;

        match token_type {
            Err(_) => {
                return Err(Error::new_with_range(
                    ErrorType::Template,
                    format!("Unknown character in template '{text}'"),
                    range,
                ))
            }
            Ok(TokenType::Whitespace) | Ok(TokenType::Comma) => continue,
            Ok(TokenType::Placeholder) => {
                let kind = PlaceholderKind::parse(&lex.slice()[1..]).ok_or_else(|| {
                    Error::new_with_range(
                        ErrorType::Template,
                        format!("Unsupported operand kind '{}'", lex.slice()),
                        range.clone(),
                    )
                })?;
                tokens.push(Token::new(TokenKind::Placeholder(kind), lex.slice(), range));
            }
            Ok(TokenType::Memory) => {
                if !lex.slice().ends_with(']') {
                    return Err(Error::new_with_range(
                        ErrorType::Template,
                        format!("Malformed memory operand in template '{text}'"),
                        range,
                    ));
                }
                tokens.push(Token::new(TokenKind::Memory, lex.slice(), range));
            }
            Ok(TokenType::Word) => tokens.push(Token::new(TokenKind::Word, lex.slice(), range)),
        }
    }

    Ok(Template {
        text,
        range: offset..offset + text.len(),
        tokens,
    })
}

/// Loads newline-separated templates in file order, stripping only the line
/// terminator. No further filtering or validation happens here.
pub fn parse_templates(source: &str) -> Result<Vec<Template>> {
    let mut templates = vec![];
    let mut offset = 0;

    for line in source.split('\n') {
        // a terminator on the last line does not start a new template
        if offset == source.len() && line.is_empty() {
            break;
        }

        let text = line.strip_suffix('\r').unwrap_or(line);
        templates.push(parse_template(text, offset)?);

        offset += line.len() + 1;
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::PlaceholderKind::*;
    use super::TokenKind::*;
    use super::*;

    fn get_tokens(input: &str) -> Vec<Token> {
        let template = parse_template(input, 0);
        assert!(template.is_ok());
        template.unwrap().tokens
    }

    #[test]
    fn template_empty() {
        let tokens = get_tokens("");
        assert_eq!(tokens.len(), 0);
    }

    #[test]
    fn template_words() {
        let tokens = get_tokens("xor rax, rax");

        assert_eq!(tokens[0], Token::new(Word, "xor", 0..3));
        assert_eq!(tokens[1], Token::new(Word, "rax", 4..7));
        assert_eq!(tokens[2], Token::new(Word, "rax", 9..12));
    }

    #[test]
    fn template_placeholder() {
        let tokens = get_tokens("mov r12, $u64");

        assert_eq!(tokens[2], Token::new(Placeholder(U64), "$u64", 9..13));
    }

    #[test]
    fn template_placeholder_kinds() {
        for (text, kind, width) in [
            ("$i8", I8, 1),
            ("$u8", U8, 1),
            ("$i32", I32, 4),
            ("$u32", U32, 4),
            ("$u64", U64, 8),
            ("$label", Label, 4),
            ("$addr", Addr, 8),
        ] {
            let tokens = get_tokens(text);
            assert_eq!(tokens[0].kind, Placeholder(kind));
            assert_eq!(kind.width(), width);
        }
    }

    #[test]
    fn template_memory_operand() {
        let tokens = get_tokens("inc byte [rbx+r8]");

        assert_eq!(tokens[0], Token::new(Word, "inc", 0..3));
        assert_eq!(tokens[1], Token::new(Word, "byte", 4..8));
        assert_eq!(tokens[2], Token::new(Memory, "[rbx+r8]", 9..17));
    }

    #[test]
    fn template_trailing_comma_stripped() {
        let tokens = get_tokens("mov [rax+8], $i32");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::new(Memory, "[rax+8]", 4..11));
        assert_eq!(tokens[2], Token::new(Placeholder(I32), "$i32", 13..17));
    }

    #[test]
    fn template_unterminated_memory_operand() {
        let template = parse_template("mov [rax+8", 0);

        assert!(template.is_err());
        let error = template.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Template);
        assert!(error.message.contains("mov [rax+8"));
    }

    #[test]
    fn template_unknown_placeholder_kind() {
        let template = parse_template("mov xmm0, $f64", 0);

        assert!(template.is_err());
        let error = template.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Template);
        assert!(error.message.contains("$f64"));
    }

    #[test]
    fn template_unknown_character() {
        let template = parse_template("mov rax, #12", 0);

        assert!(template.is_err());
    }

    #[test]
    fn templates_preserve_order_and_offsets() {
        let templates = parse_templates("ret\nje $label\n").unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].text, "ret");
        assert_eq!(templates[0].range, 0..3);
        assert_eq!(templates[1].text, "je $label");
        assert_eq!(templates[1].range, 4..13);
    }

    #[test]
    fn templates_without_trailing_terminator() {
        let templates = parse_templates("ret").unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].text, "ret");
    }
}
