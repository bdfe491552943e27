use crate::template::{PlaceholderKind, Template, TokenKind};

/// Semantic type of the single operand an instruction may carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandType {
    Int8,
    UInt8,
    Int32,
    UInt32,
    UInt64,
    RelativeLabel,
    AbsoluteAddress,
}

impl OperandType {
    pub fn rust_type(self) -> &'static str {
        use OperandType::*;

        match self {
            Int8 => "i8",
            UInt8 => "u8",
            Int32 => "i32",
            UInt32 => "u32",
            UInt64 => "u64",
            RelativeLabel => "Self::Label",
            AbsoluteAddress => "Self::Address",
        }
    }
}

impl From<PlaceholderKind> for OperandType {
    fn from(kind: PlaceholderKind) -> Self {
        match kind {
            PlaceholderKind::I8 => OperandType::Int8,
            PlaceholderKind::U8 => OperandType::UInt8,
            PlaceholderKind::I32 => OperandType::Int32,
            PlaceholderKind::U32 => OperandType::UInt32,
            PlaceholderKind::U64 => OperandType::UInt64,
            PlaceholderKind::Label => OperandType::RelativeLabel,
            PlaceholderKind::Addr => OperandType::AbsoluteAddress,
        }
    }
}

pub struct Instruction {
    pub identifier: String,
    pub operand_type: Option<OperandType>,
    pub branch: bool,
    pub bytes: Vec<u8>,
}

impl Instruction {
    pub fn derive(template: &Template, bytes: Vec<u8>) -> Self {
        Self {
            identifier: derive_identifier(template),
            operand_type: classify_operand(template),
            branch: template.mnemonic().map_or(false, is_branch_mnemonic),
            bytes,
        }
    }
}

/// Derives the canonical lowercase underscore-joined name of a template.
/// Label placeholders contribute no segment, every other placeholder
/// contributes its kind name, and memory operands become `ptr_` followed by
/// the bracket interior with `+` spelled out as `_plus_`.
pub fn derive_identifier(template: &Template) -> String {
    let segments: Vec<String> = template
        .tokens
        .iter()
        .filter_map(|token| match token.kind {
            TokenKind::Word => Some(token.value.to_lowercase()),
            TokenKind::Placeholder(PlaceholderKind::Label) => None,
            TokenKind::Placeholder(kind) => Some(kind.name().to_string()),
            TokenKind::Memory => {
                let interior = token.value.trim_start_matches('[').trim_end_matches(']');
                Some(format!("ptr_{}", interior.replace('+', "_plus_")))
            }
        })
        .collect();

    segments.join("_")
}

pub fn classify_operand(template: &Template) -> Option<OperandType> {
    template
        .placeholder()
        .map(|(_, kind)| OperandType::from(kind))
}

/// True for the near-jump mnemonic family: `j` followed by one or two
/// lowercase letters. Matches against the raw mnemonic, not the identifier.
pub fn is_branch_mnemonic(mnemonic: &str) -> bool {
    let mut chars = mnemonic.chars();

    if chars.next() != Some('j') {
        return false;
    }

    let rest = chars.as_str();
    (1..=2).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_lowercase())
}
