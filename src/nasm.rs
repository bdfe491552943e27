use crate::error::{Error, ErrorType, Result};
use crate::template::Template;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Repeated to the placeholder width and substituted as an immediate. The
/// value is large enough in every width to keep nasm from shortening the
/// immediate or displacement encoding.
const SENTINEL_BYTE: u8 = 0x71;

const BITS_DIRECTIVE: &str = "[bits 64]";

static SCRATCH_INDEX: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory for a single assembler invocation, removed again on
/// every exit path.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> Result<Self> {
        let index = SCRATCH_INDEX.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("opgen_{}_{}", std::process::id(), index));

        fs::create_dir_all(&path).map_err(|e| {
            Error::new(
                ErrorType::Io,
                format!("Failed to create scratch directory: {e}"),
            )
        })?;

        Ok(Self { path })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn sentinel_literal(width: usize) -> String {
    let mut literal = String::from("0x");
    for _ in 0..width {
        literal.push_str(&format!("{SENTINEL_BYTE:02x}"));
    }
    literal
}

/// Assembles a single instruction to flat binary and returns the raw bytes.
pub fn assemble(instruction_text: &str) -> Result<Vec<u8>> {
    let scratch = ScratchDir::create()?;
    let source_file = scratch.path.join("instruction.asm");
    let binary_file = scratch.path.join("instruction.bin");

    fs::write(
        &source_file,
        format!("{BITS_DIRECTIVE}\n{instruction_text}\n"),
    )
    .map_err(|e| Error::new(ErrorType::Io, format!("Failed to write assembler input: {e}")))?;

    let assembler_output = Command::new("nasm")
        .args([
            "-f",
            "bin",
            source_file.to_str().unwrap(),
            "-o",
            binary_file.to_str().unwrap(),
        ])
        .output()
        .map_err(|e| {
            Error::new(
                ErrorType::Assemble,
                format!("Failed to execute assembler: {e}"),
            )
        })?;

    if !assembler_output.status.success() {
        return Err(Error::new(
            ErrorType::Assemble,
            format!(
                "Assembling '{instruction_text}' failed\n\n{}",
                String::from_utf8_lossy(&assembler_output.stderr)
            ),
        ));
    }

    fs::read(&binary_file).map_err(|e| {
        Error::new(
            ErrorType::Io,
            format!("Failed to read assembler output: {e}"),
        )
    })
}

/// Extracts the static byte prefix of a template: the full encoding with the
/// trailing operand bytes removed. Operand bytes are assumed to always be the
/// final bytes of the encoding, which holds for the immediate and relative
/// displacement forms this tool handles.
pub fn byte_template(template: &Template) -> Result<Vec<u8>> {
    match template.placeholder() {
        None => {
            assemble(template.text).map_err(|e| e.with_range(template.range.clone()))
        }
        Some((token, kind)) => {
            let width = kind.width();
            let text = template
                .text
                .replacen(token.value, &sentinel_literal(width), 1);

            let mut bytes =
                assemble(&text).map_err(|e| e.with_range(template.range.clone()))?;

            if bytes.len() < width {
                return Err(Error::new_with_range(
                    ErrorType::Assemble,
                    format!(
                        "Encoding of '{}' is shorter than its {width}-byte operand",
                        template.text
                    ),
                    template.range.clone(),
                ));
            }

            bytes.truncate(bytes.len() - width);
            Ok(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_template;

    fn nasm_available() -> bool {
        Command::new("nasm").arg("-v").output().is_ok()
    }

    #[test]
    fn sentinel_literal_widths() {
        assert_eq!(sentinel_literal(1), "0x71");
        assert_eq!(sentinel_literal(4), "0x71717171");
        assert_eq!(sentinel_literal(8), "0x7171717171717171");
    }

    #[test]
    fn byte_template_without_placeholder() {
        if !nasm_available() {
            return;
        }

        let template = parse_template("ret", 0).unwrap();
        assert_eq!(byte_template(&template).unwrap(), vec![0xc3]);

        let template = parse_template("syscall", 0).unwrap();
        assert_eq!(byte_template(&template).unwrap(), vec![0x0f, 0x05]);
    }

    #[test]
    fn byte_template_strips_trailing_operand_bytes() {
        if !nasm_available() {
            return;
        }

        let template = parse_template("mov r12, $u64", 0).unwrap();
        assert_eq!(byte_template(&template).unwrap(), vec![0x49, 0xbc]);

        let template = parse_template("je $label", 0).unwrap();
        assert_eq!(byte_template(&template).unwrap(), vec![0x0f, 0x84]);
    }

    #[test]
    fn byte_template_length_invariant() {
        if !nasm_available() {
            return;
        }

        for input in ["add r8, $i8", "add r8, $i32", "mov rax, $u32", "je $label"] {
            let template = parse_template(input, 0).unwrap();
            let (token, kind) = template.placeholder().unwrap();

            let full = assemble(
                &template
                    .text
                    .replacen(token.value, &sentinel_literal(kind.width()), 1),
            )
            .unwrap();
            let prefix = byte_template(&template).unwrap();

            assert_eq!(full.len() - prefix.len(), kind.width());
            assert_eq!(&full[..prefix.len()], &prefix[..]);
        }
    }

    #[test]
    fn assemble_failure_names_instruction() {
        if !nasm_available() {
            return;
        }

        let result = assemble("mov qword rax");

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Assemble);
        assert!(error.message.contains("mov qword rax"));
    }
}
