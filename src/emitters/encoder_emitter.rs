use super::Emitter;
use crate::error::{Error, ErrorType, Result};
use crate::instruction::Instruction;
use std::io::Write;

/// Emits one byte-level encoder macro invocation per instruction. Branch
/// instructions get the relocation-patching macro and carry no operand type.
pub struct EncoderEmitter {
    buffer: String,
}

impl EncoderEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
}

impl Default for EncoderEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    let values: Vec<String> = bytes.iter().map(|byte| format!("{byte:#04x}")).collect();
    format!("[{}]", values.join(", "))
}

impl Emitter for EncoderEmitter {
    fn emit_instruction(&mut self, instruction: &Instruction) -> Result<()> {
        let bytes = format_bytes(&instruction.bytes);

        let declaration = if instruction.branch {
            format!("instr_branch!({}, {bytes});\n", instruction.identifier)
        } else {
            match instruction.operand_type {
                None => format!("instr!({}, {bytes});\n", instruction.identifier),
                Some(operand_type) => format!(
                    "instr!({}, {}, {bytes});\n",
                    instruction.identifier,
                    operand_type.rust_type()
                ),
            }
        };

        self.buffer.push_str(&declaration);
        Ok(())
    }

    fn finalize(&mut self, output: &mut dyn Write) -> Result<()> {
        output
            .write_all(self.buffer.as_bytes())
            .map_err(|e| Error::new(ErrorType::Io, format!("Failed to write output: {e}")))
    }

    fn name(&self) -> &'static str {
        "encoder"
    }
}
