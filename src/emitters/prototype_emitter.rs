use super::Emitter;
use crate::error::{Error, ErrorType, Result};
use crate::instruction::{Instruction, OperandType};
use std::io::Write;

/// Emits one trait-method signature per instruction for the hand-written
/// backend to implement.
pub struct PrototypeEmitter {
    buffer: String,
}

impl PrototypeEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
}

impl Default for PrototypeEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn parameter_name(operand_type: OperandType) -> &'static str {
    match operand_type {
        OperandType::RelativeLabel => "label",
        OperandType::AbsoluteAddress => "addr",
        _ => "operand",
    }
}

impl Emitter for PrototypeEmitter {
    fn emit_instruction(&mut self, instruction: &Instruction) -> Result<()> {
        let declaration = match instruction.operand_type {
            None => format!("fn {}(&mut self);\n", instruction.identifier),
            Some(operand_type) => format!(
                "fn {}(&mut self, {}: {});\n",
                instruction.identifier,
                parameter_name(operand_type),
                operand_type.rust_type()
            ),
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
        "prototype"
    }
}
