use crate::emitters::encoder_emitter::EncoderEmitter;
use crate::emitters::prototype_emitter::PrototypeEmitter;
use crate::emitters::{Emitter, EmitterType};
use crate::error::Result;
use crate::instruction::Instruction;
use crate::nasm;
use crate::template::parse_templates;
use std::io::Write;

/// Runs the whole pipeline over an instruction-template list and writes one
/// declaration per template, in input order. Any failure aborts the run
/// before anything is written: a truncated declaration set is never emitted.
pub fn compile<W: Write>(source: &str, emitter_type: EmitterType, output: &mut W) -> Result<()> {
    let templates = parse_templates(source)?;

    let mut emitter: Box<dyn Emitter> = match emitter_type {
        EmitterType::Encoder => Box::new(EncoderEmitter::new()),
        EmitterType::Prototype => Box::new(PrototypeEmitter::new()),
    };

    for template in &templates {
        let bytes = nasm::byte_template(template)?;
        let instruction = Instruction::derive(template, bytes);

        emitter.emit_instruction(&instruction)?;
    }

    emitter.finalize(output)
}
