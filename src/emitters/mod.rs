use crate::error::Result;
use crate::instruction::Instruction;
use clap::ValueEnum;
use std::io::Write;

pub mod encoder_emitter;
pub mod prototype_emitter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EmitterType {
    Encoder,
    Prototype,
}

/// One declaration consumer. Emitters buffer everything and only write in
/// `finalize`, so a failing instruction never leaves partial output behind.
pub trait Emitter {
    fn emit_instruction(&mut self, instruction: &Instruction) -> Result<()>;

    fn finalize(&mut self, output: &mut dyn Write) -> Result<()>;

    fn name(&self) -> &'static str;
}
