pub mod compiler;
pub mod emitters;
pub mod error;
pub mod instruction;
pub mod nasm;
pub mod template;
