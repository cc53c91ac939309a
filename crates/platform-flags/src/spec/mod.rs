pub mod arch;
pub mod llvm;
pub mod target;
