mod functions;
mod system;

#[cfg(test)]
mod functions_test;

pub use functions::*;
pub use system::*;
