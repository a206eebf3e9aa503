use crate::{env::IoEnvNative, stdio::IoStdioNative};
use std::rc::Rc;
use stringpool_env::io::Io;

pub fn io_native() -> Io {
  Io::new(Rc::new(IoStdioNative()), Rc::new(IoEnvNative()))
}
