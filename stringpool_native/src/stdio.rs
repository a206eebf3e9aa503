use std::io::{self, stdout, Stdout};
use stringpool_env::io::IoImpl;
use stringpool_env::stdio::{Stdio, StdioImpl};
use termcolor::{ColorChoice, StandardStream, WriteColor};

#[derive(Debug)]
pub struct IoStdioNative();

impl IoImpl<Stdio> for IoStdioNative {
  fn make(&self) -> Stdio {
    Stdio::new(Box::new(NativeStdio::default()))
  }
}

pub struct NativeStdio {
  stdout: Stdout,
  stderr: StandardStream,
}

impl Default for NativeStdio {
  fn default() -> Self {
    Self {
      stdout: stdout(),
      stderr: StandardStream::stderr(ColorChoice::Auto),
    }
  }
}

impl StdioImpl for NativeStdio {
  fn stdout(&mut self) -> &mut dyn io::Write {
    &mut self.stdout
  }

  fn stderr(&mut self) -> &mut dyn io::Write {
    &mut self.stderr
  }

  fn stderr_color(&mut self) -> &mut dyn WriteColor {
    &mut self.stderr
  }
}
