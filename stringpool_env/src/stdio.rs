use crate::io::IoImpl;
use std::io::{self, Write};
use termcolor::{NoColor, WriteColor};

/// A wrapper around the provided facilities for standard out and err
pub struct Stdio {
  stdio: Box<dyn StdioImpl>,
}

impl Default for Stdio {
  fn default() -> Self {
    Self {
      stdio: Box::new(StdioMock::default()),
    }
  }
}

impl Stdio {
  /// Create a new wrapper from the provided stdio facilities
  pub fn new(stdio: Box<dyn StdioImpl>) -> Self {
    Self { stdio }
  }

  /// Get a Write to stdout
  pub fn stdout(&mut self) -> &mut dyn Write {
    self.stdio.stdout()
  }

  /// Get a Write to stderr
  pub fn stderr(&mut self) -> &mut dyn Write {
    self.stdio.stderr()
  }

  /// Get a WriteColor to stderr
  pub fn stderr_color(&mut self) -> &mut dyn WriteColor {
    self.stdio.stderr_color()
  }
}

pub trait StdioImpl {
  fn stdout(&mut self) -> &mut dyn Write;
  fn stderr(&mut self) -> &mut dyn Write;
  fn stderr_color(&mut self) -> &mut dyn WriteColor;
}

#[derive(Debug)]
pub struct IoStdioMock();

impl IoImpl<Stdio> for IoStdioMock {
  fn make(&self) -> Stdio {
    Stdio::default()
  }
}

pub struct StdioMock {
  stdout: MockWrite,
  stderr: NoColor<MockWrite>,
}

impl Default for StdioMock {
  fn default() -> Self {
    Self {
      stdout: MockWrite(),
      stderr: NoColor::new(MockWrite()),
    }
  }
}

impl StdioImpl for StdioMock {
  fn stdout(&mut self) -> &mut dyn Write {
    &mut self.stdout
  }
  fn stderr(&mut self) -> &mut dyn Write {
    self.stderr.get_mut()
  }
  fn stderr_color(&mut self) -> &mut dyn WriteColor {
    &mut self.stderr
  }
}

pub struct MockWrite();

impl Write for MockWrite {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    Ok(buf.len())
  }
  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

pub mod support {
  use super::{Stdio, StdioImpl};
  use crate::io::IoImpl;
  use std::cell::RefCell;
  use std::io::{self, Write};
  use std::rc::Rc;
  use std::str;
  use termcolor::{NoColor, WriteColor};

  /// A shared in memory writer used to capture output in tests
  #[derive(Debug, Clone, Default)]
  pub struct TestWriter(Rc<RefCell<Vec<u8>>>);

  impl TestWriter {
    /// A copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
      self.0.borrow().clone()
    }

    /// Everything written so far as utf8
    pub fn to_utf8(&self) -> String {
      str::from_utf8(&self.0.borrow())
        .expect("Captured output was not utf8")
        .to_string()
    }
  }

  impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.borrow_mut().extend_from_slice(buf);
      Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  #[derive(Debug, Default)]
  pub struct StdioTestContainer {
    pub stdout: TestWriter,
    pub stderr: TestWriter,
  }

  impl StdioTestContainer {
    pub fn log_stdio(&self) {
      eprintln!("{}", self.stdout.to_utf8());
      eprintln!("{}", self.stderr.to_utf8());
    }
  }

  #[derive(Debug)]
  pub struct IoStdioTest {
    stdout: TestWriter,
    stderr: TestWriter,
  }

  impl IoStdioTest {
    pub fn new(container: &StdioTestContainer) -> Self {
      Self {
        stdout: container.stdout.clone(),
        stderr: container.stderr.clone(),
      }
    }
  }

  impl IoImpl<Stdio> for IoStdioTest {
    fn make(&self) -> Stdio {
      Stdio::new(Box::new(StdioTest {
        stdout: self.stdout.clone(),
        stderr: NoColor::new(self.stderr.clone()),
      }))
    }
  }

  pub struct StdioTest {
    stdout: TestWriter,
    stderr: NoColor<TestWriter>,
  }

  impl StdioImpl for StdioTest {
    fn stdout(&mut self) -> &mut dyn Write {
      &mut self.stdout
    }
    fn stderr(&mut self) -> &mut dyn Write {
      self.stderr.get_mut()
    }
    fn stderr_color(&mut self) -> &mut dyn WriteColor {
      &mut self.stderr
    }
  }
}

#[cfg(test)]
mod test {
  use super::support::*;
  use super::*;
  use std::rc::Rc;

  #[test]
  fn capture_stdout() {
    let container = StdioTestContainer::default();
    let io_impl = IoStdioTest::new(&container);

    let mut stdio = io_impl.make();
    write!(stdio.stdout(), "captured").expect("write failed");

    assert_eq!(container.stdout.to_utf8(), "captured");
  }

  #[test]
  fn capture_stderr_color() {
    let container = StdioTestContainer::default();
    let io_impl = Rc::new(IoStdioTest::new(&container));

    let mut stdio = io_impl.make();
    write!(stdio.stderr_color(), "warned").expect("write failed");

    assert_eq!(container.stderr.to_utf8(), "warned");
  }

  #[test]
  fn mock_discards() {
    let mut stdio = Stdio::default();
    write!(stdio.stdout(), "dropped").expect("write failed");
    write!(stdio.stderr(), "dropped").expect("write failed");
  }
}
