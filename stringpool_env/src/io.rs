use crate::{
  env::{Env, IoEnvMock},
  stdio::{IoStdioMock, Stdio},
};
use std::{fmt, rc::Rc};

/// A struct wrapping the externally provided io facilities given to the pool
#[derive(Debug)]
pub struct Io {
  stdio_impl: Rc<dyn IoImpl<Stdio>>,
  env_impl: Rc<dyn IoImpl<Env>>,
}

impl Default for Io {
  fn default() -> Self {
    Self {
      stdio_impl: Rc::new(IoStdioMock()),
      env_impl: Rc::new(IoEnvMock()),
    }
  }
}

impl Io {
  /// Create a new io wrapper from the provided io impls
  pub fn new(stdio_impl: Rc<dyn IoImpl<Stdio>>, env_impl: Rc<dyn IoImpl<Env>>) -> Self {
    Self {
      stdio_impl,
      env_impl,
    }
  }

  /// Replace this stdio implementation
  pub fn with_stdio(self, stdio_impl: Rc<dyn IoImpl<Stdio>>) -> Self {
    Self {
      stdio_impl,
      env_impl: self.env_impl,
    }
  }

  /// Replace this env implementation
  pub fn with_env(self, env_impl: Rc<dyn IoImpl<Env>>) -> Self {
    Self {
      stdio_impl: self.stdio_impl,
      env_impl,
    }
  }

  /// Generate a wrapper to stdio facilities
  pub fn stdio(&self) -> Stdio {
    self.stdio_impl.make()
  }

  /// Generate a wrapper to environment facilities
  pub fn env(&self) -> Env {
    self.env_impl.make()
  }
}

impl Clone for Io {
  fn clone(&self) -> Self {
    Io::new(Rc::clone(&self.stdio_impl), Rc::clone(&self.env_impl))
  }
}

pub trait IoImpl<T>: fmt::Debug {
  fn make(&self) -> T;
}
