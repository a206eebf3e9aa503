use crate::io::IoImpl;
use fnv::FnvBuildHasher;
use hashbrown::HashMap;

/// A wrapper around the environmental facilities provided to the pool
pub struct Env {
  env: Box<dyn EnvImpl>,
}

impl Default for Env {
  fn default() -> Self {
    Self {
      env: Box::new(EnvMock()),
    }
  }
}

impl Env {
  /// Create a new wrapper around the provided environmental facilities
  pub fn new(env: Box<dyn EnvImpl>) -> Self {
    Self { env }
  }

  /// Get the value of an environment variable if it is set
  pub fn var(&self, key: &str) -> Option<String> {
    self.env.var(key)
  }
}

pub trait EnvImpl {
  fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug)]
pub struct IoEnvMock();

impl IoImpl<Env> for IoEnvMock {
  fn make(&self) -> Env {
    Env::new(Box::new(EnvMock()))
  }
}

pub struct EnvMock();

impl EnvImpl for EnvMock {
  fn var(&self, _key: &str) -> Option<String> {
    None
  }
}

#[derive(Debug, Clone, Default)]
pub struct IoEnvTest {
  vars: HashMap<String, String, FnvBuildHasher>,
}

impl IoEnvTest {
  pub fn new(vars: HashMap<String, String, FnvBuildHasher>) -> Self {
    Self { vars }
  }
}

impl IoImpl<Env> for IoEnvTest {
  fn make(&self) -> Env {
    Env::new(Box::new(EnvTest {
      vars: self.vars.clone(),
    }))
  }
}

pub struct EnvTest {
  vars: HashMap<String, String, FnvBuildHasher>,
}

impl EnvImpl for EnvTest {
  fn var(&self, key: &str) -> Option<String> {
    self.vars.get(key).cloned()
  }
}
