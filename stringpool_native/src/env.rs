use std::env;
use stringpool_env::{
  env::{Env, EnvImpl},
  io::IoImpl,
};

#[derive(Debug)]
pub struct IoEnvNative();

impl IoImpl<Env> for IoEnvNative {
  fn make(&self) -> Env {
    Env::new(Box::new(EnvNative()))
  }
}

#[derive(Clone, Default)]
pub struct EnvNative();

impl EnvImpl for EnvNative {
  fn var(&self, key: &str) -> Option<String> {
    env::var(key).ok()
  }
}
