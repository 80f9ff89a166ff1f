use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),
    #[error("no activity attached")]
    NotAttached,
}
