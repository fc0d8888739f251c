use std::sync::Arc;
use thiserror::Error;

use lip_core::LipError;

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error("核心库错误: {0}")]
    Core(Arc<LipError>),

    #[error("IO 错误: {0}")]
    Io(Arc<std::io::Error>),

    #[error("配置文件错误: {0}")]
    Settings(String),

    #[error("日志初始化失败: {0}")]
    Logger(String),

    #[error("线程池初始化失败: {0}")]
    ThreadPool(String),
}

impl From<LipError> for AppError {
    fn from(err: LipError) -> Self {
        Self::Core(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for AppError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
