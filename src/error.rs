use crate::config::{ConfigError, ParamError};
use core::fmt;
use embedded_time::{clock, ConversionError};

/// An error loading a configuration or timing the flight loop.
#[derive(Debug)]
pub enum Error {
    Clock(clock::Error),
    Time(ConversionError),
    Param(ParamError),
    Config(ConfigError),
}

impl From<clock::Error> for Error {
    fn from(clock_error: clock::Error) -> Self {
        Error::Clock(clock_error)
    }
}

impl From<ConversionError> for Error {
    fn from(time_error: ConversionError) -> Self {
        Error::Time(time_error)
    }
}

impl From<ParamError> for Error {
    fn from(param_error: ParamError) -> Self {
        Error::Param(param_error)
    }
}

impl From<ConfigError> for Error {
    fn from(config_error: ConfigError) -> Self {
        Error::Config(config_error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Clock(error) => write!(f, "Clock error: {:?}", error),
            Self::Time(error) => write!(f, "Time conversion error: {:?}", error),
            Self::Param(error) => write!(f, "Parameter error: {}", error),
            Self::Config(error) => write!(f, "Invalid configuration: {}", error),
        }
    }
}
