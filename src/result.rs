extern crate reqwest;
extern crate rppal;
extern crate serde_json;
extern crate std;

pub type BusDashResult<T> = std::result::Result<T, BusDashError>;

#[derive(Debug)]
pub enum BusDashError {
    ConfigError(String),
    GpioError(rppal::gpio::Error),
    HttpError(reqwest::Error),
    I2cError(rppal::i2c::Error),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    ProtocolError(String),
    SpiError(rppal::spi::Error),
}

impl BusDashError {
    // Failures of the network round trip itself. Only these are worth
    // another attempt; the server answering with an error is not.
    pub fn is_transport(&self) -> bool {
        match *self {
            BusDashError::HttpError(ref err) => !err.is_builder(),
            BusDashError::IoError(_) => true,
            _ => false,
        }
    }

    pub fn is_device(&self) -> bool {
        match *self {
            BusDashError::GpioError(_) |
            BusDashError::I2cError(_) |
            BusDashError::SpiError(_) => true,
            _ => false,
        }
    }
}

pub fn make_error(message: &str) -> BusDashError {
    return BusDashError::ProtocolError(message.to_string());
}

impl std::fmt::Display for BusDashError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            BusDashError::ConfigError(ref msg) => {
                return write!(f, "Config Error: {}", msg);
            },
            BusDashError::GpioError(ref err) => {
                return write!(f, "GPIO Error: {}", err);
            },
            BusDashError::HttpError(ref err) => {
                if err.is_timeout() {
                    return write!(f, "HTTP Timeout");
                }
                return write!(f, "HTTP Error: {}", err);
            },
            BusDashError::I2cError(ref err) => {
                return write!(f, "I2C Error: {}", err);
            },
            BusDashError::IoError(ref err) => {
                return write!(f, "IO Error: {}", err);
            },
            BusDashError::JsonError(ref err) => {
                return write!(f, "Bad response: {}", err);
            },
            // The API's own message, shown as-is.
            BusDashError::ProtocolError(ref msg) => {
                return write!(f, "{}", msg);
            },
            BusDashError::SpiError(ref err) => {
                return write!(f, "SPI Error: {}", err);
            },
        }
    }
}

impl std::error::Error for BusDashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            BusDashError::GpioError(ref err) => Some(err),
            BusDashError::HttpError(ref err) => Some(err),
            BusDashError::I2cError(ref err) => Some(err),
            BusDashError::IoError(ref err) => Some(err),
            BusDashError::JsonError(ref err) => Some(err),
            BusDashError::SpiError(ref err) => Some(err),
            BusDashError::ConfigError(_) | BusDashError::ProtocolError(_) => None,
        }
    }
}

impl From<rppal::gpio::Error> for BusDashError {
    fn from(err: rppal::gpio::Error) -> BusDashError {
        return BusDashError::GpioError(err);
    }
}

impl From<reqwest::Error> for BusDashError {
    fn from(err: reqwest::Error) -> BusDashError {
        return BusDashError::HttpError(err);
    }
}

impl From<rppal::i2c::Error> for BusDashError {
    fn from(err: rppal::i2c::Error) -> BusDashError {
        return BusDashError::I2cError(err);
    }
}

impl From<std::io::Error> for BusDashError {
    fn from(err: std::io::Error) -> BusDashError {
        return BusDashError::IoError(err);
    }
}

impl From<serde_json::Error> for BusDashError {
    fn from(err: serde_json::Error) -> BusDashError {
        return BusDashError::JsonError(err);
    }
}

impl From<rppal::spi::Error> for BusDashError {
    fn from(err: rppal::spi::Error) -> BusDashError {
        return BusDashError::SpiError(err);
    }
}
