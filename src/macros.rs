//===========================================================================//

macro_rules! invalid_format {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidFormat(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidFormat(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidInput(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidInput(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! decoding_failure {
    ($e:expr) => {
        return Err($crate::error::IcoError::DecodingFailure(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::DecodingFailure(
            format!($fmt, $($arg)+),
        ))
    };
}

//===========================================================================//
