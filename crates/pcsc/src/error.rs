//! Mapping from PC/SC errors onto the session error taxonomy

use cardhost_core::Error;

pub(crate) fn subsystem_error(err: pcsc::Error) -> Error {
    Error::SubsystemUnavailable(err.to_string())
}

pub(crate) fn connect_error(reader: &str, err: pcsc::Error) -> Error {
    match err {
        pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard => {
            Error::NoCardPresent(reader.to_string())
        }
        pcsc::Error::UnknownReader | pcsc::Error::ReaderUnavailable => {
            Error::ReaderNotFound(reader.to_string())
        }
        err => Error::ConnectionFailed {
            reader: reader.to_string(),
            reason: err.to_string(),
        },
    }
}

pub(crate) fn transmit_error(err: pcsc::Error) -> Error {
    Error::TransmissionFailed(err.to_string())
}

pub(crate) fn disconnect_error(err: pcsc::Error) -> Error {
    Error::DisconnectFailed(err.to_string())
}
