pub mod onenote;

pub use onenote::OneNoteConnector;
