pub mod error;
pub mod logging;
pub mod models;
pub mod parse;
pub mod types;

pub use error::Error;
pub use logging::Logger;
pub use models::{GenerationMode, GenerativeModel};
pub use parse::{parse_json_response, render_reference_block, strip_code_fences};
pub use types::*;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Category, Topic, Theme, Source, Result, Error};
    pub use super::{GenerationMode, GenerativeModel};
}
