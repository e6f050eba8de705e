/*!
# Language Module

Word scanning and the error type shared by the whole crate.

*/

#[macro_use]
mod error;
mod scan;

pub use error::Error;
pub use error::ErrorCode;
pub use error::Location;
pub use scan::Scanner;
pub use scan::Token;
