pub mod mt19937;
pub mod schedule;
pub mod stream;

pub use mt19937::Mt19937;
pub use schedule::{crypt_header, rolling_key, section_key, ENCRYPTION_HEADER_SIZE};
pub use stream::crypt;
