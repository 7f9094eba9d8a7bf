pub mod compress;
pub mod crypto;

pub use compress::*;
pub use crypto::*;
