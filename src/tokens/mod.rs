pub mod bearer;
pub mod signer;

pub use bearer::{parse_authorization, strip_scheme, BearerError};
pub use signer::{JwtSigner, SignerError, TokenSigner, VerifiedToken, TOKEN_TYPE};
