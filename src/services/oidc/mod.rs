/**
 * Responsibility
 *  - claims / discovery / verifier を束ねる
 *  - 外部（middleware 等）に公開する型・機能を制御する
 */
mod claims;
mod discovery;
#[cfg(test)]
pub mod testing;
mod verifier;

pub use claims::{Claims, RoleSet};
pub use verifier::{ParseToken, TokenVerifier, VerifierError};
