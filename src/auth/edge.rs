//! Bearer authentication used at the edge of every downstream service.
//!
//! In the default stateless mode a token is accepted when its signature and
//! `exp` claim check out. Logout and superseding logins only update the token
//! store, so a revoked token keeps passing this check until it naturally
//! expires. Stateful mode closes that window at the cost of a store lookup per
//! request.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::storage::{DatabaseError, TokenStore};
use crate::tokens::{parse_authorization, BearerError, SignerError, TokenSigner};

/// The authenticated caller. Only the subject (email) is propagated.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub expires_at: DateTime<Utc>,
    pub subject: String,
}

#[derive(Debug, Error)]
pub enum EdgeRejection {
    #[error(transparent)]
    Header(#[from] BearerError),
    #[error("Token has been revoked")]
    Revoked,
    #[error("Token store unavailable: {0}")]
    Store(#[from] DatabaseError),
    #[error(transparent)]
    Token(#[from] SignerError),
}

impl EdgeRejection {
    /// Everything except a store fault means "not authenticated".
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, EdgeRejection::Store(_))
    }
}

pub struct EdgeVerifier {
    signer: Arc<dyn TokenSigner>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl EdgeVerifier {
    /// Signature and expiry only.
    pub fn stateless(signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            signer,
            tokens: None,
        }
    }

    /// Signature, expiry, and an active record in the token store.
    pub fn stateful(signer: Arc<dyn TokenSigner>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            signer,
            tokens: Some(tokens),
        }
    }

    pub fn checks_revocation(&self) -> bool {
        self.tokens.is_some()
    }

    /// Authenticate a raw `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, EdgeRejection> {
        let token = parse_authorization(header)?;
        let verified = self.signer.verify(token)?;

        if let Some(tokens) = &self.tokens {
            let active = tokens
                .find_token(token)?
                .map(|t| t.is_active())
                .unwrap_or(false);
            if !active {
                return Err(EdgeRejection::Revoked);
            }
        }

        Ok(Principal {
            expires_at: verified.expires_at,
            subject: verified.subject,
        })
    }
}
